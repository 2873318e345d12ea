//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::common::{path_arg, run_test, run_test_with_checker, TestPlan};
use std::fs;
use std::process::Output;
use tempfile::tempdir;

fn chmod_test(args: &[&str], expected_err: &str, expected_exit_code: i32) {
    run_test(TestPlan {
        cmd: String::from("chmod"),
        args: args.iter().map(|s| s.to_string()).collect(),
        expected_out: String::new(),
        expected_err: String::from(expected_err),
        expected_exit_code,
    });
}

fn stat_mode(path: &str) -> String {
    let mut mode = String::new();
    run_test_with_checker(
        TestPlan {
            cmd: String::from("stat"),
            args: vec![String::from("-c"), String::from(path)],
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 0,
        },
        |_, output: &Output| {
            assert_eq!(output.status.code(), Some(0));
            mode = String::from_utf8_lossy(&output.stdout).trim().to_string();
        },
    );
    mode
}

#[test]
fn test_chmod_invalid_mode() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, b"").unwrap();
    let file = path_arg(&file);

    chmod_test(&["u+x", &file], "chmod: invalid mode: 'u+x'\n", 1);
    chmod_test(&["0800", &file], "chmod: invalid mode: '0800'\n", 1);
    chmod_test(&["17777", &file], "chmod: invalid mode: '17777'\n", 1);
}

#[test]
fn test_chmod_missing_file() {
    let dir = tempdir().unwrap();
    let missing = path_arg(&dir.path().join("missing"));

    run_test_with_checker(
        TestPlan {
            cmd: String::from("chmod"),
            args: vec![String::from("644"), missing.clone()],
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 1,
        },
        |plan, output| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.starts_with(&format!("{}: ", missing)), "{stderr}");
            assert_eq!(output.status.code(), Some(plan.expected_exit_code));
        },
    );
}

#[test]
fn test_chmod_continues_after_failure() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, b"").unwrap();
    let file = path_arg(&file);
    let missing = path_arg(&dir.path().join("missing"));

    run_test_with_checker(
        TestPlan {
            cmd: String::from("chmod"),
            args: vec![String::from("600"), missing, file.clone()],
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 1,
        },
        |plan, output| assert_eq!(output.status.code(), Some(plan.expected_exit_code)),
    );

    #[cfg(unix)]
    assert_eq!(stat_mode(&file), "0600");
}

#[cfg(unix)]
#[test]
fn test_chmod_octal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, b"").unwrap();
    let file = path_arg(&file);

    for mode in ["0640", "0755", "0000", "0777", "0421"] {
        chmod_test(&[mode, &file], "", 0);
        assert_eq!(stat_mode(&file), mode);
    }

    // leading zeros are optional
    chmod_test(&["644", &file], "", 0);
    assert_eq!(stat_mode(&file), "0644");
}

#[cfg(unix)]
#[test]
fn test_chmod_special_bits() {
    let dir = tempdir().unwrap();
    let sub = path_arg(&dir.path().join("sub"));
    fs::create_dir(&sub).unwrap();

    chmod_test(&["1777", &sub], "", 0);
    assert_eq!(stat_mode(&sub), "1777");

    chmod_test(&["1750", &sub], "", 0);
    assert_eq!(stat_mode(&sub), "1750");
}
