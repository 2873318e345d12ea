//
// Copyright (c) 2024 Jeff Garzik
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::common::{path_arg, run_test_with_checker, TestPlan};
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::{tempdir, TempDir};

fn setup_test_env() -> (TempDir, String) {
    let temp_dir = tempdir().expect("Unable to create temporary directory");
    let dir_path = path_arg(&temp_dir.path().join("testdir"));
    (temp_dir, dir_path)
}

fn run_mkdir_test(args: Vec<&str>, expected_exit_code: i32, expected_err_substr: &str) {
    let plan = TestPlan {
        cmd: String::from("mkdir"),
        args: args.iter().map(|&s| s.into()).collect(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code,
    };

    run_test_with_checker(plan, move |plan, output: &Output| {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains(expected_err_substr),
            "Expected substring not found in stderr: '{}'",
            stderr
        );
        assert_eq!(output.status.code(), Some(plan.expected_exit_code));
    });
}

#[test]
fn test_create_single_directory() {
    let (_temp_dir, dir_path) = setup_test_env();

    run_mkdir_test(vec![&dir_path], 0, "");

    assert!(Path::new(&dir_path).is_dir());
}

#[test]
fn test_directory_already_exists() {
    let (_temp_dir, dir_path) = setup_test_env();
    fs::create_dir(&dir_path).unwrap();

    run_mkdir_test(vec![&dir_path], 1, &format!("{}: ", dir_path));

    assert!(Path::new(&dir_path).is_dir());
}

#[test]
fn test_missing_parent() {
    let (_temp_dir, dir_path) = setup_test_env();
    let nested = format!("{}/a/b", dir_path);

    run_mkdir_test(vec![&nested], 1, &format!("{}: ", nested));

    assert!(!Path::new(&dir_path).exists());
}

#[test]
fn test_invalid_mode() {
    let (_temp_dir, dir_path) = setup_test_env();

    run_mkdir_test(
        vec!["-m", "invalid", &dir_path],
        1,
        "mkdir: invalid mode: 'invalid'",
    );

    assert!(!Path::new(&dir_path).exists());
}

#[test]
fn test_create_parents() {
    let (_temp_dir, dir_path) = setup_test_env();
    let nested = format!("{}/a/b/c", dir_path);

    run_mkdir_test(vec!["-p", &nested], 0, "");
    assert!(Path::new(&nested).is_dir());

    // existing directories are fine with -p
    run_mkdir_test(vec!["-p", &nested], 0, "");
    assert!(Path::new(&nested).is_dir());
}

#[test]
fn test_create_multiple() {
    let (temp_dir, _) = setup_test_env();
    let one = path_arg(&temp_dir.path().join("one"));
    let two = path_arg(&temp_dir.path().join("two"));

    run_mkdir_test(vec![&one, &two], 0, "");

    assert!(Path::new(&one).is_dir());
    assert!(Path::new(&two).is_dir());
}

#[cfg(unix)]
#[test]
fn test_create_with_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp_dir, dir_path) = setup_test_env();

    run_mkdir_test(vec!["-m", "700", &dir_path], 0, "");

    let mode = fs::metadata(&dir_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[cfg(unix)]
#[test]
fn test_create_parents_with_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp_dir, dir_path) = setup_test_env();
    let nested = format!("{}/sub", dir_path);

    run_mkdir_test(vec!["-p", "-m", "0711", &nested], 0, "");

    for path in [&dir_path, &nested] {
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
        assert_eq!(mode & 0o066, 0);
    }
}
