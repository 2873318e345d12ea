//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use perm::PROJECT_NAME;
use std::path::PathBuf;

/// stat - display file permission bits
#[derive(Parser)]
#[command(version, about = gettext("stat - display file permission bits"))]
struct Args {
    #[arg(short = 'c', long, help = gettext("Print only the mode"))]
    mode_only: bool,

    #[arg(required = true, help = gettext("The files to query"))]
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    let args = Args::parse();

    let mut exit_code = 0;

    for file in &args.files {
        match perm::stat(file) {
            Ok(info) => {
                let mode = info.mode().mode_bits();
                if args.mode_only {
                    println!("{:04o}", mode);
                } else {
                    println!("{:04o} {}", mode, file.display());
                }
            }
            Err(e) => {
                exit_code = 1;
                eprintln!("{}: {}", file.display(), e);
            }
        }
    }

    std::process::exit(exit_code)
}
