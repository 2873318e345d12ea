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
use log::debug;
use perm::{Mode, PROJECT_NAME};
use std::path::PathBuf;

/// mkdir - make directories
#[derive(Parser)]
#[command(version, about = gettext("mkdir - make directories"))]
struct Args {
    #[arg(short, long, help = gettext("Create any missing intermediate pathname components"))]
    parents: bool,

    #[arg(short, long, help = gettext("Set the file permission bits of the newly-created directory to the specified octal mode value"))]
    mode: Option<String>,

    #[arg(required = true, help = gettext("A pathname of a directory to be created"))]
    dirs: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    let args = Args::parse();

    let mode = match args.mode.as_deref().map(str::parse::<Mode>) {
        None => Mode::PERM,
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            eprintln!("mkdir: {}", e);
            std::process::exit(1);
        }
    };

    let mut exit_code = 0;

    for dir in &args.dirs {
        debug!("mkdir {:o} {}", mode, dir.display());

        let res = if args.parents {
            perm::mkdir_all(dir, mode)
        } else {
            perm::mkdir(dir, mode)
        };

        if let Err(e) = res {
            exit_code = 1;
            eprintln!("{}: {}", dir.display(), e);
        }
    }

    std::process::exit(exit_code)
}
