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

/// chmod - change the file modes
#[derive(Parser)]
#[command(version, about = gettext("chmod - change the file modes"))]
struct Args {
    #[arg(help = gettext("The new file mode bits, as an octal number"))]
    mode: String,

    #[arg(required = true, help = gettext("The files to change"))]
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    let args = Args::parse();

    let mode: Mode = match args.mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("chmod: {}", e);
            std::process::exit(1);
        }
    };

    let mut exit_code = 0;

    for file in &args.files {
        debug!("chmod {:o} {}", mode, file.display());

        if let Err(e) = perm::chmod(file, mode) {
            exit_code = 1;
            eprintln!("{}: {}", file.display(), e);
        }
    }

    std::process::exit(exit_code)
}
