//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The native permissions already are POSIX modes, so everything is passed
//! through unchanged.

use crate::error::Result;
use crate::info::FileInfo;
use crate::mode::Mode;
use crate::open::OpenFlags;
use std::fs::{self, DirBuilder, File, Permissions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

pub fn chmod(path: &Path, mode: Mode) -> Result<()> {
    fs::set_permissions(path, Permissions::from_mode(mode.mode_bits().bits()))?;

    Ok(())
}

pub fn mkdir(path: &Path, mode: Mode) -> Result<()> {
    DirBuilder::new()
        .mode(mode.mode_bits().bits())
        .create(path)?;

    Ok(())
}

pub fn mkdir_all(path: &Path, mode: Mode) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(mode.mode_bits().bits())
        .create(path)?;

    Ok(())
}

pub fn open_file(path: &Path, flags: OpenFlags, mode: Mode) -> Result<File> {
    let file = flags
        .to_options()
        .mode(mode.mode_bits().bits())
        .open(path)?;

    Ok(file)
}

pub fn write_file(path: &Path, data: &[u8], mode: Mode) -> Result<()> {
    let mut file = open_file(path, OpenFlags::create_truncate(), mode)?;
    file.write_all(data)?;

    Ok(())
}

pub fn stat(path: &Path) -> Result<FileInfo> {
    let metadata = fs::metadata(path)?;
    let mode = Mode::from_bits(metadata.mode());

    Ok(FileInfo::new(path, metadata, mode))
}
