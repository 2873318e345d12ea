//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! File operations for platforms that keep permissions in access control
//! lists.  The object itself is created with [`std::fs`], its permissions
//! are then set through a [`Security`] implementation.

use crate::apply::apply;
use crate::error::{Context, Result};
use crate::info::FileInfo;
use crate::mode::Mode;
use crate::open::OpenFlags;
use crate::read::read_mode;
use crate::security::{Security, Trustees};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub struct AclFs<S> {
    security: S,
}

impl<S: Security> AclFs<S> {
    pub fn new(security: S) -> AclFs<S> {
        AclFs { security }
    }

    pub fn security(&self) -> &S {
        &self.security
    }

    pub fn chmod(&self, path: &Path, mode: Mode) -> Result<()> {
        let metadata = fs::metadata(path)?;

        apply(
            &self.security,
            path,
            mode,
            metadata.is_dir(),
            Trustees::Creator,
        )
    }

    /// Creates a directory owned by the current user.  If its permissions
    /// cannot be set the directory is removed again.
    pub fn mkdir(&self, path: &Path, mode: Mode) -> Result<()> {
        let path = std::path::absolute(path).context("computing absolute path")?;

        fs::create_dir(&path)?;

        apply(&self.security, &path, mode, true, Trustees::CurrentUser)
            .map_err(|e| e.with_cleanup(&path, fs::remove_dir(&path)))
    }

    /// Creates `path` and every missing parent, all with `mode`.
    pub fn mkdir_all(&self, path: &Path, mode: Mode) -> Result<()> {
        if path.is_dir() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.mkdir_all(parent, mode)?;
            }
        }

        match self.mkdir(path, mode) {
            // lost a race against another creator
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            res => res,
        }
    }

    /// Opens `path`.  A file that did not exist before gets `mode` once it
    /// has been created, and is removed again if that fails.  Existing files
    /// keep their permissions.
    pub fn open_file(&self, path: &Path, flags: OpenFlags, mode: Mode) -> Result<File> {
        if !flags.creates() {
            return Ok(flags.to_options().open(path)?);
        }

        let existed = match fs::metadata(path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let file = flags.to_options().open(path)?;
        if existed {
            return Ok(file);
        }

        match apply(&self.security, path, mode, false, Trustees::Creator) {
            Ok(()) => Ok(file),
            Err(e) => {
                drop(file);
                Err(e.with_cleanup(path, fs::remove_file(path)))
            }
        }
    }

    pub fn write_file(&self, path: &Path, data: &[u8], mode: Mode) -> Result<()> {
        let mut file = self.open_file(path, OpenFlags::create_truncate(), mode)?;
        file.write_all(data)?;

        Ok(())
    }

    /// Queries `path`, taking the permission bits from its access control
    /// list and the file type from the native metadata.
    pub fn stat(&self, path: &Path) -> Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        let native = Mode::from_file_type(metadata.file_type());
        let perm = read_mode(&self.security, path)?;

        Ok(FileInfo::new(path, metadata, native.with_perm(perm)))
    }
}
