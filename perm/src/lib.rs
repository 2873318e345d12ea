//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! POSIX permission bits on every platform.
//!
//! On unix the functions here are thin wrappers around [`std::fs`].  On
//! Windows, where permissions live in access control lists, the permission
//! triads are translated into a protected list granting the owner, the group
//! and everyone the equivalent access rights, and [`stat`] translates the
//! list back into a mode.

pub mod acl_fs;
pub mod apply;
pub mod error;
pub mod info;
pub mod mask;
pub mod mode;
pub mod open;
mod platform;
pub mod read;
pub mod security;
pub mod sid;

#[cfg(test)]
pub(crate) mod testing;

pub use acl_fs::AclFs;
pub use error::{Error, Result};
pub use info::FileInfo;
pub use mask::{masks_to_mode, mode_to_masks, AccessMask, TriadMasks};
pub use mode::{Class, Mode};
pub use open::OpenFlags;
pub use security::{Security, Trustees};
pub use sid::{Sid, WellKnownSid};

#[cfg(windows)]
pub use platform::NativeSecurity;

use std::fs::File;
use std::path::Path;

pub const PROJECT_NAME: &str = "posixutils-rs";

/// Sets the permission and special bits of `path`.
pub fn chmod<P: AsRef<Path>, M: Into<Mode>>(path: P, mode: M) -> Result<()> {
    platform::chmod(path.as_ref(), mode.into())
}

/// Creates the directory `path` with permissions `mode`.
pub fn mkdir<P: AsRef<Path>, M: Into<Mode>>(path: P, mode: M) -> Result<()> {
    platform::mkdir(path.as_ref(), mode.into())
}

/// Creates `path` and all missing parents, each with permissions `mode`.  An
/// existing directory is not an error.
pub fn mkdir_all<P: AsRef<Path>, M: Into<Mode>>(path: P, mode: M) -> Result<()> {
    platform::mkdir_all(path.as_ref(), mode.into())
}

/// Opens `path`; a file created by the call gets permissions `mode`.
pub fn open_file<P: AsRef<Path>, M: Into<Mode>>(path: P, flags: OpenFlags, mode: M) -> Result<File> {
    platform::open_file(path.as_ref(), flags, mode.into())
}

/// Writes `data` to `path`, creating it with permissions `mode` or
/// truncating it.
pub fn write_file<P: AsRef<Path>, D: AsRef<[u8]>, M: Into<Mode>>(
    path: P,
    data: D,
    mode: M,
) -> Result<()> {
    platform::write_file(path.as_ref(), data.as_ref(), mode.into())
}

/// Queries `path`, with [`FileInfo::mode`] holding the portable mode.
pub fn stat<P: AsRef<Path>>(path: P) -> Result<FileInfo> {
    platform::stat(path.as_ref())
}
