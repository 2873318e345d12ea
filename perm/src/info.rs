//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::mode::Mode;
use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::ops::Deref;
use std::path::Path;

/// File metadata with a portable [`mode`](FileInfo::mode).
///
/// Everything but the mode is answered by the wrapped [`Metadata`], which is
/// reachable through `Deref`.
#[derive(Debug, Clone)]
pub struct FileInfo {
    name: OsString,
    metadata: Metadata,
    mode: Mode,
}

impl FileInfo {
    pub(crate) fn new(path: &Path, metadata: Metadata, mode: Mode) -> FileInfo {
        let name = path
            .file_name()
            .map_or_else(|| path.as_os_str().to_os_string(), OsStr::to_os_string);

        FileInfo {
            name,
            metadata,
            mode,
        }
    }

    /// The last component of the path the info was queried for.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// The file type bits combined with the permission and special bits.  On
    /// Windows the permission bits come from the access control list.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }
}

impl Deref for FileInfo {
    type Target = Metadata;

    fn deref(&self) -> &Metadata {
        &self.metadata
    }
}
