//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! An in-memory [`Security`] for exercising the permission layer on any
//! platform.

use crate::mask::AccessMask;
use crate::security::{Ace, Descriptor, ExplicitAccess, Security};
use crate::sid::{Sid, WellKnownSid};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn user_sid() -> Sid {
    Sid::new(5, &[21, 1_111, 2_222, 3_333, 1_001])
}

pub fn group_sid() -> Sid {
    Sid::new(5, &[21, 1_111, 2_222, 3_333, 513])
}

/// Stores one access control list per path.  Every object is owned by
/// [`user_sid`] and [`group_sid`].
#[derive(Default)]
pub struct MemorySecurity {
    pub(crate) dacls: Mutex<HashMap<PathBuf, Vec<Ace>>>,

    /// Well-known identifiers that fail to resolve.
    pub broken_sids: Vec<WellKnownSid>,
    pub broken_user: bool,
    pub broken_acl: bool,
    pub broken_set: bool,
    /// Leaves a file behind in the object when setting the list fails.
    pub litter_on_set: bool,
    pub broken_descriptor: bool,
}

impl MemorySecurity {
    pub fn new() -> MemorySecurity {
        MemorySecurity::default()
    }

    pub fn dacl(&self, path: &Path) -> Option<Vec<Ace>> {
        self.dacls.lock().unwrap().get(path).cloned()
    }

    /// Replaces the list of `path` without going through the permission layer,
    /// like another tool would.
    pub fn put_dacl(&self, path: &Path, aces: Vec<Ace>) {
        self.dacls.lock().unwrap().insert(path.to_path_buf(), aces);
    }
}

fn failure(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, format!("{what} failed"))
}

impl Security for MemorySecurity {
    type Acl = Vec<Ace>;
    type Descriptor = MemoryDescriptor;

    fn well_known_sid(&self, kind: WellKnownSid) -> io::Result<Sid> {
        if self.broken_sids.contains(&kind) {
            return Err(failure("CreateWellKnownSid"));
        }

        Ok(kind.sid())
    }

    fn current_user(&self) -> io::Result<Sid> {
        if self.broken_user {
            return Err(failure("GetTokenInformation"));
        }

        Ok(user_sid())
    }

    fn primary_group(&self) -> io::Result<Sid> {
        if self.broken_user {
            return Err(failure("GetTokenInformation"));
        }

        Ok(group_sid())
    }

    fn acl_from_entries(&self, entries: &[ExplicitAccess]) -> io::Result<Vec<Ace>> {
        if self.broken_acl {
            return Err(failure("SetEntriesInAcl"));
        }

        Ok(entries
            .iter()
            .map(|e| Ace {
                sid: e.trustee.clone(),
                mask: e.permissions,
            })
            .collect())
    }

    fn set_protected_dacl(&self, path: &Path, acl: &Vec<Ace>) -> io::Result<()> {
        if self.broken_set {
            if self.litter_on_set {
                std::fs::write(path.join("litter"), b"")?;
            }
            return Err(failure("SetNamedSecurityInfo"));
        }
        if !path.exists() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        self.put_dacl(path, acl.clone());

        Ok(())
    }

    fn descriptor(&self, path: &Path) -> io::Result<MemoryDescriptor> {
        if self.broken_descriptor {
            return Err(failure("GetNamedSecurityInfo"));
        }

        Ok(MemoryDescriptor {
            owner: user_sid(),
            group: group_sid(),
            dacl: self.dacl(path),
        })
    }
}

pub struct MemoryDescriptor {
    owner: Sid,
    group: Sid,
    dacl: Option<Vec<Ace>>,
}

impl Descriptor for MemoryDescriptor {
    fn owner(&self) -> io::Result<Sid> {
        Ok(self.owner.clone())
    }

    fn group(&self) -> io::Result<Sid> {
        Ok(self.group.clone())
    }

    fn ace_count(&self) -> io::Result<u32> {
        match &self.dacl {
            Some(aces) => Ok(aces.len() as u32),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no dacl present")),
        }
    }

    fn ace(&self, index: u32) -> io::Result<Ace> {
        self.dacl
            .as_ref()
            .and_then(|aces| aces.get(index as usize))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "ace index out of range"))
    }
}

pub fn ace(sid: Sid, mask: AccessMask) -> Ace {
    Ace { sid, mask }
}
