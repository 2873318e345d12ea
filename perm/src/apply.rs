//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Setting permissions as a protected access control list.

use crate::error::{Context, Error, Result};
use crate::mask::{mode_to_masks, TriadMasks};
use crate::mode::{Class, Mode};
use crate::security::{ExplicitAccess, Security, Trustees};
use std::path::Path;

/// Builds one grant per class with a non-empty mask.
///
/// Classes without permissions get no entry at all: an explicit grant of
/// nothing is not the same as no entry.  Resolution errors of all trustees
/// are collected into a single [`Error::Entries`].
pub fn explicit_entries<S: Security>(
    security: &S,
    masks: &TriadMasks,
    trustees: Trustees,
) -> Result<Vec<ExplicitAccess>> {
    let mut entries = Vec::with_capacity(Class::ALL.len());
    let mut errs = Vec::new();

    for class in Class::ALL {
        let permissions = masks.get(class);
        if permissions.is_empty() {
            continue;
        }

        match trustees.resolve(security, class) {
            Ok(trustee) => entries.push(ExplicitAccess {
                trustee,
                permissions,
            }),
            Err(e) => errs.push(e),
        }
    }

    if !errs.is_empty() {
        return Err(Error::Entries(errs));
    }

    Ok(entries)
}

/// Replaces the access control list of `path` with the one equivalent to
/// the permission triads of `mode`.
///
/// Nothing is written unless every entry and the list itself were built.
pub fn apply<S: Security>(
    security: &S,
    path: &Path,
    mode: Mode,
    is_dir: bool,
    trustees: Trustees,
) -> Result<()> {
    let masks = mode_to_masks(mode, is_dir);
    let entries = explicit_entries(security, &masks, trustees)?;

    let acl = security
        .acl_from_entries(&entries)
        .context("creating access control list")?;

    security
        .set_protected_dacl(path, &acl)
        .context("setting security descriptor")?;

    log::debug!(
        "applied {:o} to {}: owner {:#x}, group {:#x}, other {:#x}",
        mode.perm(),
        path.display(),
        masks.owner,
        masks.group,
        masks.other
    );

    Ok(())
}
