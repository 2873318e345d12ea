//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Recovering permission triads from an access control list.

use crate::error::{Context, Result};
use crate::mask::{masks_to_mode, TriadMasks};
use crate::mode::{Class, Mode};
use crate::security::{Descriptor, Security};
use crate::sid::{Sid, WellKnownSid};
use std::path::Path;

/// Decides which class an entry for `sid` grants permissions to.
///
/// The creator placeholders count as the owner and the group, since that is
/// what [`Trustees::Creator`](crate::Trustees::Creator) writes.  Anything
/// unknown is other.
pub fn classify(sid: &Sid, owner: &Sid, group: &Sid) -> Class {
    if sid == owner || *sid == WellKnownSid::CreatorOwner.sid() {
        Class::Owner
    } else if sid == group || *sid == WellKnownSid::CreatorGroup.sid() {
        Class::Group
    } else {
        Class::Other
    }
}

/// Collects the masks of every entry of the descriptor's list per class.
/// Entries of the same class are combined.
pub fn descriptor_masks<D: Descriptor>(descriptor: &D) -> Result<TriadMasks> {
    let count = descriptor
        .ace_count()
        .context("getting discretionary access control list")?;
    let owner = descriptor.owner().context("getting owner sid")?;
    let group = descriptor.group().context("getting group sid")?;

    let mut masks = TriadMasks::default();
    for i in 0..count {
        let ace = descriptor
            .ace(i)
            .with_context(|| format!("getting access control entry at index {i}"))?;

        let class = classify(&ace.sid, &owner, &group);
        log::trace!("entry {i}: {} {:#x} as {:?}", ace.sid, ace.mask, class);

        *masks.get_mut(class) |= ace.mask;
    }

    Ok(masks)
}

/// Reads the permission triads of `path` from its access control list.
pub fn read_mode<S: Security>(security: &S, path: &Path) -> Result<Mode> {
    let descriptor = security
        .descriptor(path)
        .context("getting security descriptor")?;

    let masks = descriptor_masks(&descriptor)?;
    let mode = masks_to_mode(&masks);

    log::debug!("read {:o} from {}: {:?}", mode, path.display(), masks);

    Ok(mode)
}
