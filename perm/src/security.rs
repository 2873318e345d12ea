//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The security subsystem the permission layer calls into.
//!
//! [`Security`] covers identifier resolution and reading and writing access
//! control lists.  Its real implementation is the Windows API; everything
//! built on top of it is plain bit manipulation and can run against any
//! implementation.

use crate::mask::AccessMask;
use crate::mode::Class;
use crate::sid::{Sid, WellKnownSid};
use std::io;
use std::path::Path;

/// An entry of an access control list as it is written: a grant of
/// `permissions` to `trustee`, not inherited by children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExplicitAccess {
    pub trustee: Sid,
    pub permissions: AccessMask,
}

/// An entry of an access control list as it is read back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ace {
    pub sid: Sid,
    pub mask: AccessMask,
}

/// Security information of a single filesystem object.
pub trait Descriptor {
    fn owner(&self) -> io::Result<Sid>;

    fn group(&self) -> io::Result<Sid>;

    /// Number of entries in the discretionary access control list.  Fails if
    /// the object has no such list.
    fn ace_count(&self) -> io::Result<u32>;

    fn ace(&self, index: u32) -> io::Result<Ace>;
}

pub trait Security {
    /// A built access control list, ready to be set on objects.
    type Acl;

    type Descriptor: Descriptor;

    fn well_known_sid(&self, kind: WellKnownSid) -> io::Result<Sid>;

    /// The user the process runs as.
    fn current_user(&self) -> io::Result<Sid>;

    /// The primary group of [`Security::current_user`].
    fn primary_group(&self) -> io::Result<Sid>;

    fn acl_from_entries(&self, entries: &[ExplicitAccess]) -> io::Result<Self::Acl>;

    /// Replaces the discretionary access control list of `path` with `acl` and
    /// marks it protected, so nothing is inherited from the parent.
    fn set_protected_dacl(&self, path: &Path, acl: &Self::Acl) -> io::Result<()>;

    /// Reads owner, group and discretionary access control list of `path`.
    fn descriptor(&self, path: &Path) -> io::Result<Self::Descriptor>;
}

/// Which identities receive the owner and group masks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trustees {
    /// CREATOR OWNER and CREATOR GROUP, used when changing permissions.
    Creator,
    /// The current user and their primary group, used for new directories.
    CurrentUser,
}

impl Trustees {
    /// Resolves the identity that gets the permissions of `class`.  Others
    /// are always everyone.
    pub fn resolve<S: Security>(self, security: &S, class: Class) -> crate::Result<Sid> {
        use crate::error::Context;

        match (self, class) {
            (_, Class::Other) => well_known(security, WellKnownSid::World),
            (Trustees::Creator, Class::Owner) => well_known(security, WellKnownSid::CreatorOwner),
            (Trustees::Creator, Class::Group) => well_known(security, WellKnownSid::CreatorGroup),
            (Trustees::CurrentUser, Class::Owner) => {
                security.current_user().context("resolving current user")
            }
            (Trustees::CurrentUser, Class::Group) => {
                security.primary_group().context("resolving primary group")
            }
        }
    }
}

fn well_known<S: Security>(security: &S, kind: WellKnownSid) -> crate::Result<Sid> {
    use crate::error::Context;

    security
        .well_known_sid(kind)
        .with_context(|| format!("creating sid for {}", kind.name()))
}
