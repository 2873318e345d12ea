//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Translation between permission triads and Windows access masks.
//!
//! Every triad is mapped onto the generic rights byte of its own mask, see
//! <https://learn.microsoft.com/en-us/windows-hardware/drivers/ifs/access-mask>.
//! Write permission also grants `DELETE`, since POSIX lets a writer truncate a
//! file and Windows gates that separately.  Directories additionally need the
//! object specific list, traverse, delete child and write EA rights, which are
//! only ever written: the reader recovers the triad from the generic and
//! `DELETE` bits alone.

use crate::mode::{Class, Mode};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A Windows `ACCESS_MASK`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessMask(u32);

impl AccessMask {
    pub const GENERIC_READ: AccessMask = AccessMask(0x8000_0000);
    pub const GENERIC_WRITE: AccessMask = AccessMask(0x4000_0000);
    pub const GENERIC_EXECUTE: AccessMask = AccessMask(0x2000_0000);
    pub const GENERIC_ALL: AccessMask = AccessMask(0x1000_0000);

    pub const DELETE: AccessMask = AccessMask(0x0001_0000);

    pub const FILE_LIST_DIRECTORY: AccessMask = AccessMask(0x0000_0001);
    pub const FILE_WRITE_EA: AccessMask = AccessMask(0x0000_0010);
    pub const FILE_TRAVERSE: AccessMask = AccessMask(0x0000_0020);
    pub const FILE_DELETE_CHILD: AccessMask = AccessMask(0x0000_0040);

    pub const fn from_bits(bits: u32) -> AccessMask {
        AccessMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: AccessMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AccessMask {
    type Output = AccessMask;

    fn bitor(self, rhs: AccessMask) -> AccessMask {
        AccessMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for AccessMask {
    fn bitor_assign(&mut self, rhs: AccessMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AccessMask {
    type Output = AccessMask;

    fn bitand(self, rhs: AccessMask) -> AccessMask {
        AccessMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for AccessMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessMask({:#010x})", self.0)
    }
}

impl fmt::LowerHex for AccessMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// One access mask per permission class.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TriadMasks {
    pub owner: AccessMask,
    pub group: AccessMask,
    pub other: AccessMask,
}

impl TriadMasks {
    pub const fn new(owner: AccessMask, group: AccessMask, other: AccessMask) -> TriadMasks {
        TriadMasks {
            owner,
            group,
            other,
        }
    }

    pub fn get(&self, class: Class) -> AccessMask {
        match class {
            Class::Owner => self.owner,
            Class::Group => self.group,
            Class::Other => self.other,
        }
    }

    pub fn get_mut(&mut self, class: Class) -> &mut AccessMask {
        match class {
            Class::Owner => &mut self.owner,
            Class::Group => &mut self.group,
            Class::Other => &mut self.other,
        }
    }
}

// Shift amounts from a class' read or write bit in the mode to the access
// right it maps to.  Negative amounts shift right.
struct Shifts {
    generic: u32,
    delete: u32,
    list_dir: i32,
    traverse: i32,
    delete_child: i32,
    write_ea: i32,
}

const OWNER_SHIFTS: Shifts = Shifts {
    generic: 23,
    delete: 9,
    list_dir: -8,
    traverse: -3,
    delete_child: -1,
    write_ea: -3,
};

const GROUP_SHIFTS: Shifts = Shifts {
    generic: 26,
    delete: 12,
    list_dir: -5,
    traverse: 0,
    delete_child: 2,
    write_ea: 0,
};

const OTHER_SHIFTS: Shifts = Shifts {
    generic: 29,
    delete: 15,
    list_dir: -2,
    traverse: 3,
    delete_child: 5,
    write_ea: 3,
};

impl Shifts {
    const fn of(class: Class) -> &'static Shifts {
        match class {
            Class::Owner => &OWNER_SHIFTS,
            Class::Group => &GROUP_SHIFTS,
            Class::Other => &OTHER_SHIFTS,
        }
    }
}

const fn shift(bits: u32, by: i32) -> u32 {
    if by >= 0 {
        bits << by
    } else {
        bits >> -by
    }
}

fn class_mask(mode: u32, class: Class, is_dir: bool) -> AccessMask {
    let shifts = Shifts::of(class);
    let read = mode & class.read();
    let write = mode & class.write();

    let mut mask = ((mode & class.bits()) << shifts.generic) | (write << shifts.delete);
    if is_dir {
        mask |= shift(read, shifts.list_dir);
        mask |= shift(read, shifts.traverse);
        mask |= shift(write, shifts.delete_child);
        mask |= shift(write, shifts.write_ea);
    }

    AccessMask(mask)
}

/// Converts the permission triads of `mode` into owner, group and other
/// access masks.  `is_dir` adds the directory specific rights.
///
/// Bits outside [`Mode::PERM`] are ignored.  A class without permissions gets
/// an empty mask, and must get no access control entry at all.
pub fn mode_to_masks(mode: Mode, is_dir: bool) -> TriadMasks {
    let bits = mode.perm().bits();

    TriadMasks {
        owner: class_mask(bits, Class::Owner, is_dir),
        group: class_mask(bits, Class::Group, is_dir),
        other: class_mask(bits, Class::Other, is_dir),
    }
}

/// Converts owner, group and other access masks back into permission triads.
///
/// Only the generic rights and `DELETE` are consulted, so the result is exact
/// for masks made by [`mode_to_masks`] and lossy for anything else.
pub fn masks_to_mode(masks: &TriadMasks) -> Mode {
    let perm = Class::ALL.iter().fold(0, |perm, &class| {
        let shifts = Shifts::of(class);
        let mask = masks.get(class).bits();

        perm | ((mask >> shifts.generic) & class.bits()) | ((mask >> shifts.delete) & class.write())
    });

    Mode::from_bits(perm)
}
