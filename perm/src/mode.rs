//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! File mode values: file type, special bits and the three permission triads.

use crate::error::Error;
use std::fmt;
use std::fs::FileType;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

/// A full POSIX file mode.
///
/// Only the low nine bits ([`Mode::PERM`]) take part in the translation to and
/// from access masks.  The special bits and the file type bits are carried
/// along untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode(u32);

impl Mode {
    /// rwxrwxrwx
    pub const PERM: Mode = Mode(0o777);

    pub const SETUID: Mode = Mode(0o4000);
    pub const SETGID: Mode = Mode(0o2000);
    pub const STICKY: Mode = Mode(0o1000);

    /// Permission and special bits, what chmod(2) accepts.
    pub const ALL: Mode = Mode(0o7777);

    pub const TYPE_MASK: Mode = Mode(0o170000);
    pub const TYPE_DIR: Mode = Mode(0o040000);
    pub const TYPE_FILE: Mode = Mode(0o100000);
    pub const TYPE_SYMLINK: Mode = Mode(0o120000);

    pub const fn from_bits(bits: u32) -> Mode {
        Mode(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns only the permission triads.
    pub const fn perm(self) -> Mode {
        Mode(self.0 & Self::PERM.0)
    }

    /// Returns only the permission and special bits.
    pub const fn mode_bits(self) -> Mode {
        Mode(self.0 & Self::ALL.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Replaces the permission triads of `self` with those of `perm`, keeping
    /// every other bit.
    pub const fn with_perm(self, perm: Mode) -> Mode {
        Mode((self.0 & !Self::PERM.0) | perm.perm().0)
    }

    /// Synthesizes the type bits for a file type reported by the platform.
    ///
    /// Used where the platform has no native mode to overlay permissions on.
    pub fn from_file_type(file_type: FileType) -> Mode {
        if file_type.is_symlink() {
            Self::TYPE_SYMLINK
        } else if file_type.is_dir() {
            Self::TYPE_DIR
        } else if file_type.is_file() {
            Self::TYPE_FILE
        } else {
            Mode(0)
        }
    }

    /// Extracts the three bits of `class` shifted down to `0o7`.
    pub const fn triad(self, class: Class) -> u32 {
        (self.0 >> class.offset()) & 0o7
    }
}

/// Parses an octal mode such as `755` or `0644`.
impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Mode, Error> {
        // from_str_radix alone would also take a leading '+'
        if s.is_empty() || !s.chars().all(|c| c.is_digit(8)) {
            return Err(Error::InvalidMode(s.to_string()));
        }

        match u32::from_str_radix(s, 8) {
            Ok(bits) if bits <= Self::ALL.0 => Ok(Mode(bits)),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Mode {
        Mode(bits)
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> u32 {
        mode.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitAnd for Mode {
    type Output = Mode;

    fn bitand(self, rhs: Mode) -> Mode {
        Mode(self.0 & rhs.0)
    }
}

impl fmt::Octal for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode({:#o})", self.0)
    }
}

/// The three classes of users a permission triad applies to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Class {
    Owner,
    Group,
    Other,
}

impl Class {
    pub const ALL: [Class; 3] = [Class::Owner, Class::Group, Class::Other];

    /// Bit position of the class' execute bit within the mode.
    pub const fn offset(self) -> u32 {
        match self {
            Class::Owner => 6,
            Class::Group => 3,
            Class::Other => 0,
        }
    }

    pub const fn read(self) -> u32 {
        0o4 << self.offset()
    }

    pub const fn write(self) -> u32 {
        0o2 << self.offset()
    }

    pub const fn execute(self) -> u32 {
        0o1 << self.offset()
    }

    /// All three bits of the class, e.g. `0o070` for the group.
    pub const fn bits(self) -> u32 {
        0o7 << self.offset()
    }
}
