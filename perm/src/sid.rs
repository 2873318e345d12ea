//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Security identifiers.

use std::fmt;
use std::io;
use std::str::FromStr;

const SID_REVISION: u8 = 1;
const MAX_SUB_AUTHORITIES: usize = 15;

/// An owned security identifier.
///
/// The binary form is the one Windows uses: revision, sub-authority count, a
/// 48-bit big-endian identifier authority, then little-endian sub-authorities.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sid {
    authority: u64,
    sub_authorities: Vec<u32>,
}

impl Sid {
    pub fn new(authority: u64, sub_authorities: &[u32]) -> Sid {
        Sid {
            authority: authority & 0xffff_ffff_ffff,
            sub_authorities: sub_authorities.to_vec(),
        }
    }

    pub fn authority(&self) -> u64 {
        self.authority
    }

    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Length of the binary form in bytes.
    pub fn byte_len(&self) -> usize {
        8 + 4 * self.sub_authorities.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_len());
        buf.push(SID_REVISION);
        buf.push(self.sub_authorities.len() as u8);
        buf.extend_from_slice(&self.authority.to_be_bytes()[2..]);
        for sub in &self.sub_authorities {
            buf.extend_from_slice(&sub.to_le_bytes());
        }

        buf
    }

    pub fn from_bytes(buf: &[u8]) -> io::Result<Sid> {
        if buf.len() < 8 || buf[0] != SID_REVISION {
            return Err(invalid_sid("malformed sid header"));
        }

        let count = buf[1] as usize;
        if count > MAX_SUB_AUTHORITIES || buf.len() < 8 + 4 * count {
            return Err(invalid_sid("truncated sid"));
        }

        let mut authority = [0u8; 8];
        authority[2..].copy_from_slice(&buf[2..8]);

        let sub_authorities = buf[8..8 + 4 * count]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Sid {
            authority: u64::from_be_bytes(authority),
            sub_authorities,
        })
    }
}

fn invalid_sid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-", SID_REVISION)?;
        if self.authority >> 32 == 0 {
            write!(f, "{}", self.authority)?;
        } else {
            write!(f, "{:#014X}", self.authority)?;
        }
        for sub in &self.sub_authorities {
            write!(f, "-{}", sub)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sid({})", self)
    }
}

/// Parses the `S-1-5-32-544` string form.
impl FromStr for Sid {
    type Err = io::Error;

    fn from_str(s: &str) -> io::Result<Sid> {
        let mut parts = s.split('-');
        if parts.next() != Some("S") || parts.next() != Some("1") {
            return Err(invalid_sid("sid must start with S-1-"));
        }

        let authority = match parts.next() {
            Some(a) if a.starts_with("0x") || a.starts_with("0X") => u64::from_str_radix(&a[2..], 16),
            Some(a) => a.parse::<u64>(),
            None => return Err(invalid_sid("missing identifier authority")),
        }
        .map_err(|_| invalid_sid("bad identifier authority"))?;

        let sub_authorities = parts
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid_sid("bad sub-authority"))?;

        if authority >> 48 != 0 || sub_authorities.len() > MAX_SUB_AUTHORITIES {
            return Err(invalid_sid("sid out of range"));
        }

        Ok(Sid::new(authority, &sub_authorities))
    }
}

/// The well-known identities permissions are granted to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WellKnownSid {
    /// CREATOR OWNER, S-1-3-0
    CreatorOwner,
    /// CREATOR GROUP, S-1-3-1
    CreatorGroup,
    /// Everyone, S-1-1-0
    World,
}

impl WellKnownSid {
    /// The identifier as defined by Windows; the native backend asks the
    /// system instead.
    pub fn sid(self) -> Sid {
        match self {
            WellKnownSid::CreatorOwner => Sid::new(3, &[0]),
            WellKnownSid::CreatorGroup => Sid::new(3, &[1]),
            WellKnownSid::World => Sid::new(1, &[0]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WellKnownSid::CreatorOwner => "creator owner",
            WellKnownSid::CreatorGroup => "creator group",
            WellKnownSid::World => "everyone",
        }
    }
}
