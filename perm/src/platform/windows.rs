//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Permissions kept in the discretionary access control lists of the
//! Windows security API.

use crate::acl_fs::AclFs;
use crate::error::Result;
use crate::info::FileInfo;
use crate::mask::AccessMask;
use crate::mode::Mode;
use crate::open::OpenFlags;
use crate::security::{Ace, Descriptor, ExplicitAccess, Security};
use crate::sid::{Sid, WellKnownSid};
use std::ffi::c_void;
use std::fs::File;
use std::io;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use std::slice;

use windows_sys::Win32::Foundation::{
    CloseHandle, LocalFree, ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS, HANDLE,
};
use windows_sys::Win32::Security::Authorization::{
    GetNamedSecurityInfoW, SetEntriesInAclW, SetNamedSecurityInfoW, EXPLICIT_ACCESS_W,
    GRANT_ACCESS, NO_MULTIPLE_TRUSTEE, SE_FILE_OBJECT, TRUSTEE_IS_SID, TRUSTEE_IS_UNKNOWN,
    TRUSTEE_W,
};
use windows_sys::Win32::Security::{
    CreateWellKnownSid, GetAce, GetLengthSid, GetTokenInformation, InitializeAcl,
    TokenPrimaryGroup, TokenUser, WinCreatorGroupSid, WinCreatorOwnerSid, WinWorldSid,
    ACCESS_ALLOWED_ACE, ACL, ACL_REVISION, DACL_SECURITY_INFORMATION,
    GROUP_SECURITY_INFORMATION, OWNER_SECURITY_INFORMATION,
    PROTECTED_DACL_SECURITY_INFORMATION, TOKEN_INFORMATION_CLASS, TOKEN_PRIMARY_GROUP,
    TOKEN_QUERY, TOKEN_USER,
};
use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

// SECURITY_MAX_SID_SIZE
const MAX_SID_SIZE: usize = 68;

const NO_INHERITANCE: u32 = 0;

fn win32(code: u32) -> io::Result<()> {
    if code == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(code as i32))
    }
}

fn wide(path: &Path) -> Vec<u16> {
    path.as_os_str().encode_wide().chain(Some(0)).collect()
}

/// Copies the identifier at `psid` out of memory owned by the system.
///
/// # Safety
/// `psid` must be null or point to a valid SID.
unsafe fn sid_from_ptr(psid: *mut c_void) -> io::Result<Sid> {
    if psid.is_null() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no sid present"));
    }

    let len = GetLengthSid(psid) as usize;
    Sid::from_bytes(slice::from_raw_parts(psid as *const u8, len))
}

/// A SID in a suitably aligned buffer, for handing to the system.
struct SidBuf(Vec<u32>);

impl SidBuf {
    fn new(sid: &Sid) -> SidBuf {
        let bytes = sid.to_bytes();
        let mut buf = vec![0u32; bytes.len().div_ceil(4)];
        for (word, chunk) in buf.iter_mut().zip(bytes.chunks(4)) {
            let mut raw = [0u8; 4];
            raw[..chunk.len()].copy_from_slice(chunk);
            *word = u32::from_ne_bytes(raw);
        }

        SidBuf(buf)
    }

    fn as_psid(&self) -> *mut c_void {
        self.0.as_ptr() as *mut c_void
    }
}

struct Token(HANDLE);

impl Token {
    fn current_process() -> io::Result<Token> {
        let mut handle: HANDLE = ptr::null_mut();
        // SAFETY: the pseudo handle of the current process is always valid.
        if unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut handle) } == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Token(handle))
    }

    /// Queries `class`, returning the information in a buffer aligned for
    /// the structures the system writes into it.
    fn information(&self, class: TOKEN_INFORMATION_CLASS) -> io::Result<Vec<u64>> {
        let mut len = 0u32;
        // SAFETY: a null buffer of length zero only queries the length.
        let ok = unsafe { GetTokenInformation(self.0, class, ptr::null_mut(), 0, &mut len) };
        if ok == 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(ERROR_INSUFFICIENT_BUFFER as i32) {
                return Err(err);
            }
        }

        let mut buf = vec![0u64; (len as usize).div_ceil(mem::size_of::<u64>())];
        // SAFETY: buf holds at least len bytes.
        let ok = unsafe {
            GetTokenInformation(self.0, class, buf.as_mut_ptr().cast(), len, &mut len)
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(buf)
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.0) };
    }
}

/// An access control list built by the system, or an empty one.
///
/// `SetEntriesInAclW` gives no list at all for zero entries, and setting no
/// list grants everyone full access, the opposite of mode 000.
pub enum NativeAcl {
    Local(*mut ACL),
    Empty(Box<ACL>),
}

impl NativeAcl {
    fn empty() -> io::Result<NativeAcl> {
        let mut acl = Box::new(ACL {
            AclRevision: 0,
            Sbz1: 0,
            AclSize: 0,
            AceCount: 0,
            Sbz2: 0,
        });
        let size = mem::size_of::<ACL>() as u32;
        // SAFETY: acl points to size writable bytes.
        if unsafe { InitializeAcl(&mut *acl, size, ACL_REVISION) } == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(NativeAcl::Empty(acl))
    }

    fn as_ptr(&self) -> *const ACL {
        match self {
            NativeAcl::Local(acl) => *acl,
            NativeAcl::Empty(acl) => &**acl,
        }
    }
}

impl Drop for NativeAcl {
    fn drop(&mut self) {
        if let NativeAcl::Local(acl) = self {
            unsafe { LocalFree(*acl as *mut c_void) };
        }
    }
}

/// A security descriptor returned by `GetNamedSecurityInfoW`.  The owner,
/// group and list point into it.
pub struct NativeDescriptor {
    sd: *mut c_void,
    owner: *mut c_void,
    group: *mut c_void,
    dacl: *mut ACL,
}

impl Drop for NativeDescriptor {
    fn drop(&mut self) {
        unsafe { LocalFree(self.sd) };
    }
}

impl Descriptor for NativeDescriptor {
    fn owner(&self) -> io::Result<Sid> {
        // SAFETY: owner is null or points into sd, which lives as long as self.
        unsafe { sid_from_ptr(self.owner) }
    }

    fn group(&self) -> io::Result<Sid> {
        // SAFETY: as for the owner.
        unsafe { sid_from_ptr(self.group) }
    }

    fn ace_count(&self) -> io::Result<u32> {
        if self.dacl.is_null() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no dacl present"));
        }

        // SAFETY: dacl is non-null and points into sd.
        Ok(u32::from(unsafe { (*self.dacl).AceCount }))
    }

    fn ace(&self, index: u32) -> io::Result<Ace> {
        let mut ace: *mut c_void = ptr::null_mut();
        // SAFETY: GetAce checks index against the list.
        if unsafe { GetAce(self.dacl, index, &mut ace) } == 0 {
            return Err(io::Error::last_os_error());
        }

        // Allowed and denied entries share this layout.
        let ace = ace as *const ACCESS_ALLOWED_ACE;
        // SAFETY: GetAce returned a pointer to an entry inside the list.
        unsafe {
            let mask = (*ace).Mask;
            let sid = ptr::addr_of!((*ace).SidStart) as *mut c_void;

            Ok(Ace {
                sid: sid_from_ptr(sid)?,
                mask: AccessMask::from_bits(mask),
            })
        }
    }
}

/// The security API of the running system.
pub struct NativeSecurity;

impl NativeSecurity {
    fn token_sid(class: TOKEN_INFORMATION_CLASS) -> io::Result<Sid> {
        let token = Token::current_process()?;
        let buf = token.information(class)?;

        // SAFETY: the system wrote the structure for class into buf, and the
        // SID it points to is stored in buf as well.
        unsafe {
            let psid = if class == TokenUser {
                (*(buf.as_ptr() as *const TOKEN_USER)).User.Sid
            } else {
                (*(buf.as_ptr() as *const TOKEN_PRIMARY_GROUP)).PrimaryGroup
            };

            sid_from_ptr(psid)
        }
    }
}

impl Security for NativeSecurity {
    type Acl = NativeAcl;
    type Descriptor = NativeDescriptor;

    fn well_known_sid(&self, kind: WellKnownSid) -> io::Result<Sid> {
        let kind = match kind {
            WellKnownSid::CreatorOwner => WinCreatorOwnerSid,
            WellKnownSid::CreatorGroup => WinCreatorGroupSid,
            WellKnownSid::World => WinWorldSid,
        };

        let mut buf = [0u32; MAX_SID_SIZE / 4];
        let mut size = MAX_SID_SIZE as u32;
        let psid = buf.as_mut_ptr() as *mut c_void;
        // SAFETY: buf has room for the largest possible SID.
        if unsafe { CreateWellKnownSid(kind, ptr::null_mut(), psid, &mut size) } == 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: CreateWellKnownSid initialized the SID.
        unsafe { sid_from_ptr(psid) }
    }

    fn current_user(&self) -> io::Result<Sid> {
        NativeSecurity::token_sid(TokenUser)
    }

    fn primary_group(&self) -> io::Result<Sid> {
        NativeSecurity::token_sid(TokenPrimaryGroup)
    }

    fn acl_from_entries(&self, entries: &[ExplicitAccess]) -> io::Result<NativeAcl> {
        if entries.is_empty() {
            return NativeAcl::empty();
        }

        let sids: Vec<SidBuf> = entries.iter().map(|e| SidBuf::new(&e.trustee)).collect();
        let explicit: Vec<EXPLICIT_ACCESS_W> = entries
            .iter()
            .zip(&sids)
            .map(|(entry, sid)| EXPLICIT_ACCESS_W {
                grfAccessPermissions: entry.permissions.bits(),
                grfAccessMode: GRANT_ACCESS,
                grfInheritance: NO_INHERITANCE,
                Trustee: TRUSTEE_W {
                    pMultipleTrustee: ptr::null_mut(),
                    MultipleTrusteeOperation: NO_MULTIPLE_TRUSTEE,
                    TrusteeForm: TRUSTEE_IS_SID,
                    TrusteeType: TRUSTEE_IS_UNKNOWN,
                    ptstrName: sid.as_psid() as *mut u16,
                },
            })
            .collect();

        let mut acl: *mut ACL = ptr::null_mut();
        // SAFETY: the trustee SIDs in sids outlive the call.
        win32(unsafe {
            SetEntriesInAclW(
                explicit.len() as u32,
                explicit.as_ptr(),
                ptr::null(),
                &mut acl,
            )
        })?;

        Ok(NativeAcl::Local(acl))
    }

    fn set_protected_dacl(&self, path: &Path, acl: &NativeAcl) -> io::Result<()> {
        let name = wide(path);
        let info = DACL_SECURITY_INFORMATION | PROTECTED_DACL_SECURITY_INFORMATION;

        // SAFETY: name is nul-terminated and acl is a valid list.
        win32(unsafe {
            SetNamedSecurityInfoW(
                name.as_ptr(),
                SE_FILE_OBJECT,
                info,
                ptr::null_mut(),
                ptr::null_mut(),
                acl.as_ptr(),
                ptr::null(),
            )
        })
    }

    fn descriptor(&self, path: &Path) -> io::Result<NativeDescriptor> {
        let name = wide(path);
        let info =
            OWNER_SECURITY_INFORMATION | GROUP_SECURITY_INFORMATION | DACL_SECURITY_INFORMATION;

        let mut owner = ptr::null_mut();
        let mut group = ptr::null_mut();
        let mut dacl = ptr::null_mut();
        let mut sd = ptr::null_mut();
        // SAFETY: name is nul-terminated, the rest are out pointers.
        win32(unsafe {
            GetNamedSecurityInfoW(
                name.as_ptr(),
                SE_FILE_OBJECT,
                info,
                &mut owner,
                &mut group,
                &mut dacl,
                ptr::null_mut(),
                &mut sd,
            )
        })?;

        Ok(NativeDescriptor {
            sd,
            owner,
            group,
            dacl,
        })
    }
}

fn acl_fs() -> AclFs<NativeSecurity> {
    AclFs::new(NativeSecurity)
}

pub fn chmod(path: &Path, mode: Mode) -> Result<()> {
    acl_fs().chmod(path, mode)
}

pub fn mkdir(path: &Path, mode: Mode) -> Result<()> {
    acl_fs().mkdir(path, mode)
}

pub fn mkdir_all(path: &Path, mode: Mode) -> Result<()> {
    acl_fs().mkdir_all(path, mode)
}

pub fn open_file(path: &Path, flags: OpenFlags, mode: Mode) -> Result<File> {
    acl_fs().open_file(path, flags, mode)
}

pub fn write_file(path: &Path, data: &[u8], mode: Mode) -> Result<()> {
    acl_fs().write_file(path, data, mode)
}

pub fn stat(path: &Path) -> Result<FileInfo> {
    acl_fs().stat(path)
}
