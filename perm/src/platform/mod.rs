//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

// Every platform provides the same set of functions:
// chmod, mkdir, mkdir_all, open_file, write_file and stat.
cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use self::windows::*;
    } else {
        mod unix;
        pub use self::unix::*;
    }
}
