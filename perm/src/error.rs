//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fmt;
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A plain filesystem error, kept as is so that callers can match on
    /// [`io::ErrorKind`].
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A failure of the security subsystem, labelled with the failing stage.
    #[error("{context}: {source}")]
    Security { context: String, source: io::Error },

    /// Every trustee that could not be resolved while building the entries.
    #[error("creating access control entries: {}", JoinDisplay(.0))]
    Entries(Vec<Error>),

    /// The operation failed and removing what it had created failed as well.
    #[error("{error}; removing {path}: {cleanup}")]
    Cleanup {
        #[source]
        error: Box<Error>,
        path: String,
        cleanup: io::Error,
    },

    #[error("invalid mode: '{0}'")]
    InvalidMode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The kind of the underlying I/O error.  Joined errors report the kind
    /// of the first one.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Io(e) => e.kind(),
            Error::Security { source, .. } => source.kind(),
            Error::Entries(errs) => errs.first().map_or(io::ErrorKind::Other, Error::kind),
            Error::Cleanup { error, .. } => error.kind(),
            Error::InvalidMode(_) => io::ErrorKind::InvalidInput,
        }
    }

    /// Attaches a failed cleanup to `self`, unless the cleanup succeeded.
    pub(crate) fn with_cleanup(self, path: &std::path::Path, cleanup: io::Result<()>) -> Error {
        match cleanup {
            Ok(()) => self,
            Err(e) => {
                log::warn!("removing {} after failure: {}", path.display(), e);
                Error::Cleanup {
                    error: Box::new(self),
                    path: path.display().to_string(),
                    cleanup: e,
                }
            }
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}

struct JoinDisplay<'a>(&'a [Error]);

impl fmt::Display for JoinDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }

        Ok(())
    }
}

/// Labels security subsystem errors with the stage that produced them.
pub trait Context<T> {
    fn context(self, stage: &str) -> Result<T>;

    fn with_context<F: FnOnce() -> String>(self, stage: F) -> Result<T>;
}

impl<T> Context<T> for io::Result<T> {
    fn context(self, stage: &str) -> Result<T> {
        self.map_err(|source| Error::Security {
            context: stage.to_string(),
            source,
        })
    }

    fn with_context<F: FnOnce() -> String>(self, stage: F) -> Result<T> {
        self.map_err(|source| Error::Security {
            context: stage(),
            source,
        })
    }
}
