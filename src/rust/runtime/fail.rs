// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::libc::{
    c_int,
    EIO,
};
use ::std::{
    error,
    fmt,
    io,
};

//==============================================================================
// Structures
//==============================================================================

/// Failure
#[derive(Clone)]
pub struct Fail {
    /// Error code.
    pub errno: c_int,
    /// Cause.
    pub cause: String,
}

//==============================================================================
// Associate Functions
//==============================================================================

/// Associate Functions for Failures
impl Fail {
    /// Creates a new Failure
    pub fn new(errno: i32, cause: &str) -> Self {
        Self {
            errno,
            cause: cause.to_string(),
        }
    }

    /// Captures the calling thread's `errno` right after the system call `op` failed.
    pub fn last_os_error(op: &str) -> Self {
        Self::from_os_error(op, io::Error::last_os_error())
    }

    /// Wraps an OS error reported by `op`. The cause carries the operation name and the OS reason.
    pub fn from_os_error(op: &str, err: io::Error) -> Self {
        Self {
            errno: err.raw_os_error().unwrap_or(EIO),
            cause: format!("{}: {}", op, err),
        }
    }
}

//==============================================================================
// Trait Implementations
//==============================================================================

/// Display Trait Implementation for Failures
impl fmt::Display for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

/// Debug trait Implementation for Failures
impl fmt::Debug for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {:?}: {:?}", self.errno, self.cause)
    }
}

/// Error Trait Implementation for Failures
impl error::Error for Fail {}

/// Conversion Trait Implementation for Fail
impl From<io::Error> for Fail {
    fn from(err: io::Error) -> Self {
        Self {
            errno: err.raw_os_error().unwrap_or(EIO),
            cause: err.to_string(),
        }
    }
}

//==============================================================================
// Unit Tests
//==============================================================================
