// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::runtime::fail::Fail;
use ::libc::{
    c_int,
    pid_t,
};
use ::std::{
    fmt,
    io,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Which side of a `fork` the caller is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForkResult {
    Parent { child: pid_t },
    Child,
}

/// How a reaped child process terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(c_int),
    Signaled(c_int),
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl ExitStatus {
    /// Decodes a raw status word as filled in by `waitpid`.
    pub fn from_raw(status: c_int) -> Self {
        if libc::WIFSIGNALED(status) {
            ExitStatus::Signaled(libc::WTERMSIG(status))
        } else {
            ExitStatus::Exited(libc::WEXITSTATUS(status))
        }
    }

    pub fn success(&self) -> bool {
        *self == ExitStatus::Exited(0)
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Forks the calling process.
///
/// # Safety
///
/// The caller must be single-threaded: the child only inherits the calling thread, and any lock held by another
/// thread at the time of the fork stays locked forever in the child.
pub unsafe fn fork() -> Result<ForkResult, Fail> {
    match libc::fork() {
        -1 => Err(Fail::last_os_error("fork")),
        0 => Ok(ForkResult::Child),
        child => Ok(ForkResult::Parent { child }),
    }
}

/// Blocks until the child `pid` terminates and returns how it terminated.
pub fn wait_for(pid: pid_t) -> Result<ExitStatus, Fail> {
    let mut status: c_int = 0;
    loop {
        if unsafe { libc::waitpid(pid, &mut status, 0) } == pid {
            return Ok(ExitStatus::from_raw(status));
        }
        let err: io::Error = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EINTR) {
            return Err(Fail::from_os_error("waitpid", err));
        }
    }
}

/// Terminates the calling process immediately, without running exit handlers or unwinding.
pub fn terminate(code: c_int) -> ! {
    unsafe { libc::_exit(code) }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit status {}", code),
            ExitStatus::Signaled(signo) => write!(f, "killed by signal {}", signo),
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
