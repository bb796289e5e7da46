// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use super::{
    clear_errno,
    errno,
};
use crate::runtime::fail::Fail;
use ::libc::{
    c_int,
    cpu_set_t,
    sched_param,
};
use ::std::{
    io,
    mem,
};

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Restricts the calling process to the single processor `core`.
pub fn pin_to_core(core: usize) -> Result<(), Fail> {
    if core >= libc::CPU_SETSIZE as usize {
        let cause: String = format!("sched_setaffinity: core {} exceeds CPU_SETSIZE", core);
        return Err(Fail::new(libc::EINVAL, &cause));
    }

    let ret: c_int = unsafe {
        let mut set: cpu_set_t = mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, mem::size_of::<cpu_set_t>(), &set)
    };

    if ret != 0 {
        return Err(Fail::last_os_error("sched_setaffinity"));
    }
    Ok(())
}

/// Returns the lowest-numbered core in the calling process's current affinity mask.
pub fn first_allowed_core() -> Result<usize, Fail> {
    let mut set: cpu_set_t = unsafe { mem::zeroed() };
    if unsafe { libc::sched_getaffinity(0, mem::size_of::<cpu_set_t>(), &mut set) } != 0 {
        return Err(Fail::last_os_error("sched_getaffinity"));
    }

    (0..libc::CPU_SETSIZE as usize)
        .find(|&core| unsafe { libc::CPU_ISSET(core, &set) })
        .ok_or_else(|| Fail::new(libc::ESRCH, "sched_getaffinity: empty affinity mask"))
}

/// Switches the calling process to the `SCHED_FIFO` real-time class at `priority`.
pub fn set_fifo(priority: c_int) -> Result<(), Fail> {
    let ret: c_int = unsafe {
        // Work around libc exposing more fields on musl.
        let mut param: sched_param = mem::zeroed();
        param.sched_priority = priority;
        libc::sched_setscheduler(0, libc::SCHED_FIFO, &param)
    };

    if ret != 0 {
        return Err(Fail::last_os_error("sched_setscheduler FIFO"));
    }
    Ok(())
}

/// Adds `delta` to the niceness of the calling process and returns the resulting niceness.
pub fn adjust_nice(delta: c_int) -> Result<c_int, Fail> {
    clear_errno();
    let nice: c_int = unsafe { libc::nice(delta) };
    if nice == -1 && errno() != 0 {
        let op: String = format!("nice({:+})", delta);
        return Err(Fail::from_os_error(&op, io::Error::from_raw_os_error(errno())));
    }
    Ok(nice)
}

/// Returns the raw scheduling policy of the calling process.
pub fn get_policy() -> Result<c_int, Fail> {
    let policy: c_int = unsafe { libc::sched_getscheduler(0) };
    if policy < 0 {
        return Err(Fail::last_os_error("sched_getscheduler"));
    }
    Ok(policy)
}

/// Returns the niceness of the calling process.
pub fn get_nice() -> Result<c_int, Fail> {
    clear_errno();
    let nice: c_int = unsafe { libc::getpriority(libc::PRIO_PROCESS, 0) };
    if nice == -1 && errno() != 0 {
        return Err(Fail::from_os_error("getpriority", io::Error::from_raw_os_error(errno())));
    }
    Ok(nice)
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
