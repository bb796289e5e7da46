// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Exports
//======================================================================================================================

pub mod process;
pub mod sched;

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Resets the calling thread's `errno`. Required before calls such as `nice` and `getpriority` where `-1` is also a
/// legitimate return value.
fn clear_errno() {
    unsafe { *libc::__errno_location() = 0 };
}

/// Returns the calling thread's `errno`.
fn errno() -> libc::c_int {
    unsafe { *libc::__errno_location() }
}
