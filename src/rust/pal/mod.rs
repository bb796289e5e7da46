// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// PAL: Platform Abstraction Layer
//======================================================================================================================

// This is the platform abstraction layer that hides the libc calls used to pin, prioritize, spawn and reap worker
// processes. Scheduling classes, niceness and CPU affinity are kernel-specific, so only Linux is supported.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use self::linux as sys;
    } else {
        compile_error!("scheduling classes and CPU affinity are only supported on Linux");
    }
}
