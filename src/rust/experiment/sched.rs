// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    pal::sys::sched,
    runtime::fail::Fail,
};
use ::libc::c_int;
use ::std::fmt;

//======================================================================================================================
// Constants
//======================================================================================================================

/// Real-time priority of the high-priority worker in the default assignment.
pub const DEFAULT_FIFO_PRIORITY: c_int = 80;

/// Niceness delta of the low-priority worker in the default assignment.
pub const DEFAULT_NICE_DELTA: c_int = 10;

/// Valid `SCHED_FIFO` priorities on Linux.
pub const FIFO_PRIORITY_RANGE: ::std::ops::RangeInclusive<c_int> = 1..=99;

//======================================================================================================================
// Structures
//======================================================================================================================

/// Scheduling configuration requested for a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedConfig {
    /// Fair-share class at the inherited niceness.
    FairShareDefault,
    /// Fair-share class, niceness raised by `nice_delta`.
    FairShareLow { nice_delta: c_int },
    /// `SCHED_FIFO` at a fixed real-time `priority`.
    FixedPriorityHigh { priority: c_int },
}

/// Scheduling policy as reported by the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedPolicy {
    Other,
    Fifo,
    RoundRobin,
    Batch,
    Idle,
    Unknown(c_int),
}

/// Process-wide scheduling attributes of a worker, observed after its configuration was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulingState {
    pub policy: SchedPolicy,
    pub nice: c_int,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl SchedPolicy {
    /// Name used in the per-worker report lines.
    pub fn name(&self) -> &'static str {
        match self {
            SchedPolicy::Other => "SCHED_OTHER(CFS)",
            SchedPolicy::Fifo => "SCHED_FIFO",
            SchedPolicy::RoundRobin => "SCHED_RR",
            SchedPolicy::Batch => "SCHED_BATCH",
            SchedPolicy::Idle => "SCHED_IDLE",
            SchedPolicy::Unknown(_) => "UNKNOWN",
        }
    }
}

impl SchedulingState {
    /// Reads the scheduling attributes of the calling process.
    pub fn current() -> Result<Self, Fail> {
        Ok(Self {
            policy: SchedPolicy::from(sched::get_policy()?),
            nice: sched::get_nice()?,
        })
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Applies `config` to the calling process and returns the scheduling state the kernel reports afterwards.
///
/// Failing to enter the real-time class or to lower the niceness is not fatal: it usually means the process lacks
/// `CAP_SYS_NICE`. The failure is logged and the process keeps its previous configuration, so the returned state
/// reflects what the worker really runs under. Only a failure to read the state back is reported as an error.
pub fn apply_scheduling_config(config: SchedConfig) -> Result<SchedulingState, Fail> {
    let applied: Result<(), Fail> = match config {
        SchedConfig::FairShareDefault => Ok(()),
        SchedConfig::FairShareLow { nice_delta } => sched::adjust_nice(nice_delta).map(|_| ()),
        SchedConfig::FixedPriorityHigh { priority } => sched::set_fifo(priority),
    };

    if let Err(e) = applied {
        warn!("apply_scheduling_config(): {} (keeping current scheduling class)", e);
    }

    SchedulingState::current()
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl From<c_int> for SchedPolicy {
    fn from(policy: c_int) -> Self {
        match policy {
            libc::SCHED_OTHER => SchedPolicy::Other,
            libc::SCHED_FIFO => SchedPolicy::Fifo,
            libc::SCHED_RR => SchedPolicy::RoundRobin,
            libc::SCHED_BATCH => SchedPolicy::Batch,
            libc::SCHED_IDLE => SchedPolicy::Idle,
            other => SchedPolicy::Unknown(other),
        }
    }
}

impl fmt::Display for SchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SchedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedConfig::FairShareDefault => write!(f, "fair-share"),
            SchedConfig::FairShareLow { nice_delta } => write!(f, "fair-share nice {:+}", nice_delta),
            SchedConfig::FixedPriorityHigh { priority } => write!(f, "fifo priority {}", priority),
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
