// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    experiment::sched::SchedulingState,
    pal::sys::process::ExitStatus,
};
use ::libc::pid_t;
use ::std::{
    fmt,
    io::{
        self,
        Write,
    },
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Timings of one worker, as printed on the standard error stream.
#[derive(Clone, Copy, Debug)]
pub struct WorkerReport {
    pub index: usize,
    /// Seconds between the experiment epoch and the start of the workload.
    pub start_offset: f64,
    /// Seconds between the experiment epoch and the end of the workload.
    pub end_offset: f64,
    pub state: SchedulingState,
}

/// A reaped worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub index: usize,
    pub pid: pid_t,
    pub status: ExitStatus,
}

/// Result of a full experiment run.
#[derive(Clone, Debug)]
pub struct ExperimentReport {
    /// Seconds between the experiment epoch and the last worker being reaped.
    pub wall_time: f64,
    /// Every worker, in spawn order.
    pub outcomes: Vec<WorkerOutcome>,
}

/// Line printed by a worker before it starts its workload.
pub struct StartLine<'a>(pub &'a WorkerReport);

/// Line printed by a worker after it finished its workload.
pub struct EndLine<'a>(pub &'a WorkerReport);

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl WorkerReport {
    pub fn elapsed(&self) -> f64 {
        self.end_offset - self.start_offset
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Writes `line` and its newline to `out` with a single `write_all`.
///
/// Workers share the standard error pipe. A write of at most `PIPE_BUF` bytes lands in the pipe as a whole, so lines
/// of different workers never interleave.
pub fn write_line<W: Write>(out: &mut W, line: &dyn fmt::Display) -> io::Result<()> {
    let line: String = format!("{}\n", line);
    out.write_all(line.as_bytes())
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl fmt::Display for StartLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report: &WorkerReport = self.0;
        write!(
            f,
            "[child {}] start={:.6} policy={} nice={}",
            report.index, report.start_offset, report.state.policy, report.state.nice
        )
    }
}

impl fmt::Display for EndLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report: &WorkerReport = self.0;
        write!(
            f,
            "[child {}] end={:.6} elapsed={:.3} sec policy={} nice={}",
            report.index,
            report.end_offset,
            report.elapsed(),
            report.state.policy,
            report.state.nice
        )
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total wall time: {:.3} sec", self.wall_time)
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
