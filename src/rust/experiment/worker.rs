// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    experiment::{
        report::{
            write_line,
            EndLine,
            StartLine,
            WorkerReport,
        },
        sched::{
            self,
            SchedConfig,
            SchedulingState,
            DEFAULT_FIFO_PRIORITY,
            DEFAULT_NICE_DELTA,
        },
        workload::Workload,
    },
    pal::sys,
    runtime::{
        clock::ExperimentClock,
        fail::Fail,
    },
};
use ::libc::c_int;
use ::std::io::{
    self,
    Write,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Immutable description of one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSpec {
    pub index: usize,
    pub config: SchedConfig,
}

/// Lifecycle of a worker process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkerState {
    Spawned,
    CorePinned,
    SchedulingConfigured,
    RunningWorkload,
    Reporting,
    Terminated,
}

/// Everything a worker needs once it runs in its own process.
pub struct Worker {
    spec: WorkerSpec,
    core: usize,
    target_secs: f64,
    clock: ExperimentClock,
    workload: Workload,
    state: WorkerState,
}

/// Finalization scope of a worker process. Dropping it flushes standard output and the logger, so nothing buffered is
/// lost when the process exits without running any exit handlers.
struct WorkerScope {
    index: usize,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl WorkerSpec {
    /// Default scheduling assignment by position: a real-time worker, a fair-share baseline, a low-priority fair-share
    /// worker. Any further worker is a fair-share baseline.
    pub fn default_assignment(nworkers: usize) -> Vec<WorkerSpec> {
        (0..nworkers)
            .map(|index| {
                let config: SchedConfig = match index {
                    0 => SchedConfig::FixedPriorityHigh {
                        priority: DEFAULT_FIFO_PRIORITY,
                    },
                    2 => SchedConfig::FairShareLow {
                        nice_delta: DEFAULT_NICE_DELTA,
                    },
                    _ => SchedConfig::FairShareDefault,
                };
                WorkerSpec { index, config }
            })
            .collect()
    }
}

impl Worker {
    pub fn new(spec: WorkerSpec, core: usize, target_secs: f64, clock: ExperimentClock, workload: Workload) -> Self {
        Self {
            spec,
            core,
            target_secs,
            clock,
            workload,
            state: WorkerState::Spawned,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs the worker inside a forked child and terminates the child. Never returns.
    pub fn run_in_child(mut self) -> ! {
        let code: c_int = {
            let _scope: WorkerScope = WorkerScope { index: self.spec.index };
            match self.run() {
                Ok(_) => 0,
                Err(e) => {
                    let message: String = format!("[child {}] {}", self.spec.index, e);
                    // Nowhere left to report a failing stderr.
                    let _ = write_line(&mut io::stderr(), &message);
                    1
                },
            }
        };
        sys::process::terminate(code)
    }

    /// Pins the worker, applies its scheduling configuration, runs the workload and prints the start and end lines.
    /// A failure to pin is returned as is; a failure to change the scheduling class only degrades the worker.
    pub fn run(&mut self) -> Result<WorkerReport, Fail> {
        sys::sched::pin_to_core(self.core)?;
        self.advance(WorkerState::CorePinned);

        let state: SchedulingState = sched::apply_scheduling_config(self.spec.config)?;
        self.advance(WorkerState::SchedulingConfigured);

        let start_offset: f64 = self.clock.now();
        let mut report: WorkerReport = WorkerReport {
            index: self.spec.index,
            start_offset,
            end_offset: start_offset,
            state,
        };
        write_line(&mut io::stderr(), &StartLine(&report))?;
        self.advance(WorkerState::RunningWorkload);

        // Elapsed time in the report also covers the calibration probe.
        let busy_secs: f64 = self.workload.calibrate_and_run(self.target_secs);
        report.end_offset = self.clock.now();
        debug!(
            "run(): worker {} busy for {:.3} sec after calibration, end offset {:.6}",
            self.spec.index, busy_secs, report.end_offset
        );
        self.advance(WorkerState::Reporting);

        write_line(&mut io::stderr(), &EndLine(&report))?;
        self.advance(WorkerState::Terminated);

        Ok(report)
    }

    fn advance(&mut self, next: WorkerState) {
        debug_assert!(next > self.state);
        trace!("worker {}: {:?} -> {:?}", self.spec.index, self.state, next);
        self.state = next;
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl Drop for WorkerScope {
    fn drop(&mut self) {
        if let Err(e) = io::stdout().flush() {
            let message: String = format!("[child {}] failed to flush stdout: {}", self.index, e);
            let _ = write_line(&mut io::stderr(), &message);
        }
        log::logger().flush();
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
