// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    experiment::{
        config::ExperimentConfig,
        report::{
            ExperimentReport,
            WorkerOutcome,
        },
        worker::{
            Worker,
            WorkerSpec,
        },
        workload::Workload,
    },
    pal::sys::{
        self,
        process::{
            ExitStatus,
            ForkResult,
        },
    },
    runtime::{
        clock::ExperimentClock,
        fail::Fail,
    },
};
use ::libc::pid_t;

//======================================================================================================================
// Structures
//======================================================================================================================

/// Runs a set of workers pinned to one core and measures how the kernel shares that core between them.
pub struct ContentionExperiment {
    config: ExperimentConfig,
    workload: Workload,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl ContentionExperiment {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            workload: Workload::default(),
        }
    }

    /// Pins the calling process, forks one process per worker and waits for all of them.
    ///
    /// Fails without spawning anything if the calling process cannot be pinned. Fails immediately, without waiting,
    /// if a worker cannot be forked. Fails after every worker was reaped if any of them did not exit cleanly.
    ///
    /// The calling process must be single-threaded.
    pub fn run(&self) -> Result<ExperimentReport, Fail> {
        sys::sched::pin_to_core(self.config.core)?;
        info!(
            "run(): {} workers pinned to core {}, {:.3} sec each",
            self.config.workers.len(),
            self.config.core,
            self.config.work_secs
        );

        let clock: ExperimentClock = ExperimentClock::start();

        let mut children: Vec<(usize, pid_t)> = Vec::with_capacity(self.config.workers.len());
        for spec in &self.config.workers {
            let pid: pid_t = self.spawn(*spec, clock)?;
            debug!("run(): worker {} ({}) has pid {}", spec.index, spec.config, pid);
            children.push((spec.index, pid));
        }

        // Reap every worker, whatever order they finish in.
        let mut outcomes: Vec<WorkerOutcome> = Vec::with_capacity(children.len());
        for (index, pid) in children {
            let status: ExitStatus = sys::process::wait_for(pid)?;
            trace!("run(): worker {} ({}) terminated with {}", index, pid, status);
            outcomes.push(WorkerOutcome { index, pid, status });
        }
        let wall_time: f64 = clock.now();

        check_outcomes(&outcomes)?;
        Ok(ExperimentReport { wall_time, outcomes })
    }

    /// Forks a worker process. Only returns in the parent.
    fn spawn(&self, spec: WorkerSpec, clock: ExperimentClock) -> Result<pid_t, Fail> {
        match unsafe { sys::process::fork()? } {
            ForkResult::Parent { child } => Ok(child),
            ForkResult::Child => {
                Worker::new(spec, self.config.core, self.config.work_secs, clock, self.workload).run_in_child()
            },
        }
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Fails on the first worker that did not exit with status 0.
fn check_outcomes(outcomes: &[WorkerOutcome]) -> Result<(), Fail> {
    if let Some(failed) = outcomes.iter().find(|outcome| !outcome.status.success()) {
        let cause: String = format!("worker {} (pid {}) failed with {}", failed.index, failed.pid, failed.status);
        error!("check_outcomes(): {}", cause);
        return Err(Fail::new(libc::ECHILD, &cause));
    }
    Ok(())
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
