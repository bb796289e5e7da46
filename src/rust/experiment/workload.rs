// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use ::std::{
    hint,
    time::Instant,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Self-calibrating busy loop. It spins on pure integer arithmetic, without I/O or system calls in the hot path,
/// until roughly a target amount of wall-clock time has passed.
#[derive(Clone, Copy, Debug)]
pub struct Workload {
    /// Iterations of the probe run used to estimate throughput.
    probe_iterations: u64,
    /// Size of each correction burst as a fraction of the estimated iterations per second.
    burst_fraction: f64,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl Workload {
    /// Default probe size.
    pub const DEFAULT_PROBE_ITERATIONS: u64 = 20_000_000;
    /// Default correction burst, 5% of one second of work.
    pub const DEFAULT_BURST_FRACTION: f64 = 0.05;
    /// Probe duration assumed when the probe is faster than the clock resolution.
    const MIN_PROBE_SECS: f64 = 1e-3;

    pub fn new(probe_iterations: u64, burst_fraction: f64) -> Self {
        Self {
            probe_iterations: probe_iterations.max(1),
            burst_fraction,
        }
    }

    /// Busy-waits for at least `target_secs` seconds and returns the seconds actually spent after calibration.
    ///
    /// Throughput is estimated from a probe run under the caller's current scheduling class. If the main run falls
    /// short of the target, because the task was preempted more than during the probe, fixed-size bursts are added
    /// until the target is met. There is no bound on the number of bursts: a task that is never scheduled never
    /// returns, which is exactly the starvation the experiment is meant to expose.
    pub fn calibrate_and_run(&self, target_secs: f64) -> f64 {
        let mut acc: u64 = 0;

        let probe_start: Instant = Instant::now();
        acc = Self::spin(acc, self.probe_iterations);
        let mut probe_secs: f64 = probe_start.elapsed().as_secs_f64();
        if probe_secs <= 0.0 {
            probe_secs = Self::MIN_PROBE_SECS;
        }
        let iters_per_sec: f64 = self.probe_iterations as f64 / probe_secs;
        trace!("calibrate_and_run(): {:.0} iterations per second", iters_per_sec);

        let needed: u64 = (iters_per_sec * target_secs) as u64;
        let burst: u64 = ((iters_per_sec * self.burst_fraction) as u64).max(1);

        let t0: Instant = Instant::now();
        acc = Self::spin(acc, needed);
        let mut elapsed: f64 = t0.elapsed().as_secs_f64();
        let mut nbursts: usize = 0;
        while elapsed < target_secs {
            acc = Self::spin(acc, burst);
            elapsed = t0.elapsed().as_secs_f64();
            nbursts += 1;
        }
        hint::black_box(acc);
        debug!("calibrate_and_run(): {:.3} sec after {} correction bursts", elapsed, nbursts);

        elapsed
    }

    /// Accumulates `iterations` increments into `acc`.
    #[inline(never)]
    fn spin(mut acc: u64, iterations: u64) -> u64 {
        for i in 0..iterations {
            acc = hint::black_box(acc.wrapping_add(i));
        }
        acc
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl Default for Workload {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBE_ITERATIONS, Self::DEFAULT_BURST_FRACTION)
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
