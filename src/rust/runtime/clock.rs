// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::std::time::Instant;

//==============================================================================
// Structures
//==============================================================================

/// Monotonic reference point shared by the parent and every forked worker. Workers inherit a copy of the epoch
/// through `fork`, so offsets reported by different processes are directly comparable.
#[derive(Clone, Copy, Debug)]
pub struct ExperimentClock {
    epoch: Instant,
}

//==============================================================================
// Associate Functions
//==============================================================================

impl ExperimentClock {
    /// Captures the experiment epoch.
    pub fn start() -> Self {
        Self { epoch: Instant::now() }
    }

    /// Seconds elapsed between the epoch and `instant`.
    pub fn offset(&self, instant: Instant) -> f64 {
        instant.saturating_duration_since(self.epoch).as_secs_f64()
    }

    /// Seconds elapsed since the epoch.
    pub fn now(&self) -> f64 {
        self.offset(Instant::now())
    }
}

//==============================================================================
// Unit Tests
//==============================================================================
