// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Exports
//======================================================================================================================

pub mod clock;
pub mod fail;
pub mod logging;

pub use self::{
    clock::ExperimentClock,
    fail::Fail,
};
