// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Exports
//======================================================================================================================

pub mod config;
pub mod report;
pub mod runner;
pub mod sched;
pub mod worker;
pub mod workload;
