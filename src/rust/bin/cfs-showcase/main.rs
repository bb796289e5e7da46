// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

//======================================================================================================================
// Imports
//======================================================================================================================

use anyhow::Result;
use args::ProgramArguments;
use cfs_showcase::{
    runtime::logging,
    ContentionExperiment,
    ExperimentConfig,
    ExperimentReport,
};
use flexi_logger::LoggerHandle;

mod args;

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

fn main() -> Result<()> {
    let args: ProgramArguments = ProgramArguments::new(
        "cfs-showcase",
        "Microsoft Corporation",
        "Pins competing workers with different scheduling classes to one core and times them.",
    )?;

    // Kept alive until every worker has been reaped.
    let _logger: LoggerHandle = logging::initialize()?;

    let config: ExperimentConfig = args.experiment_config()?;
    let report: ExperimentReport = ContentionExperiment::new(config).run()?;

    println!("{}", report);
    Ok(())
}
