// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use anyhow::Result;
use cfs_showcase::ExperimentConfig;
use clap::{
    Arg,
    ArgMatches,
    Command,
};

//======================================================================================================================
// Program Arguments
//======================================================================================================================

/// Program Arguments
#[derive(Debug)]
pub struct ProgramArguments {
    /// Configuration file.
    config: Option<String>,
    /// Target seconds of work per worker.
    work_secs: Option<f64>,
    /// Core to pin to.
    core: Option<usize>,
    /// Number of workers.
    nworkers: Option<usize>,
}

impl ProgramArguments {
    /// Parses the program arguments from the command line interface.
    pub fn new(app_name: &'static str, app_author: &'static str, app_about: &'static str) -> Result<Self> {
        let matches: ArgMatches = Command::new(app_name)
            .author(app_author)
            .about(app_about)
            .arg(
                Arg::new("config")
                    .long("config")
                    .value_parser(clap::value_parser!(String))
                    .required(false)
                    .value_name("FILE")
                    .help("Sets configuration file"),
            )
            .arg(
                Arg::new("work-secs")
                    .long("work-secs")
                    .value_parser(clap::value_parser!(f64))
                    .required(false)
                    .value_name("SECONDS")
                    .help("Sets target seconds of work per worker (overrides WORK_SECS)"),
            )
            .arg(
                Arg::new("core")
                    .long("core")
                    .value_parser(clap::value_parser!(usize))
                    .required(false)
                    .value_name("CORE")
                    .help("Sets core to pin every process to"),
            )
            .arg(
                Arg::new("workers")
                    .long("workers")
                    .value_parser(clap::value_parser!(usize))
                    .required(false)
                    .value_name("NUMBER")
                    .help("Sets number of workers with the default scheduling assignment"),
            )
            .get_matches();

        Ok(Self {
            config: matches.get_one::<String>("config").cloned(),
            work_secs: matches.get_one::<f64>("work-secs").copied(),
            core: matches.get_one::<usize>("core").copied(),
            nworkers: matches.get_one::<usize>("workers").copied(),
        })
    }

    /// Builds the experiment configuration: defaults, then the configuration file, then the environment, then the
    /// command line.
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config: ExperimentConfig = match self.config {
            Some(ref path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };

        config.apply_env()?;

        if let Some(work_secs) = self.work_secs {
            config.set_work_secs(work_secs)?;
        }
        if let Some(core) = self.core {
            config.core = core;
        }
        if let Some(nworkers) = self.nworkers {
            config.set_default_workers(nworkers)?;
        }

        Ok(config)
    }
}
