// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    experiment::{
        sched::{
            SchedConfig,
            DEFAULT_FIFO_PRIORITY,
            FIFO_PRIORITY_RANGE,
        },
        worker::WorkerSpec,
    },
    runtime::fail::Fail,
};
use ::std::{
    fs,
    ops::Index,
    str::FromStr,
};
use ::yaml_rust::{
    Yaml,
    YamlLoader,
};

//======================================================================================================================
// Constants
//======================================================================================================================

// Experiment options.
mod experiment_config {
    pub const SECTION_NAME: &str = "experiment";
    // Target seconds of work per worker. Also read from the WORK_SECS environment variable.
    pub const WORK_SECS: &str = "work_secs";
    // Core every process is pinned to.
    pub const CORE: &str = "core";
    // Worker list.
    pub const WORKERS: &str = "workers";
}

// Per-worker options.
mod worker_config {
    pub const POLICY: &str = "policy";
    pub const PRIORITY: &str = "priority";
    pub const NICE: &str = "nice";
    pub const POLICY_FIFO: &str = "fifo";
    pub const POLICY_OTHER: &str = "other";
}

//======================================================================================================================
// Structures
//======================================================================================================================

/// Experiment configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    /// Target seconds of work per worker.
    pub work_secs: f64,
    /// Core every process is pinned to.
    pub core: usize,
    /// Workers, in spawn order.
    pub workers: Vec<WorkerSpec>,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl ExperimentConfig {
    pub const DEFAULT_WORK_SECS: f64 = 3.0;
    pub const DEFAULT_CORE: usize = 0;
    pub const DEFAULT_NWORKERS: usize = 3;

    /// Reads a configuration file into an [ExperimentConfig], starting from the defaults.
    pub fn from_file(path: &str) -> Result<Self, Fail> {
        let contents: String = fs::read_to_string(path).map_err(|e| Fail::from_os_error(path, e))?;
        Self::from_str(&contents)
    }

    /// Overrides the target duration with the `WORK_SECS` environment variable, if set.
    pub fn apply_env(&mut self) -> Result<(), Fail> {
        if let Some(work_secs) = Self::get_typed_env_option::<f64>(experiment_config::WORK_SECS)? {
            self.set_work_secs(work_secs)?;
        }
        Ok(())
    }

    /// Sets the target duration. It must be a finite positive number of seconds.
    pub fn set_work_secs(&mut self, work_secs: f64) -> Result<(), Fail> {
        if !work_secs.is_finite() || work_secs <= 0.0 {
            let cause: String = format!("invalid work_secs {}", work_secs);
            error!("set_work_secs(): {:?}", cause);
            return Err(Fail::new(libc::EINVAL, &cause));
        }
        self.work_secs = work_secs;
        Ok(())
    }

    /// Replaces the worker list with the default assignment for `nworkers` workers.
    pub fn set_default_workers(&mut self, nworkers: usize) -> Result<(), Fail> {
        if nworkers == 0 {
            return Err(Fail::new(libc::EINVAL, "at least one worker is required"));
        }
        self.workers = WorkerSpec::default_assignment(nworkers);
        Ok(())
    }

    fn parse(root: &Yaml) -> Result<Self, Fail> {
        let mut config: Self = Self::default();
        let section: &Yaml = root.index(experiment_config::SECTION_NAME);
        match section {
            Yaml::BadValue | Yaml::Null => return Ok(config),
            Yaml::Hash(_) => (),
            _ => {
                let message: String = format!("parameter \"{}\" has unexpected type", experiment_config::SECTION_NAME);
                return Err(Fail::new(libc::EINVAL, &message));
            },
        }

        if let Some(work_secs) = Self::get_float_option(section, experiment_config::WORK_SECS)? {
            config.set_work_secs(work_secs)?;
        }

        if let Some(core) = Self::get_int_option::<usize>(section, experiment_config::CORE)? {
            config.core = core;
        }

        match section.index(experiment_config::WORKERS) {
            Yaml::BadValue => (),
            Yaml::Array(workers) => {
                if workers.is_empty() {
                    return Err(Fail::new(libc::EINVAL, "worker list is empty"));
                }
                config.workers = workers
                    .iter()
                    .enumerate()
                    .map(|(index, worker)| Self::parse_worker(index, worker))
                    .collect::<Result<Vec<WorkerSpec>, Fail>>()?;
            },
            _ => {
                let message: String = format!("parameter \"{}\" has unexpected type", experiment_config::WORKERS);
                return Err(Fail::new(libc::EINVAL, &message));
            },
        }

        Ok(config)
    }

    fn parse_worker(index: usize, worker: &Yaml) -> Result<WorkerSpec, Fail> {
        let policy: &str = match worker.index(worker_config::POLICY).as_str() {
            Some(policy) => policy,
            None => {
                let message: String = format!("worker {}: missing or invalid \"{}\"", index, worker_config::POLICY);
                return Err(Fail::new(libc::EINVAL, &message));
            },
        };

        let config: SchedConfig = match policy.to_lowercase().as_str() {
            worker_config::POLICY_FIFO => {
                let priority: libc::c_int =
                    Self::get_int_option(worker, worker_config::PRIORITY)?.unwrap_or(DEFAULT_FIFO_PRIORITY);
                if !FIFO_PRIORITY_RANGE.contains(&priority) {
                    let message: String = format!("worker {}: fifo priority {} is out of range", index, priority);
                    return Err(Fail::new(libc::ERANGE, &message));
                }
                SchedConfig::FixedPriorityHigh { priority }
            },
            worker_config::POLICY_OTHER => match Self::get_int_option::<libc::c_int>(worker, worker_config::NICE)? {
                None | Some(0) => SchedConfig::FairShareDefault,
                Some(nice_delta) if nice_delta > 0 => SchedConfig::FairShareLow { nice_delta },
                Some(nice_delta) => {
                    let message: String = format!("worker {}: nice delta {} must be positive", index, nice_delta);
                    return Err(Fail::new(libc::EINVAL, &message));
                },
            },
            other => {
                let message: String = format!("worker {}: unknown policy \"{}\"", index, other);
                return Err(Fail::new(libc::EINVAL, &message));
            },
        };

        Ok(WorkerSpec { index, config })
    }

    //======================================================================================================================
    // Static Functions
    //======================================================================================================================

    /// Reads an optional number at `index`, accepting both integer and real YAML scalars.
    fn get_float_option(yaml: &Yaml, index: &str) -> Result<Option<f64>, Fail> {
        match yaml.index(index) {
            Yaml::BadValue => Ok(None),
            Yaml::Integer(value) => Ok(Some(*value as f64)),
            value => match value.as_f64() {
                Some(value) => Ok(Some(value)),
                None => {
                    let message: String = format!("parameter {} has unexpected type", index);
                    Err(Fail::new(libc::EINVAL, &message))
                },
            },
        }
    }

    /// Reads an optional integer at `index` and verifies that the destination type may hold it.
    fn get_int_option<T: TryFrom<i64>>(yaml: &Yaml, index: &str) -> Result<Option<T>, Fail> {
        let val: i64 = match yaml.index(index) {
            Yaml::BadValue => return Ok(None),
            Yaml::Integer(val) => *val,
            _ => {
                let message: String = format!("parameter {} has unexpected type", index);
                return Err(Fail::new(libc::EINVAL, &message));
            },
        };
        match T::try_from(val) {
            Ok(val) => Ok(Some(val)),
            _ => {
                let message: String = format!("parameter \"{}\" is out of range", index);
                Err(Fail::new(libc::ERANGE, &message))
            },
        }
    }

    /// Get value where the environment value overrides the config file if it exists.
    fn get_typed_env_option<T: FromStr>(index: &str) -> Result<Option<T>, Fail> {
        // Check for the environment variable.
        if let Ok(var) = ::std::env::var(index.to_uppercase()) {
            if let Ok(value) = var.trim().parse() {
                return Ok(Some(value));
            } else {
                let message: String = format!("parameter {} has unexpected type", index.to_uppercase());
                return Err(Fail::new(libc::EINVAL, &message));
            }
        }
        Ok(None)
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            work_secs: Self::DEFAULT_WORK_SECS,
            core: Self::DEFAULT_CORE,
            workers: WorkerSpec::default_assignment(Self::DEFAULT_NWORKERS),
        }
    }
}

impl FromStr for ExperimentConfig {
    type Err = Fail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let docs: Vec<Yaml> = YamlLoader::load_from_str(s).map_err(|e| {
            let cause: String = format!("malformed configuration: {}", e);
            Fail::new(libc::EINVAL, &cause)
        })?;
        match &docs[..] {
            [] => Ok(Self::default()),
            [root] => Self::parse(root),
            _ => Err(Fail::new(libc::EINVAL, "Wrong number of config objects")),
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
