// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

mod common;

//======================================================================================================================
// Imports
//======================================================================================================================

use ::anyhow::Result;
use ::std::{
    fs,
    path::PathBuf,
};
use common::{
    EndLine,
    Run,
    StartLine,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Configuration file removed when dropped.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn new(name: &str, contents: &str) -> Result<Self> {
        let path: PathBuf = std::env::temp_dir().join(format!("cfs-showcase-{}-{}.yaml", std::process::id(), name));
        fs::write(&path, contents)?;
        Ok(Self { path })
    }

    fn path(&self) -> &str {
        self.path.to_str().unwrap_or_default()
    }
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

//======================================================================================================================
// Tests
//======================================================================================================================

/// Workers come from the configuration file instead of the default assignment.
#[test]
fn workers_from_file() -> Result<()> {
    let core: usize = common::test_core()?;
    let file: ConfigFile = ConfigFile::new(
        "workers",
        &format!(
            "experiment:\n  work_secs: 0.2\n  core: {}\n  workers:\n    - policy: other\n    - policy: other\n      nice: 5\n",
            core
        ),
    )?;

    let run: Run = common::run(&["--config", file.path()], &[])?;
    cfs_showcase::ensure_eq!(run.output.status.success(), true);

    let starts: Vec<StartLine> = run.starts()?;
    let ends: Vec<EndLine> = run.ends()?;
    cfs_showcase::ensure_eq!(starts.len(), 2);
    cfs_showcase::ensure_eq!(ends.len(), 2);

    let baseline: &StartLine = match starts.iter().find(|line| line.index == 0) {
        Some(line) => line,
        None => anyhow::bail!("missing start line for worker 0"),
    };
    let low: &StartLine = match starts.iter().find(|line| line.index == 1) {
        Some(line) => line,
        None => anyhow::bail!("missing start line for worker 1"),
    };
    cfs_showcase::ensure_eq!(baseline.policy.as_str(), low.policy.as_str());
    cfs_showcase::ensure_eq!(low.nice, (baseline.nice + 5).min(19));

    for end in ends {
        cfs_showcase::ensure_eq!(end.elapsed + 0.001 >= 0.2, true);
    }
    cfs_showcase::ensure_eq!(run.wall_times()?.len(), 1);
    Ok(())
}

/// `WORK_SECS` overrides the configuration file.
#[test]
fn environment_overrides_file() -> Result<()> {
    let core: usize = common::test_core()?;
    let file: ConfigFile = ConfigFile::new(
        "env",
        &format!(
            "experiment:\n  work_secs: 60\n  core: {}\n  workers:\n    - policy: other\n",
            core
        ),
    )?;

    let run: Run = common::run(&["--config", file.path()], &[("WORK_SECS", "0.2")])?;
    cfs_showcase::ensure_eq!(run.output.status.success(), true);

    let wall_times: Vec<f64> = run.wall_times()?;
    cfs_showcase::ensure_eq!(wall_times.len(), 1);
    cfs_showcase::ensure_eq!(wall_times[0] < 60.0, true);
    Ok(())
}

/// A malformed configuration file aborts before anything is spawned.
#[test]
fn malformed_file_is_rejected() -> Result<()> {
    let file: ConfigFile = ConfigFile::new("bad", "experiment:\n  workers:\n    - policy: deadline\n")?;
    let run: Run = common::run(&["--config", file.path()], &[])?;
    cfs_showcase::ensure_neq!(run.output.status.code(), Some(0));
    cfs_showcase::ensure_eq!(run.stderr.contains("deadline"), true);
    cfs_showcase::ensure_eq!(run.nchild_lines(), 0);
    Ok(())
}

/// A missing configuration file is reported with the OS reason.
#[test]
fn missing_file_is_rejected() -> Result<()> {
    let run: Run = common::run(&["--config", "/nonexistent/cfs-showcase.yaml"], &[])?;
    cfs_showcase::ensure_neq!(run.output.status.code(), Some(0));
    cfs_showcase::ensure_eq!(run.stderr.contains("/nonexistent/cfs-showcase.yaml"), true);
    Ok(())
}
