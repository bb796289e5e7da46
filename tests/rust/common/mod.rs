// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

// Not every test binary uses every helper.
#![allow(dead_code)]

//======================================================================================================================
// Imports
//======================================================================================================================

use ::anyhow::Result;
use ::std::{
    process::{
        Command,
        Output,
    },
    sync::{
        Mutex,
        MutexGuard,
    },
};

//======================================================================================================================
// Static Variables
//======================================================================================================================

/// Experiments pin to the same core, so running two at once skews their timings.
static EXPERIMENT_LOCK: Mutex<()> = Mutex::new(());

//======================================================================================================================
// Structures
//======================================================================================================================

/// Parsed `[child i] start=...` line.
#[derive(Debug)]
pub struct StartLine {
    pub index: usize,
    pub start: f64,
    pub policy: String,
    pub nice: i32,
}

/// Parsed `[child i] end=... elapsed=... sec` line.
#[derive(Debug)]
pub struct EndLine {
    pub index: usize,
    pub end: f64,
    pub elapsed: f64,
    pub policy: String,
    pub nice: i32,
}

/// Output of one run of the showcase binary.
pub struct Run {
    pub output: Output,
    pub stdout: String,
    pub stderr: String,
}

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl Run {
    pub fn starts(&self) -> Result<Vec<StartLine>> {
        self.child_lines()
            .filter(|(_, rest)| rest.starts_with("start="))
            .map(|(index, rest)| {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                anyhow::ensure!(fields.len() == 3, "malformed start line: {}", rest);
                Ok(StartLine {
                    index,
                    start: field(fields[0], "start=")?.parse()?,
                    policy: field(fields[1], "policy=")?.to_string(),
                    nice: field(fields[2], "nice=")?.parse()?,
                })
            })
            .collect()
    }

    pub fn ends(&self) -> Result<Vec<EndLine>> {
        self.child_lines()
            .filter(|(_, rest)| rest.starts_with("end="))
            .map(|(index, rest)| {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                anyhow::ensure!(fields.len() == 5 && fields[2] == "sec", "malformed end line: {}", rest);
                Ok(EndLine {
                    index,
                    end: field(fields[0], "end=")?.parse()?,
                    elapsed: field(fields[1], "elapsed=")?.parse()?,
                    policy: field(fields[3], "policy=")?.to_string(),
                    nice: field(fields[4], "nice=")?.parse()?,
                })
            })
            .collect()
    }

    /// Every `Total wall time` value printed on stdout.
    pub fn wall_times(&self) -> Result<Vec<f64>> {
        self.stdout
            .lines()
            .filter_map(|line| line.strip_prefix("Total wall time: "))
            .map(|rest| {
                let secs: &str = rest
                    .strip_suffix(" sec")
                    .ok_or(anyhow::anyhow!("malformed summary line: {}", rest))?;
                anyhow::ensure!(secs.split('.').nth(1).map(str::len) == Some(3), "expected 3 decimals: {}", secs);
                Ok(secs.parse()?)
            })
            .collect()
    }

    pub fn nchild_lines(&self) -> usize {
        self.child_lines().count()
    }

    fn child_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.stderr.lines().filter_map(|line| {
            let rest: &str = line.strip_prefix("[child ")?;
            let (index, rest) = rest.split_once("] ")?;
            Some((index.parse().ok()?, rest))
        })
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// A core the test process is allowed to run on.
pub fn test_core() -> Result<usize> {
    Ok(cfs_showcase::pal::sys::sched::first_allowed_core()?)
}

/// Runs the showcase binary with `args` and extra environment variables. `WORK_SECS` is cleared unless given.
pub fn run(args: &[&str], envs: &[(&str, &str)]) -> Result<Run> {
    let _guard: MutexGuard<()> = EXPERIMENT_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut command: Command = Command::new(env!("CARGO_BIN_EXE_cfs-showcase"));
    command.args(args).env_remove("WORK_SECS");
    for (key, value) in envs {
        command.env(key, value);
    }

    let output: Output = command.output()?;
    let stdout: String = String::from_utf8(output.stdout.clone())?;
    let stderr: String = String::from_utf8(output.stderr.clone())?;
    Ok(Run { output, stdout, stderr })
}

fn field<'a>(token: &'a str, prefix: &str) -> Result<&'a str> {
    token
        .strip_prefix(prefix)
        .ok_or(anyhow::anyhow!("expected {} in {}", prefix, token))
}
