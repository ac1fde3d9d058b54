// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reporting results back to the CI runner through the GitHub Actions file
//! command protocol.

use crate::error::{Result, SetupError, format_error_chain};
use crate::logging::workflow_line;
use log::{Level, debug};
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the output carrying the installed binary path.
pub const OUTPUT_NAME: &str = "gokcat-path";

const DELIMITER_PREFIX: &str = "ghadelimiter_";

/// Runner-provided locations, captured once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionEnvironment {
    /// File named by `GITHUB_OUTPUT`.
    pub github_output: Option<PathBuf>,
    /// File named by `GITHUB_PATH`.
    pub github_path: Option<PathBuf>,
    /// Current search path (`PATH`).
    pub path: Option<OsString>,
}

impl ActionEnvironment {
    pub fn from_env() -> Self {
        Self {
            github_output: non_empty_path("GITHUB_OUTPUT"),
            github_path: non_empty_path("GITHUB_PATH"),
            path: env::var_os("PATH"),
        }
    }
}

fn non_empty_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub struct OutputReporter {
    environment: ActionEnvironment,
}

impl OutputReporter {
    pub fn new(environment: ActionEnvironment) -> Self {
        Self { environment }
    }

    /// Publish a step output.
    ///
    /// Appends a heredoc record to the `GITHUB_OUTPUT` file. Without one the
    /// pair is printed as `name=value` on stdout.
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.environment.github_output {
            Some(file) => {
                let delimiter = format!("{DELIMITER_PREFIX}{}", Uuid::new_v4());
                let record = output_record(name, value, &delimiter)?;
                append_to(file, &record)?;
                debug!("Set output {name} via {}", file.display());
            }
            None => println!("{name}={value}"),
        }
        Ok(())
    }

    /// Put `dir` at the front of the search path for later steps.
    ///
    /// Returns `None` without touching anything when `dir` already leads the
    /// current path. Otherwise `dir` is appended to the `GITHUB_PATH` file (if
    /// any), and the updated search path becomes this reporter's current path
    /// and is returned.
    pub fn add_path(&mut self, dir: &Path) -> Result<Option<OsString>> {
        let current: Vec<PathBuf> = self
            .environment
            .path
            .as_deref()
            .map(|path| {
                env::split_paths(path)
                    .filter(|entry| !entry.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if current.first().map(PathBuf::as_path) == Some(dir) {
            debug!("{} already leads the search path", dir.display());
            return Ok(None);
        }

        if let Some(file) = &self.environment.github_path {
            append_to(file, &format!("{}\n", dir.display()))?;
            debug!("Added {} to {}", dir.display(), file.display());
        }

        let updated = env::join_paths(std::iter::once(dir.to_path_buf()).chain(current))
            .map_err(|e| SetupError::Output(format!("cannot add {} to PATH: {e}", dir.display())))?;
        self.environment.path = Some(updated.clone());
        Ok(Some(updated))
    }

    /// Emit an `::error::` workflow command so the runner marks the step failed.
    pub fn report_failure(&self, error: &SetupError) {
        println!("{}", workflow_line(Level::Error, &format_error_chain(error)));
    }
}

fn output_record(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(SetupError::Output(format!(
            "output '{name}' must not contain the delimiter {delimiter}"
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

fn append_to(file: &Path, content: &str) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .and_then(|mut handle| handle.write_all(content.as_bytes()))
        .map_err(|e| SetupError::Output(format!("{}: {e}", file.display())))
}
