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

use log::Level;
use std::io::Write;

/// Initialize the logger with the specified verbosity level
///
/// # Arguments
/// * `verbose` - Verbosity level (0=info, 1=debug, 2+=trace)
/// * `github_actions` - Format records as workflow commands for the Actions runner
pub fn setup_logger(verbose: u8, github_actions: bool) {
    let env_filter = match verbose {
        0 => "gokcat_setup=info",
        1 => "gokcat_setup=debug",
        _ => "gokcat_setup=trace",
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(env_filter));

    if github_actions {
        builder.format(|buf, record| {
            writeln!(buf, "{}", workflow_line(record.level(), &record.args().to_string()))
        });
    } else {
        builder
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false);
    }

    builder.init();
}

/// Render a log line the way the Actions runner expects annotations.
///
/// Warnings and errors become `::warning::`/`::error::` commands, debug and trace
/// records become `::debug::` (only shown when step debugging is enabled), and
/// info records are printed verbatim.
pub fn workflow_line(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("::error::{}", escape_data(message)),
        Level::Warn => format!("::warning::{}", escape_data(message)),
        Level::Info => message.to_string(),
        Level::Debug | Level::Trace => format!("::debug::{}", escape_data(message)),
    }
}

/// Escape a workflow command payload so multi-line messages stay one command.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
