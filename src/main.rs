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

use clap::Parser;
use gokcat_setup::cache::ToolCache;
use gokcat_setup::commands::{SetupCommand, SetupOutcome};
use gokcat_setup::config::{
    ConfigOverrides, REPOSITORY, RunnerContext, SetupConfig, TOOL_NAME, inputs_from_env,
};
use gokcat_setup::error::{Result, format_error_with_color, get_exit_code};
use gokcat_setup::installation::Installer;
use gokcat_setup::logging;
use gokcat_setup::output::{ActionEnvironment, OutputReporter};
use gokcat_setup::platform::Platform;
use gokcat_setup::release::GithubReleaseClient;
use log::info;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gokcat-setup")]
#[command(author, version, about = "Install a prebuilt gokcat binary in CI", long_about = None)]
struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML file with defaults for any input
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to install gokcat into
    #[arg(long, value_name = "DIR")]
    install_dir: Option<PathBuf>,

    /// Release to install ("latest", "v1.2.0" or "1.2.0")
    #[arg(long = "gokcat-version", value_name = "VERSION")]
    gokcat_version: Option<String>,

    /// Query the release listing even when a cached version exists
    #[arg(long)]
    always_check_latest: bool,

    /// Do not add the install directory to PATH for later steps
    #[arg(long)]
    no_add_to_path: bool,

    /// Tool cache root (defaults to RUNNER_TOOL_CACHE)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            install_dir: self.install_dir.clone(),
            version: self.gokcat_version.clone(),
            always_check_latest: self.always_check_latest.then_some(true),
            add_to_path: self.no_add_to_path.then_some(false),
            cache_dir: self.cache_dir.clone(),
        }
    }
}

fn run(cli: &Cli, runner: &RunnerContext, reporter: &mut OutputReporter) -> Result<SetupOutcome> {
    let config = SetupConfig::load(
        cli.config.as_deref(),
        inputs_from_env(),
        runner,
        &cli.overrides(),
    )?;

    let cache = ToolCache::new(config.cache_root(runner)?);
    let source = GithubReleaseClient::new(REPOSITORY)
        .with_api_url(&config.api_url)
        .with_token(config.token.clone());

    SetupCommand::new(
        &config,
        Platform::current(),
        &source,
        cache,
        Installer::new(TOOL_NAME),
        reporter,
    )
    .execute()
}

fn main() {
    let cli = Cli::parse();
    let runner = RunnerContext::from_env();

    logging::setup_logger(cli.verbose, runner.github_actions);

    let mut reporter = OutputReporter::new(ActionEnvironment::from_env());

    match run(&cli, &runner, &mut reporter) {
        Ok(outcome) => {
            let source = if outcome.cache_hit { "tool cache" } else { "download" };
            info!(
                "{TOOL_NAME} {} ready at {} (from {source})",
                outcome.version,
                outcome.path.display()
            );
        }
        Err(e) => {
            if runner.github_actions {
                reporter.report_failure(&e);
            } else {
                eprintln!("{}", format_error_with_color(&e, io::stderr().is_terminal()));
            }
            std::process::exit(get_exit_code(&e));
        }
    }
}
