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

use crate::cache::default_cache_root;
use crate::error::{Result, SetupError};
use crate::release::DEFAULT_API_URL;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

pub const TOOL_NAME: &str = "gokcat";
pub const REPOSITORY: &str = "philipparndt/gokcat";
pub const FALLBACK_VERSION: &str = "v0.7.2";

pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";
pub const DEFAULT_VERSION: &str = "latest";
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Prefix the runner uses to pass step inputs (`INPUT_INSTALL-DIR`, ...).
pub const INPUT_PREFIX: &str = "INPUT";

/// Settings for a single setup run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SetupConfig {
    pub install_dir: PathBuf,
    pub version: String,
    #[serde(default)]
    pub always_check_latest: bool,
    #[serde(default = "default_add_to_path")]
    pub add_to_path: bool,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub token: Option<String>,
    pub api_url: String,
    pub server_url: String,
}

fn default_add_to_path() -> bool {
    true
}

/// Values from the command line; each `Some` replaces whatever the lower
/// layers produced.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub install_dir: Option<PathBuf>,
    pub version: Option<String>,
    pub always_check_latest: Option<bool>,
    pub add_to_path: Option<bool>,
    pub cache_dir: Option<PathBuf>,
}

/// Runner variables that are not step inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerContext {
    /// `RUNNER_TOOL_CACHE`
    pub tool_cache: Option<PathBuf>,
    /// `GITHUB_API_URL`, set on GitHub Enterprise runners as well.
    pub api_url: Option<String>,
    /// `GITHUB_SERVER_URL`
    pub server_url: Option<String>,
    /// `GITHUB_ACTIONS=true`
    pub github_actions: bool,
}

impl RunnerContext {
    pub fn from_env() -> Self {
        Self {
            tool_cache: non_empty_var("RUNNER_TOOL_CACHE").map(PathBuf::from),
            api_url: non_empty_var("GITHUB_API_URL"),
            server_url: non_empty_var("GITHUB_SERVER_URL"),
            github_actions: env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Collect `INPUT_*` variables from the process environment.
pub fn inputs_from_env() -> HashMap<String, String> {
    let prefix = format!("{INPUT_PREFIX}_");
    env::vars().filter(|(key, _)| key.starts_with(&prefix)).collect()
}

impl SetupConfig {
    /// Build the configuration from all layers, lowest precedence first:
    /// built-in defaults (runner URLs where present), the optional TOML file,
    /// `INPUT_*` variables in `inputs`, then `overrides`.
    pub fn load(
        config_file: Option<&Path>,
        inputs: HashMap<String, String>,
        runner: &RunnerContext,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let api_url = runner.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let server_url = runner.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL);

        let mut builder = Config::builder()
            .set_default("install-dir", DEFAULT_INSTALL_DIR)?
            .set_default("version", DEFAULT_VERSION)?
            .set_default("always-check-latest", false)?
            .set_default("add-to-path", true)?
            .set_default("api-url", api_url)?
            .set_default("server-url", server_url)?;

        if let Some(path) = config_file {
            log::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder
            .add_source(
                Environment::with_prefix(INPUT_PREFIX)
                    .prefix_separator("_")
                    .ignore_empty(true)
                    .source(Some(inputs)),
            )
            .set_override_option(
                "install-dir",
                overrides.install_dir.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("version", overrides.version.clone())?
            .set_override_option("always-check-latest", overrides.always_check_latest)?
            .set_override_option("add-to-path", overrides.add_to_path)?
            .set_override_option(
                "cache-dir",
                overrides.cache_dir.as_ref().map(|p| p.display().to_string()),
            )?;

        let config: SetupConfig = builder.build()?.try_deserialize()?;
        config.normalized()
    }

    fn normalized(mut self) -> Result<Self> {
        if self.install_dir.as_os_str().is_empty() {
            return Err(SetupError::InvalidConfig(
                "install-dir must not be empty".to_string(),
            ));
        }

        self.version = self.version.trim().to_string();
        if self.version.is_empty() {
            return Err(SetupError::InvalidConfig(
                "version must not be empty".to_string(),
            ));
        }

        self.api_url = normalize_url("api-url", &self.api_url)?;
        self.server_url = normalize_url("server-url", &self.server_url)?;
        self.token = self.token.filter(|t| !t.trim().is_empty());
        self.cache_dir = self.cache_dir.filter(|p| !p.as_os_str().is_empty());
        Ok(self)
    }

    /// Cache root for this run: `cache-dir`, else the runner tool cache,
    /// else the per-user cache directory.
    pub fn cache_root(&self, runner: &RunnerContext) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_root(runner.tool_cache.clone()),
        }
    }
}

fn normalize_url(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SetupError::InvalidConfig(format!(
            "{key} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<SetupConfig> {
        SetupConfig::load(
            None,
            inputs(pairs),
            &RunnerContext::default(),
            &ConfigOverrides::default(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.install_dir, PathBuf::from(DEFAULT_INSTALL_DIR));
        assert_eq!(config.version, "latest");
        assert!(!config.always_check_latest);
        assert!(config.add_to_path);
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.token, None);
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.server_url, "https://github.com");
    }

    #[test]
    fn test_action_inputs() {
        let config = load(&[
            ("INPUT_INSTALL-DIR", "/opt/bin"),
            ("INPUT_VERSION", "1.2.0"),
            ("INPUT_ALWAYS-CHECK-LATEST", "true"),
            ("INPUT_ADD-TO-PATH", "false"),
            ("INPUT_TOKEN", "ghp_secret"),
        ])
        .unwrap();

        assert_eq!(config.install_dir, PathBuf::from("/opt/bin"));
        assert_eq!(config.version, "1.2.0");
        assert!(config.always_check_latest);
        assert!(!config.add_to_path);
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
    }

    #[test]
    fn test_empty_inputs_are_ignored() {
        let config = load(&[("INPUT_INSTALL-DIR", ""), ("INPUT_VERSION", "")]).unwrap();
        assert_eq!(config.install_dir, PathBuf::from(DEFAULT_INSTALL_DIR));
        assert_eq!(config.version, "latest");
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = load(&[("VERSION", "9.9.9"), ("HOME", "/root")]).unwrap();
        assert_eq!(config.version, "latest");
    }

    #[test]
    fn test_runner_urls_become_defaults() {
        let runner = RunnerContext {
            api_url: Some("https://ghe.example.com/api/v3/".to_string()),
            server_url: Some("https://ghe.example.com".to_string()),
            ..Default::default()
        };
        let config =
            SetupConfig::load(None, HashMap::new(), &runner, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.server_url, "https://ghe.example.com");
    }

    #[test]
    fn test_file_then_inputs_then_overrides() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("setup.toml");
        fs::write(
            &file,
            r#"
install-dir = "/from/file"
version = "v0.9.0"
cache-dir = "/var/cache/tools"
"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            install_dir: Some(PathBuf::from("/from/cli")),
            ..Default::default()
        };
        let config = SetupConfig::load(
            Some(&file),
            inputs(&[("INPUT_VERSION", "v1.0.0")]),
            &RunnerContext::default(),
            &overrides,
        )
        .unwrap();

        assert_eq!(config.install_dir, PathBuf::from("/from/cli"));
        assert_eq!(config.version, "v1.0.0");
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/tools")));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = SetupConfig::load(
            Some(&temp.path().join("absent.toml")),
            HashMap::new(),
            &RunnerContext::default(),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(SetupError::Config(_))));
    }

    #[test]
    fn test_invalid_values() {
        let overrides = ConfigOverrides {
            version: Some("  ".to_string()),
            ..Default::default()
        };
        let result = SetupConfig::load(
            None,
            HashMap::new(),
            &RunnerContext::default(),
            &overrides,
        );
        assert!(matches!(result, Err(SetupError::InvalidConfig(_))));

        let result = load(&[("INPUT_API-URL", "api.github.com")]);
        assert!(matches!(result, Err(SetupError::InvalidConfig(_))));
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = load(&[("INPUT_TOKEN", "   ")]).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_cache_root_precedence() {
        let runner = RunnerContext {
            tool_cache: Some(PathBuf::from("/opt/hostedtoolcache")),
            ..Default::default()
        };

        let config = load(&[]).unwrap();
        assert_eq!(
            config.cache_root(&runner).unwrap(),
            PathBuf::from("/opt/hostedtoolcache")
        );

        let config = load(&[("INPUT_CACHE-DIR", "/tmp/tools")]).unwrap();
        assert_eq!(config.cache_root(&runner).unwrap(), PathBuf::from("/tmp/tools"));
    }
}
