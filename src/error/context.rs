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

use crate::error::SetupError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a SetupError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a SetupError) -> Self {
        let (suggestion, details) = match error {
            SetupError::Download { url, .. } => {
                let suggestion = Some(
                    "Check that the release asset exists for this platform and that the runner \
                     can reach github.com. Pin 'version' to a known release if the problem \
                     persists."
                        .to_string(),
                );
                let details = Some(format!("Attempted URL: {url}"));
                (suggestion, details)
            }
            SetupError::Extract { path, .. } => {
                let suggestion = Some(
                    "The downloaded archive may be truncated or not a .tar.gz file. Try again or \
                     pin a different version."
                        .to_string(),
                );
                let details = Some(format!("Archive: {path}"));
                (suggestion, details)
            }
            SetupError::ExecutableNotFound { tool, searched } => {
                let suggestion = Some(format!(
                    "The release archive does not contain a file named '{tool}'. The asset \
                     layout may have changed upstream."
                ));
                let details = Some(format!("Archive: {searched}"));
                (suggestion, details)
            }
            SetupError::MissingConfig(key) => {
                let suggestion = Some(format!(
                    "Provide '{key}' as an action input, in the config file, or on the command \
                     line."
                ));
                (suggestion, None)
            }
            SetupError::InvalidConfig(msg) | SetupError::Output(msg) => {
                let details = Some(msg.clone());
                (None, details)
            }
            SetupError::Config(config_err) => {
                let suggestion = Some(
                    "Check the action inputs (INPUT_* variables) and the --config file for typos."
                        .to_string(),
                );
                let details = Some(format!("Configuration error: {config_err}"));
                (suggestion, details)
            }
            SetupError::Http(http_err) => {
                let error_string = http_err.to_string();
                let suggestion = if error_string.contains("timeout")
                    || error_string.contains("Timeout")
                {
                    Some("The request timed out. Re-run the job or check runner connectivity.".to_string())
                } else if error_string.contains("redirect") || error_string.contains("Redirect") {
                    Some("The download URL has too many redirects. Try again later.".to_string())
                } else {
                    Some("Check your internet connection and proxy settings.".to_string())
                };
                let details = Some(format!("HTTP error: {http_err}"));
                (suggestion, details)
            }
            SetupError::Io(io_err) => {
                let suggestion = match io_err.kind() {
                    std::io::ErrorKind::PermissionDenied => Some(
                        "Choose a writable 'install-dir' or run the step with sudo.".to_string(),
                    ),
                    std::io::ErrorKind::NotFound => Some(
                        "Ensure the file or directory exists and the path is correct.".to_string(),
                    ),
                    _ => None,
                };
                let details = Some(format!("I/O error: {io_err}"));
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
