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

use crate::error::{Result, SetupError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Check that `value` can be used as exactly one directory segment.
///
/// Cache keys come from user input and release tags, so anything that could
/// address a different directory (`..`, separators, an empty string) is refused.
pub fn validate_segment(label: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if value.is_empty() || !single_normal || value.contains(['/', '\\']) {
        return Err(SetupError::InvalidConfig(format!(
            "{label} '{value}' is not a valid path segment"
        )));
    }
    Ok(())
}

/// Ensure the provided path exists, returning it on success.
pub fn ensure_directory(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path).map_err(|error| {
        SetupError::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to create directory {}: {error}", path.display()),
        ))
    })?;
    Ok(path)
}
