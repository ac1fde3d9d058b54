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

use crate::error::Result;
use crate::paths::shared::validate_segment;
use std::fmt;

/// Identity of one cached binary: (tool name, resolved version, arch label).
///
/// Two equal keys always name the same cached file. Every component is
/// validated as a single path segment on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    tool: String,
    version: String,
    arch: String,
}

impl CacheKey {
    pub fn new(
        tool: impl Into<String>,
        version: impl Into<String>,
        arch: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            tool: tool.into(),
            version: version.into(),
            arch: arch.into(),
        };
        validate_segment("tool", &key.tool)?;
        validate_segment("version", &key.version)?;
        validate_segment("arch", &key.arch)?;
        Ok(key)
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tool, self.version, self.arch)
    }
}
