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

use std::path::{Path, PathBuf};

pub const COMPLETE_MARKER_SUFFIX: &str = "complete";
pub const STAGING_DIR: &str = ".staging";
pub const LATEST_POINTER_SUFFIX: &str = "latest";

pub fn tool_root(cache_root: &Path, tool: &str) -> PathBuf {
    cache_root.join(tool)
}

pub fn version_directory(cache_root: &Path, tool: &str, version: &str) -> PathBuf {
    tool_root(cache_root, tool).join(version)
}

pub fn entry_directory(cache_root: &Path, tool: &str, version: &str, arch: &str) -> PathBuf {
    version_directory(cache_root, tool, version).join(arch)
}

pub fn entry_binary(cache_root: &Path, tool: &str, version: &str, arch: &str) -> PathBuf {
    entry_directory(cache_root, tool, version, arch).join(tool)
}

pub fn complete_marker(cache_root: &Path, tool: &str, version: &str, arch: &str) -> PathBuf {
    version_directory(cache_root, tool, version).join(format!("{arch}.{COMPLETE_MARKER_SUFFIX}"))
}

/// File naming the version `latest` last resolved to for one architecture.
pub fn latest_pointer(cache_root: &Path, tool: &str, arch: &str) -> PathBuf {
    tool_root(cache_root, tool).join(format!("{arch}.{LATEST_POINTER_SUFFIX}"))
}

pub fn staging_directory(cache_root: &Path) -> PathBuf {
    cache_root.join(STAGING_DIR)
}
