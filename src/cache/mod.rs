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

mod key;

pub use key::CacheKey;

use crate::error::{Result, SetupError};
use crate::paths::cache as layout;
use crate::paths::shared::ensure_directory;
use crate::platform::copy_executable;
use log::{debug, trace};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name used under the user cache dir when no runner cache is set.
pub const DEFAULT_CACHE_DIR_NAME: &str = "gokcat-setup";

/// Persistent tool cache rooted at a single directory.
///
/// Entries live at `<root>/<tool>/<version>/<arch>/<tool>` and only count as
/// present once the sibling `<arch>.complete` marker exists. Entries are never
/// evicted; every (version, arch) pair keeps its own directory.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Exact-match lookup of a previously stored binary.
    pub fn find(&self, key: &CacheKey) -> Option<PathBuf> {
        let marker = layout::complete_marker(&self.root, key.tool(), key.version(), key.arch());
        let binary = layout::entry_binary(&self.root, key.tool(), key.version(), key.arch());

        if marker.is_file() && binary.is_file() {
            debug!("Tool cache hit for {key} at {}", binary.display());
            Some(binary)
        } else {
            trace!("Tool cache miss for {key}");
            None
        }
    }

    /// Copy `local_file` into the cache under `key` and return the cached path.
    ///
    /// The binary is staged inside the cache root and renamed into place before
    /// the completion marker is written, so readers never see a half-copied
    /// entry. Losing a rename race to another process storing the same key is
    /// treated as success.
    pub fn store(&self, local_file: &Path, key: &CacheKey) -> Result<PathBuf> {
        self.store_entry(local_file, key)
            .map_err(|e| match e {
                SetupError::CacheStore { .. } => e,
                other => SetupError::CacheStore {
                    key: key.to_string(),
                    reason: other.to_string(),
                },
            })
    }

    fn store_entry(&self, local_file: &Path, key: &CacheKey) -> Result<PathBuf> {
        let staging_root = ensure_directory(layout::staging_directory(&self.root))?;
        let staging = tempfile::Builder::new()
            .prefix(&format!("{}-", key.tool()))
            .tempdir_in(&staging_root)?;

        let staged_entry = staging.path().join(key.arch());
        fs::create_dir_all(&staged_entry)?;
        copy_executable(local_file, &staged_entry.join(key.tool()))?;

        ensure_directory(layout::version_directory(
            &self.root,
            key.tool(),
            key.version(),
        ))?;

        let entry_dir = layout::entry_directory(&self.root, key.tool(), key.version(), key.arch());
        let marker = layout::complete_marker(&self.root, key.tool(), key.version(), key.arch());

        if entry_dir.exists() && !marker.exists() {
            debug!("Removing incomplete cache entry {}", entry_dir.display());
            fs::remove_dir_all(&entry_dir)?;
        }

        if let Err(e) = fs::rename(&staged_entry, &entry_dir) {
            if let Some(existing) = self.find(key) {
                debug!("Cache entry {key} was stored concurrently, keeping existing copy");
                return Ok(existing);
            }
            return Err(SetupError::CacheStore {
                key: key.to_string(),
                reason: format!("failed to move entry into {}: {e}", entry_dir.display()),
            });
        }

        fs::write(&marker, key.version())?;
        debug!("Stored {key} in tool cache at {}", entry_dir.display());

        Ok(layout::entry_binary(
            &self.root,
            key.tool(),
            key.version(),
            key.arch(),
        ))
    }

    /// All completed versions cached for `(tool, arch)`, sorted by name.
    pub fn versions(&self, tool: &str, arch: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(layout::tool_root(&self.root, tool)) else {
            return Vec::new();
        };

        let mut versions: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|version| {
                CacheKey::new(tool, version.as_str(), arch)
                    .ok()
                    .and_then(|key| self.find(&key))
                    .is_some()
            })
            .collect();
        versions.sort();
        versions
    }

    /// Remember that `latest` resolved to `version` for `(tool, arch)`.
    ///
    /// Only a listing-based resolution should be recorded here. Versions cached
    /// from explicit pins or from the fallback never become the `latest` answer.
    pub fn record_latest(&self, tool: &str, arch: &str, version: &str) -> Result<()> {
        let key = CacheKey::new(tool, version, arch)?;
        self.write_latest_pointer(&key)
            .map_err(|e| SetupError::CacheStore {
                key: key.to_string(),
                reason: format!("failed to record latest version: {e}"),
            })
    }

    fn write_latest_pointer(&self, key: &CacheKey) -> Result<()> {
        let tool_root = ensure_directory(layout::tool_root(&self.root, key.tool()))?;
        let mut pointer = tempfile::NamedTempFile::new_in(&tool_root)?;
        pointer.write_all(key.version().as_bytes())?;
        pointer
            .persist(layout::latest_pointer(&self.root, key.tool(), key.arch()))
            .map_err(|e| e.error)?;
        debug!("Recorded {key} as latest");
        Ok(())
    }

    /// Version `latest` last resolved to, if that entry is still complete.
    pub fn latest_resolved(&self, tool: &str, arch: &str) -> Option<String> {
        let recorded = fs::read_to_string(layout::latest_pointer(&self.root, tool, arch)).ok()?;
        let key = CacheKey::new(tool, recorded.trim(), arch).ok()?;
        self.find(&key)?;
        Some(key.version().to_string())
    }
}

/// Resolve the cache root: explicit setting, then the runner's tool cache,
/// then the per-user cache directory.
pub fn default_cache_root(runner_tool_cache: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = runner_tool_cache.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(root);
    }

    dirs::cache_dir()
        .map(|dir| dir.join(DEFAULT_CACHE_DIR_NAME))
        .ok_or_else(|| {
            SetupError::MissingConfig(
                "cache-dir (no RUNNER_TOOL_CACHE and no user cache directory)".to_string(),
            )
        })
}
