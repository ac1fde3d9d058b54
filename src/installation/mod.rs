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

use crate::archive::{extract_archive, extraction_directory, find_by_name};
use crate::download::{
    DownloadOptions, HttpFileDownloader, LogProgressReporter, archive_file_name,
};
use crate::error::{Result, SetupError};
use crate::paths::shared::ensure_directory;
use crate::platform::copy_executable;
use log::{debug, info};
use std::path::{Path, PathBuf};

const SCRATCH_PREFIX: &str = "gokcat-setup-";

/// Downloads a release archive and installs the tool binary it contains.
pub struct Installer {
    downloader: HttpFileDownloader,
    tool: String,
    options: DownloadOptions,
}

impl Installer {
    pub fn new(tool: &str) -> Self {
        let downloader =
            HttpFileDownloader::new().with_progress_reporter(Box::new(LogProgressReporter::new(tool)));
        Self::with_downloader(tool, downloader)
    }

    pub fn with_downloader(tool: &str, downloader: HttpFileDownloader) -> Self {
        Self {
            downloader,
            tool: tool.to_string(),
            options: DownloadOptions::default(),
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Fetch `url` and install the tool as `<install_dir>/<tool>`.
    ///
    /// Download and extraction happen in a scratch directory that is removed
    /// when this returns. An existing binary at the target is replaced. The
    /// installed file is always left with mode 0o755.
    pub fn install(&mut self, url: &str, install_dir: &Path) -> Result<PathBuf> {
        let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        debug!("Using scratch directory {}", scratch.path().display());

        let archive = scratch.path().join(archive_file_name(url));
        self.downloader.download(url, &archive, &self.options)?;

        let extracted = extraction_directory(scratch.path());
        extract_archive(&archive, &extracted)?;

        let binary =
            find_by_name(&extracted, &self.tool).ok_or_else(|| SetupError::ExecutableNotFound {
                tool: self.tool.clone(),
                searched: url.to_string(),
            })?;
        debug!("Found {} at {}", self.tool, binary.display());

        let target = self.place(&binary, install_dir)?;
        info!("Installed {} to {}", self.tool, target.display());
        Ok(target)
    }

    /// Copy an already cached binary to `<install_dir>/<tool>` without any
    /// network access.
    pub fn restore(&self, cached: &Path, install_dir: &Path) -> Result<PathBuf> {
        let target = self.place(cached, install_dir)?;
        info!("Restored {} to {} from tool cache", self.tool, target.display());
        Ok(target)
    }

    fn place(&self, binary: &Path, install_dir: &Path) -> Result<PathBuf> {
        let install_dir = ensure_directory(install_dir.to_path_buf())?;
        let target = install_dir.join(&self.tool);
        copy_executable(binary, &target).map_err(|e| {
            SetupError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to install {} to {}: {e}", self.tool, target.display()),
            ))
        })?;
        Ok(target)
    }
}
