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

use crate::cache::{CacheKey, ToolCache};
use crate::config::{FALLBACK_VERSION, REPOSITORY, SetupConfig};
use crate::error::Result;
use crate::installation::Installer;
use crate::output::{OUTPUT_NAME, OutputReporter};
use crate::platform::Platform;
use crate::release::{
    ReleaseCoordinates, ReleaseResolver, ReleaseSource, ResolutionSource, ResolvedRelease,
    is_latest, with_version_prefix,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// What a setup run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    /// Path reported as the `gokcat-path` output, always `<install-dir>/<tool>`.
    pub path: PathBuf,
    /// Concrete version that was installed or restored.
    pub version: String,
    pub cache_hit: bool,
    /// Resolution gave up and used the pinned version.
    pub fell_back: bool,
}

/// Cache lookup, then resolve, install, store and report on a miss.
pub struct SetupCommand<'a> {
    config: &'a SetupConfig,
    platform: Platform,
    source: &'a dyn ReleaseSource,
    cache: ToolCache,
    installer: Installer,
    reporter: &'a mut OutputReporter,
}

impl<'a> SetupCommand<'a> {
    pub fn new(
        config: &'a SetupConfig,
        platform: Platform,
        source: &'a dyn ReleaseSource,
        cache: ToolCache,
        installer: Installer,
        reporter: &'a mut OutputReporter,
    ) -> Self {
        Self {
            config,
            platform,
            source,
            cache,
            installer,
            reporter,
        }
    }

    pub fn coordinates(&self) -> ReleaseCoordinates {
        ReleaseCoordinates {
            repository: REPOSITORY.to_string(),
            tool: self.installer.tool().to_string(),
            fallback_version: FALLBACK_VERSION.to_string(),
            server_url: self.config.server_url.clone(),
        }
    }

    pub fn execute(&mut self) -> Result<SetupOutcome> {
        let tool = self.installer.tool().to_string();
        info!("Setting up {tool} {} for {}", self.config.version, self.platform);

        let precheck = self.cache_candidate(&tool)?;
        if let Some(key) = &precheck
            && let Some(cached) = self.cache.find(key)
        {
            return self.finish_from_cache(key, &cached, false);
        }

        let coordinates = self.coordinates();
        let resolved =
            ReleaseResolver::new(self.source, &coordinates, &self.platform).resolve(&self.config.version);
        let fell_back = resolved.is_fallback();
        let key = CacheKey::new(tool.as_str(), resolved.version.as_str(), self.platform.arch.as_str())?;

        if precheck.as_ref() != Some(&key)
            && let Some(cached) = self.cache.find(&key)
        {
            self.remember_latest(&resolved, &key);
            return self.finish_from_cache(&key, &cached, fell_back);
        }

        debug!("Tool cache miss for {key}, installing from {}", resolved.download_url);
        let installed = self
            .installer
            .install(&resolved.download_url, &self.config.install_dir)?;

        match self.cache.store(&installed, &key) {
            Ok(cached) => {
                debug!("Cached {key} at {}", cached.display());
                self.remember_latest(&resolved, &key);
            }
            Err(e) => warn!("{e}; continuing with {}", installed.display()),
        }

        self.report(&installed)?;
        Ok(SetupOutcome {
            path: installed,
            version: resolved.version,
            cache_hit: false,
            fell_back,
        })
    }

    /// Key that can be checked before any network access.
    ///
    /// An explicit version always has one. `latest` only does when an earlier
    /// run resolved it from the release listing and that entry is still cached.
    fn cache_candidate(&self, tool: &str) -> Result<Option<CacheKey>> {
        let version = if is_latest(&self.config.version) {
            if self.config.always_check_latest {
                debug!("always-check-latest is set, consulting the release listing first");
                return Ok(None);
            }
            match self.cache.latest_resolved(tool, &self.platform.arch) {
                Some(version) => version,
                None => return Ok(None),
            }
        } else {
            with_version_prefix(&self.config.version)
        };

        CacheKey::new(tool, version, self.platform.arch.as_str()).map(Some)
    }

    /// Record a listing-based resolution so later `latest` runs can stay offline.
    fn remember_latest(&self, resolved: &ResolvedRelease, key: &CacheKey) {
        if resolved.source != ResolutionSource::Latest {
            return;
        }
        if let Err(e) = self.cache.record_latest(key.tool(), key.arch(), key.version()) {
            warn!("{e}");
        }
    }

    fn finish_from_cache(
        &mut self,
        key: &CacheKey,
        cached: &Path,
        fell_back: bool,
    ) -> Result<SetupOutcome> {
        info!("Found {key} in tool cache at {}", cached.display());
        let installed = self.installer.restore(cached, &self.config.install_dir)?;
        self.report(&installed)?;
        Ok(SetupOutcome {
            path: installed,
            version: key.version().to_string(),
            cache_hit: true,
            fell_back,
        })
    }

    fn report(&mut self, binary: &Path) -> Result<()> {
        self.reporter
            .set_output(OUTPUT_NAME, &binary.display().to_string())?;

        if !self.config.add_to_path {
            return Ok(());
        }
        if let Some(dir) = binary.parent()
            && let Some(path) = self.reporter.add_path(dir)?
        {
            debug!("Search path for later steps: {}", path.to_string_lossy());
        }
        Ok(())
    }
}
