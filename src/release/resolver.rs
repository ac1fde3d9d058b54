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

use crate::platform::Platform;
use crate::release::client::ReleaseSource;
use crate::release::models::{Release, ResolutionSource, ResolvedRelease};
use crate::release::version::{is_release_candidate, parse_tag, with_version_prefix};
use log::{debug, info, warn};

/// Token requesting the newest published release.
pub const LATEST: &str = "latest";

/// Required suffix of a downloadable release archive.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Where a tool's releases live and how its archives are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCoordinates {
    /// `owner/repo` on GitHub.
    pub repository: String,
    /// Binary name; also the archive name prefix.
    pub tool: String,
    /// Known-good version used whenever resolution fails.
    pub fallback_version: String,
    /// Web base URL, e.g. `https://github.com`.
    pub server_url: String,
}

impl ReleaseCoordinates {
    /// `<server>/<repo>/releases/download/<version>/<tool>_<os>_<arch>.tar.gz`
    pub fn download_url(&self, version: &str, platform: &Platform) -> String {
        format!(
            "{}/{}/releases/download/{}/{}_{}{}",
            self.server_url.trim_end_matches('/'),
            self.repository,
            version,
            self.tool,
            platform.asset_fragment(),
            ARCHIVE_SUFFIX
        )
    }
}

pub fn is_latest(desired: &str) -> bool {
    desired.trim().eq_ignore_ascii_case(LATEST)
}

/// Turns a version token into a concrete tag and download URL.
///
/// Resolution never fails: any problem with the release listing degrades to
/// the pinned fallback version with a warning.
pub struct ReleaseResolver<'a> {
    source: &'a dyn ReleaseSource,
    coordinates: &'a ReleaseCoordinates,
    platform: &'a Platform,
}

impl<'a> ReleaseResolver<'a> {
    pub fn new(
        source: &'a dyn ReleaseSource,
        coordinates: &'a ReleaseCoordinates,
        platform: &'a Platform,
    ) -> Self {
        Self {
            source,
            coordinates,
            platform,
        }
    }

    pub fn resolve(&self, desired: &str) -> ResolvedRelease {
        if is_latest(desired) {
            return self.resolve_latest();
        }

        let version = with_version_prefix(desired);
        debug!("Using explicit version {version}");
        ResolvedRelease {
            download_url: self.coordinates.download_url(&version, self.platform),
            version,
            source: ResolutionSource::Explicit,
        }
    }

    fn resolve_latest(&self) -> ResolvedRelease {
        let releases = match self.source.list_releases() {
            Ok(releases) => releases,
            Err(e) => {
                warn!(
                    "Could not query releases ({e}), falling back to {}",
                    self.coordinates.fallback_version
                );
                return self.fallback();
            }
        };

        let Some(release) = select_latest(&releases) else {
            warn!(
                "No suitable release found in listing, falling back to {}",
                self.coordinates.fallback_version
            );
            return self.fallback();
        };

        match match_asset(release, self.platform) {
            Some(url) => {
                info!("Resolved latest {} release to {}", self.coordinates.tool, release.tag_name);
                ResolvedRelease {
                    version: release.tag_name.clone(),
                    download_url: url.to_string(),
                    source: ResolutionSource::Latest,
                }
            }
            None => {
                warn!(
                    "Could not find a {} asset for {} in release {}, falling back to {}",
                    ARCHIVE_SUFFIX,
                    self.platform,
                    release.tag_name,
                    self.coordinates.fallback_version
                );
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedRelease {
        let version = self.coordinates.fallback_version.clone();
        ResolvedRelease {
            download_url: self.coordinates.download_url(&version, self.platform),
            version,
            source: ResolutionSource::Fallback,
        }
    }
}

/// Highest semantic version among published, non release-candidate tags.
pub fn select_latest(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .filter(|release| !release.draft && !is_release_candidate(&release.tag_name))
        .filter_map(|release| parse_tag(&release.tag_name).map(|version| (version, release)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, release)| release)
}

/// URL of the first asset, in listed order, built for `platform`.
pub fn match_asset<'r>(release: &'r Release, platform: &Platform) -> Option<&'r str> {
    let fragment = platform.asset_fragment();
    release
        .assets
        .iter()
        .find(|asset| asset.name.contains(&fragment) && asset.name.ends_with(ARCHIVE_SUFFIX))
        .map(|asset| asset.browser_download_url.as_str())
}
