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

use semver::Version;

/// Prefix prepended to explicit versions that lack one.
pub const VERSION_PREFIX: char = 'v';

/// Whether a tag names a release candidate (excluded from "latest").
pub fn is_release_candidate(tag: &str) -> bool {
    tag.to_ascii_lowercase().contains("rc")
}

/// Parse a release tag such as `v1.2.0` or `1.2.0` as a semantic version.
pub fn parse_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let bare = trimmed
        .strip_prefix(VERSION_PREFIX)
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(bare).ok()
}

/// Ensure an explicit version carries a leading `v`.
///
/// A `V` prefix is accepted as well, matching [`parse_tag`], and kept as given.
pub fn with_version_prefix(version: &str) -> String {
    let trimmed = version.trim();
    if trimmed.starts_with(VERSION_PREFIX) || trimmed.starts_with('V') {
        trimmed.to_string()
    } else {
        format!("{VERSION_PREFIX}{trimmed}")
    }
}
