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

//! User-Agent string constants and utilities for consistent HTTP client identification.
//!
//! GitHub rejects API requests without a User-Agent, so every client in this
//! crate builds its header from these helpers.

/// The package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for the GitHub releases listing client
pub fn release_client() -> String {
    format!("gokcat-setup/releases/{VERSION}")
}

/// User-Agent for download client
pub fn download_client() -> String {
    format!("gokcat-setup/download/{VERSION}")
}
