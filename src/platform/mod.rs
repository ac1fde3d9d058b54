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

mod file_ops;

pub use file_ops::{copy_executable, is_executable, make_executable};

use std::fmt;

/// Operating system label the upstream project publishes binaries for.
pub const LINUX: &str = "linux";

/// Normalized (os, arch) pair in gokcat's release naming convention.
///
/// Derived once per run and consumed by the resolver, the cache key and the
/// asset matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// Map a raw OS/architecture pair onto gokcat's asset naming.
    ///
    /// Accepts both the Node.js style names used by runner images (`darwin`,
    /// `x64`, `arm64`) and Rust's `std::env::consts` names (`macos`, `x86_64`,
    /// `aarch64`).
    ///
    /// - `arm64` / `aarch64` → `"arm64"`
    /// - `x64` / `amd64` → `"x86_64"`
    /// - `darwin` / `macos` → `"linux"` (gokcat only publishes Linux builds)
    /// - anything else passes through unchanged
    pub fn normalize(os: &str, arch: &str) -> Self {
        Self {
            os: normalize_os(os).to_string(),
            arch: normalize_arch(arch).to_string(),
        }
    }

    /// Platform of the running process.
    ///
    /// # Example
    ///
    /// ```
    /// use gokcat_setup::platform::Platform;
    ///
    /// let platform = Platform::current();
    /// assert_ne!(platform.os, "darwin");
    /// ```
    pub fn current() -> Self {
        Self::normalize(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Fragment every matching release asset name contains, e.g. `linux_x86_64`.
    pub fn asset_fragment(&self) -> String {
        format!("{}_{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn normalize_os(os: &str) -> &str {
    match os {
        "darwin" | "macos" => LINUX,
        other => other,
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "arm64" | "aarch64" => "arm64",
        "x64" | "amd64" => "x86_64",
        other => other,
    }
}
