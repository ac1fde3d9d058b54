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

/// Shared fixtures for integration tests: release archives and GitHub API payloads
use serde_json::{Value, json};

pub const LISTING_PATH: &str = "/repos/philipparndt/gokcat/releases";

/// Builds a gzip-compressed tar archive in memory
///
/// # Arguments
/// * `entries` - `(path inside the archive, content)` pairs
#[allow(dead_code)]
pub fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(gz);

    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append(&header, *content).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// A release archive laid out the way gokcat publishes it
#[allow(dead_code)]
pub fn gokcat_archive(binary: &[u8]) -> Vec<u8> {
    tar_gz(&[
        ("LICENSE", &b"MIT License"[..]),
        ("README.md", &b"# gokcat"[..]),
        ("gokcat", binary),
    ])
}

/// Path of a release asset below the server URL
#[allow(dead_code)]
pub fn download_path(version: &str, asset_fragment: &str) -> String {
    format!("/philipparndt/gokcat/releases/download/{version}/gokcat_{asset_fragment}.tar.gz")
}

/// One entry of the releases listing with a single asset for `asset_fragment`
#[allow(dead_code)]
pub fn release_json(server_url: &str, tag: &str, asset_fragment: &str) -> Value {
    json!({
        "tag_name": tag,
        "name": tag,
        "draft": false,
        "prerelease": false,
        "assets": [
            {
                "name": "checksums.txt",
                "browser_download_url": format!("{server_url}/philipparndt/gokcat/releases/download/{tag}/checksums.txt")
            },
            {
                "name": format!("gokcat_{asset_fragment}.tar.gz"),
                "browser_download_url": format!("{server_url}{}", download_path(tag, asset_fragment))
            }
        ]
    })
}
