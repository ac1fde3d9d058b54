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

mod client;
mod http_file_downloader;
mod options;
mod progress;

pub use client::{AttohttpcClient, HttpClient, HttpResponse};
pub use http_file_downloader::{HttpFileDownloader, ProgressReporter};
pub use options::{DEFAULT_TIMEOUT, DownloadOptions, MAX_DOWNLOAD_SIZE};
pub use progress::LogProgressReporter;

const FALLBACK_ARCHIVE_NAME: &str = "archive.tar.gz";

/// File name to store a download under, taken from the last URL segment.
pub fn archive_file_name(url: &str) -> &str {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.split('/').next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_ARCHIVE_NAME)
}
