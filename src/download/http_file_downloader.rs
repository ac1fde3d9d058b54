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

use crate::download::client::{AttohttpcClient, HttpClient, HttpResponse};
use crate::download::options::DownloadOptions;
use crate::error::{Result, SetupError};
use log::{debug, trace};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DOWNLOAD_CHUNK_SIZE: usize = 8192;

pub trait ProgressReporter: Send + Sync {
    fn on_start(&mut self, total_bytes: u64);

    fn on_progress(&mut self, bytes_downloaded: u64);

    fn on_complete(&mut self);
}

pub struct HttpFileDownloader {
    pub(crate) http_client: Box<dyn HttpClient>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl Default for HttpFileDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFileDownloader {
    pub fn new() -> Self {
        Self::with_client(Box::new(AttohttpcClient::new()))
    }

    pub fn with_client(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            http_client,
            progress_reporter: None,
        }
    }

    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Download `url` to `destination`.
    ///
    /// The body is streamed into a temporary file next to the destination and
    /// renamed once complete. Every failure is reported as
    /// [`SetupError::Download`] carrying the URL.
    pub fn download(
        &mut self,
        url: &str,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        self.download_inner(url, destination, options)
            .map_err(|e| match e {
                SetupError::Download { .. } => e,
                other => download_error(url, other.to_string()),
            })
    }

    fn download_inner(
        &mut self,
        url: &str,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        self.http_client.set_timeout(options.timeout);

        debug!("GET {url}");
        let response = self.http_client.get(url)?;

        self.validate_response(url, response.as_ref(), options.max_size)?;
        if let Some(final_url) = response.final_url() {
            trace!("Download resolved to {final_url}");
        }

        let total_size = self.get_total_size(response.as_ref());

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_start(total_size);
        }

        // Use a temporary file for atomic writes; it is removed on error
        let temp_file =
            NamedTempFile::new_in(destination.parent().unwrap_or_else(|| Path::new(".")))?;
        self.download_to_file(response, temp_file.as_file(), options.max_size)?;
        temp_file.persist(destination).map_err(|e| e.error)?;

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_complete();
        }

        Ok(destination.to_path_buf())
    }

    fn validate_response(&self, url: &str, response: &dyn HttpResponse, max_size: u64) -> Result<()> {
        let status = response.status();

        if !(200..300).contains(&status) {
            return Err(download_error(url, format!("HTTP status {status}")));
        }

        if let Some(length) = content_length(response)
            && length > max_size
        {
            return Err(download_error(
                url,
                format!("download size {length} exceeds maximum allowed size {max_size}"),
            ));
        }

        Ok(())
    }

    fn get_total_size(&self, response: &dyn HttpResponse) -> u64 {
        // If we can't determine size, return 0 (unknown)
        content_length(response).unwrap_or(0)
    }

    fn download_to_file(
        &mut self,
        mut response: Box<dyn HttpResponse>,
        file: &File,
        max_size: u64,
    ) -> Result<()> {
        let mut writer = BufWriter::new(file);
        let mut downloaded = 0u64;
        let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

        loop {
            match response.read(&mut buffer) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    writer.write_all(&buffer[..n])?;
                    downloaded += n as u64;

                    if downloaded > max_size {
                        return Err(SetupError::Io(std::io::Error::other(format!(
                            "download exceeded maximum allowed size {max_size}"
                        ))));
                    }

                    if let Some(reporter) = &mut self.progress_reporter {
                        reporter.on_progress(downloaded);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        writer.flush()?;
        trace!("Wrote {downloaded} bytes");
        Ok(())
    }
}

fn content_length(response: &dyn HttpResponse) -> Option<u64> {
    response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok())
}

fn download_error(url: &str, reason: String) -> SetupError {
    SetupError::Download {
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
#[path = "http_file_downloader_tests.rs"]
mod http_file_downloader_tests;
