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

//! Shared fixtures for unit tests: in-memory release archives and an HTTP
//! client that serves canned responses and counts requests.

use crate::download::{HttpClient, HttpResponse};
use crate::error::{Result, SetupError};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a `.tar.gz` archive in memory.
///
/// # Arguments
/// * `entries` - `(path inside the archive, content)` pairs, all written with mode 0o755
pub fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
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

/// A release archive as published for gokcat, with the binary at the root.
pub fn gokcat_archive(binary: &[u8]) -> Vec<u8> {
    tar_gz_bytes(&[
        ("gokcat", binary),
        ("LICENSE", &b"MIT"[..]),
        ("README.md", &b"# gokcat"[..]),
    ])
}

/// Serves canned `(status, body)` pairs keyed by URL. Unknown URLs fail the
/// way a refused connection would.
#[derive(Clone, Default)]
pub struct CannedHttpClient {
    responses: HashMap<String, (u16, Vec<u8>)>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, status: u16, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), (status, body));
        self
    }

    /// Handle on the request log; stays valid after the client is boxed.
    pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

impl HttpClient for CannedHttpClient {
    fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.responses.get(url) {
            Some((status, body)) => Ok(Box::new(CannedResponse {
                status: *status,
                content_length: body.len().to_string(),
                body: Cursor::new(body.clone()),
            })),
            None => Err(SetupError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("no canned response for {url}"),
            ))),
        }
    }

    fn set_timeout(&mut self, _timeout: Duration) {}
}

struct CannedResponse {
    status: u16,
    content_length: String,
    body: Cursor<Vec<u8>>,
}

impl Read for CannedResponse {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.body.read(buf)
    }
}

impl HttpResponse for CannedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<&str> {
        name.eq_ignore_ascii_case("content-length")
            .then_some(self.content_length.as_str())
    }

    fn final_url(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_client_records_requests() {
        let client =
            CannedHttpClient::new().with_response("https://example.com/a", 200, b"ok".to_vec());
        let requests = client.requests();

        let mut body = String::new();
        client
            .get("https://example.com/a")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "ok");
        assert!(client.get("https://example.com/missing").is_err());

        assert_eq!(
            *requests.lock().unwrap(),
            vec!["https://example.com/a", "https://example.com/missing"]
        );
    }

    #[test]
    fn test_gokcat_archive_is_gzip() {
        let bytes = gokcat_archive(b"binary");
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }
}
