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

#[cfg(test)]
mod tests {
    use crate::download::{
        DownloadOptions, HttpClient, HttpFileDownloader, HttpResponse, ProgressReporter,
    };
    use crate::error::{Result, SetupError};
    use std::io::{Cursor, Read};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::tempdir;

    // Mock implementations for testing
    struct MockHttpClient {
        responses: Vec<MockResponse>,
        request_count: Arc<Mutex<usize>>,
    }

    struct MockResponse {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl MockHttpClient {
        fn new(responses: Vec<MockResponse>) -> Self {
            Self {
                responses,
                request_count: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, _url: &str) -> Result<Box<dyn HttpResponse>> {
            let mut count = self.request_count.lock().unwrap();
            if *count >= self.responses.len() {
                return Err(SetupError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "No more mock responses",
                )));
            }

            let response = &self.responses[*count];
            *count += 1;

            Ok(Box::new(MockHttpResponse {
                status: response.status,
                headers: response.headers.clone(),
                body: Cursor::new(response.body.clone()),
            }))
        }

        fn set_timeout(&mut self, _timeout: Duration) {
            // Mock implementation - no-op
        }
    }

    struct MockHttpResponse {
        status: u16,
        headers: Vec<(String, String)>,
        body: Cursor<Vec<u8>>,
    }

    impl Read for MockHttpResponse {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.body.read(buf)
        }
    }

    impl HttpResponse for MockHttpResponse {
        fn status(&self) -> u16 {
            self.status
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        fn final_url(&self) -> Option<&str> {
            None
        }
    }

    struct RecordingReporter {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn on_start(&mut self, total_bytes: u64) {
            self.events.lock().unwrap().push(format!("start:{total_bytes}"));
        }

        fn on_progress(&mut self, bytes_downloaded: u64) {
            self.events
                .lock()
                .unwrap()
                .push(format!("progress:{bytes_downloaded}"));
        }

        fn on_complete(&mut self) {
            self.events.lock().unwrap().push("complete".to_string());
        }
    }

    const URL: &str = "https://example.com/gokcat_linux_x86_64.tar.gz";

    #[test]
    fn test_download_with_mock_client() {
        let test_content = b"gokcat archive bytes";
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![("Content-Length".to_string(), test_content.len().to_string())],
            body: test_content.to_vec(),
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("gokcat.tar.gz");

        let result = downloader.download(URL, &dest_path, &DownloadOptions::default());

        assert_eq!(result.unwrap(), dest_path);
        assert_eq!(std::fs::read(&dest_path).unwrap(), test_content);
    }

    #[test]
    fn test_download_reports_progress() {
        let test_content = b"0123456789";
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![("Content-Length".to_string(), "10".to_string())],
            body: test_content.to_vec(),
        }]);
        let events = Arc::new(Mutex::new(Vec::new()));

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client))
            .with_progress_reporter(Box::new(RecordingReporter {
                events: events.clone(),
            }));
        let temp_dir = tempdir().unwrap();

        downloader
            .download(URL, &temp_dir.path().join("a.tar.gz"), &DownloadOptions::default())
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.first().unwrap(), "start:10");
        assert!(events.contains(&"progress:10".to_string()));
        assert_eq!(events.last().unwrap(), "complete");
    }

    #[test]
    fn test_download_with_http_error() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 404,
            headers: vec![],
            body: vec![],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("gokcat.tar.gz");

        let result = downloader.download(URL, &dest_path, &DownloadOptions::default());

        match result.unwrap_err() {
            SetupError::Download { url, reason } => {
                assert_eq!(url, URL);
                assert!(reason.contains("404"));
            }
            other => panic!("Expected Download error, got {other:?}"),
        }
        assert!(!dest_path.exists());
    }

    #[test]
    fn test_transport_error_is_download_error() {
        let mock_client = MockHttpClient::new(vec![]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();

        let err = downloader
            .download(URL, &temp_dir.path().join("a.tar.gz"), &DownloadOptions::default())
            .unwrap_err();

        assert!(matches!(err, SetupError::Download { .. }));
        assert!(err.to_string().starts_with("download failed for"));
        assert!(err.to_string().contains(URL));
    }

    #[test]
    fn test_download_exceeding_size_limit() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![("Content-Length".to_string(), "2000000000".to_string())],
            body: vec![],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();

        let err = downloader
            .download(URL, &temp_dir.path().join("a.tar.gz"), &DownloadOptions::default())
            .unwrap_err();

        match err {
            SetupError::Download { reason, .. } => assert!(reason.contains("exceeds maximum")),
            other => panic!("Expected Download error, got {other:?}"),
        }
    }

    #[test]
    fn test_body_larger_than_limit_without_content_length() {
        let mock_client = MockHttpClient::new(vec![MockResponse {
            status: 200,
            headers: vec![],
            body: vec![0u8; 64],
        }]);

        let mut downloader = HttpFileDownloader::with_client(Box::new(mock_client));
        let temp_dir = tempdir().unwrap();
        let dest_path = temp_dir.path().join("a.tar.gz");
        let options = DownloadOptions {
            max_size: 16,
            ..Default::default()
        };

        let err = downloader.download(URL, &dest_path, &options).unwrap_err();

        assert!(matches!(err, SetupError::Download { .. }));
        assert!(!dest_path.exists());
    }
}
