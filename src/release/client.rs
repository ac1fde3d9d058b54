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

use crate::error::{Result, SetupError};
use crate::release::models::Release;
use crate::user_agent;
use attohttpc::Session;
use log::{debug, trace};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: u64 = 30;
const RELEASES_PER_PAGE: &str = "100";

/// Source of release metadata for the upstream repository.
///
/// Abstracted so the resolver can be exercised without network access.
pub trait ReleaseSource {
    fn list_releases(&self) -> Result<Vec<Release>>;
}

/// Blocking client for the GitHub releases listing endpoint.
#[derive(Debug, Clone)]
pub struct GithubReleaseClient {
    pub(crate) session: Session,
    pub(crate) api_url: String,
    repository: String,
    token: Option<String>,
}

impl GithubReleaseClient {
    pub fn new(repository: &str) -> Self {
        let mut session = Session::new();
        session.header("User-Agent", user_agent::release_client());
        session.header("Accept", "application/vnd.github+json");
        session.timeout(Duration::from_secs(DEFAULT_TIMEOUT));
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        Self {
            session,
            api_url: DEFAULT_API_URL.to_string(),
            repository: repository.to_string(),
            token: None,
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/releases", self.api_url, self.repository)
    }
}

impl ReleaseSource for GithubReleaseClient {
    fn list_releases(&self) -> Result<Vec<Release>> {
        let url = self.releases_url();
        debug!("Fetching release listing from {url}");

        let mut request = self.session.get(&url).param("per_page", RELEASES_PER_PAGE);
        if let Some(token) = &self.token {
            request = request.try_header("Authorization", format!("Bearer {token}"))?;
        }

        let response = request
            .send()
            .map_err(|e| SetupError::ReleaseLookup(format!("Failed to fetch {url}: {e}")))?;

        if !response.is_success() {
            return Err(SetupError::ReleaseLookup(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }

        let releases: Vec<Release> = response
            .json()
            .map_err(|e| SetupError::ReleaseLookup(format!("Failed to parse {url}: {e}")))?;

        trace!("Release listing returned {} entries", releases.len());
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const LISTING: &str = r#"[
        {
            "tag_name": "v1.2.0",
            "draft": false,
            "prerelease": false,
            "assets": [
                {"name": "gokcat_linux_x86_64.tar.gz", "browser_download_url": "https://example.com/x86_64.tar.gz"}
            ]
        },
        {"tag_name": "v1.1.0", "assets": []}
    ]"#;

    #[test]
    fn test_list_releases_success() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/philipparndt/gokcat/releases")
            .match_query(mockito::Matcher::UrlEncoded(
                "per_page".into(),
                "100".into(),
            ))
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LISTING)
            .create();

        let client = GithubReleaseClient::new("philipparndt/gokcat").with_api_url(&server.url());
        let releases = client.list_releases().unwrap();

        mock.assert();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.2.0");
        assert_eq!(releases[0].assets[0].name, "gokcat_linux_x86_64.tar.gz");
    }

    #[test]
    fn test_list_releases_sends_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/philipparndt/gokcat/releases")
            .match_query(mockito::Matcher::Any)
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body("[]")
            .create();

        let client = GithubReleaseClient::new("philipparndt/gokcat")
            .with_api_url(&server.url())
            .with_token(Some("secret-token".to_string()));
        let releases = client.list_releases().unwrap();

        mock.assert();
        assert!(releases.is_empty());
    }

    #[test]
    fn test_list_releases_http_error() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/philipparndt/gokcat/releases")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create();

        let client = GithubReleaseClient::new("philipparndt/gokcat").with_api_url(&server.url());
        let err = client.list_releases().unwrap_err();

        assert!(matches!(err, SetupError::ReleaseLookup(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_list_releases_malformed_payload() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/philipparndt/gokcat/releases")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create();

        let client = GithubReleaseClient::new("philipparndt/gokcat").with_api_url(&server.url());
        let err = client.list_releases().unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_releases_url_trims_trailing_slash() {
        let client = GithubReleaseClient::new("philipparndt/gokcat")
            .with_api_url("https://ghe.example.com/api/v3/");
        assert_eq!(
            client.releases_url(),
            "https://ghe.example.com/api/v3/repos/philipparndt/gokcat/releases"
        );
    }
}
