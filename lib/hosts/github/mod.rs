#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::{
    config::SourceConfig,
    release::{Asset, Release},
};

use super::{HostResult, PER_PAGE, SourceHost, collect_pages, create_client};

pub mod models;

use self::models::GithubRelease;

/**
    Read access to releases of a single GitHub repository.
*/
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: ClientWithMiddleware,
    api_url: String,
    repository: String,
}

impl GithubSource {
    /**
        Creates a new authenticated GitHub source for the configured repository.

        Note that this does not verify the validity of the token,
        an invalid token will surface as an error when listing releases.

        # Errors

        - If the GitHub API client could not be created.
    */
    pub fn new(config: &SourceConfig) -> HostResult<Self> {
        let headers = {
            let mut headers = HeaderMap::new();
            headers.insert(
                HeaderName::from_static("x-github-api-version"),
                HeaderValue::from_static("2022-11-28"),
            );
            let token = format!("Bearer {}", config.token.trim());
            let mut value = HeaderValue::from_str(&token)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            headers
        };

        let client = create_client(headers)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            repository: config.repository.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, page: usize) -> HostResult<T> {
        let response = self
            .client
            .get(url)
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    fn download_request(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/octet-stream"))
    }

    async fn get_bytes(&self, url: &str) -> HostResult<Vec<u8>> {
        let response = self
            .download_request(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SourceHost for GithubSource {
    /**
        Fetches all releases, following pagination until a short page is returned.
    */
    #[instrument(skip(self), fields(repository = %self.repository), level = "debug")]
    async fn list_releases(&self) -> HostResult<Vec<Release>> {
        let url = format!(
            "{base}/repos/{repo}/releases",
            base = self.api_url,
            repo = self.repository,
        );
        let url = url.as_str();

        let releases = collect_pages(move |page| self.get_json::<Vec<GithubRelease>>(url, page))
            .await?
            .into_iter()
            .map(Release::from)
            .collect::<Vec<_>>();

        debug!(count = releases.len(), "fetched releases");
        Ok(releases)
    }

    /**
        Downloads the raw contents of an asset.

        The octet-stream accept header is required, without it
        the API returns a JSON description of the asset instead.
    */
    #[instrument(skip(self, asset), fields(name = %asset.name), level = "debug")]
    async fn download_asset(&self, asset: &Asset) -> HostResult<Vec<u8>> {
        debug!(url = %asset.retrieval_locator, "downloading asset contents");
        self.get_bytes(asset.retrieval_locator.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GithubSource {
        GithubSource::new(&SourceConfig {
            token: "ghp_token".to_string(),
            repository: "o/r".to_string(),
            api_url: "https://api.github.com".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn downloads_request_raw_contents() {
        let request = source()
            .download_request("https://api.github.com/repos/o/r/releases/assets/77")
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(ACCEPT).unwrap(),
            "application/octet-stream"
        );
    }
}
