#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use reqwest::{
    Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use tracing::{debug, instrument};

use crate::{
    config::DestinationConfig,
    release::{AssetUpload, DestinationRelease, NewRelease},
};

use super::{DestinationHost, HostError, HostResult, PER_PAGE, collect_pages, create_client};

pub mod models;

use self::models::{GiteeCreateRelease, GiteeRelease};

/**
    Read and write access to releases of a single Gitee repository.

    Gitee expects the access token as a query parameter (or in the
    JSON body), so no authorization header is set on the client.
*/
#[derive(Debug, Clone)]
pub struct GiteeDestination {
    client: ClientWithMiddleware,
    repo_url: String,
    token: String,
}

impl GiteeDestination {
    /**
        Creates a new Gitee destination for the configured repository.

        # Errors

        - If the Gitee API client could not be created.
    */
    pub fn new(config: &DestinationConfig) -> HostResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = create_client(headers)?;

        Ok(Self {
            client,
            repo_url: format!(
                "{base}/repos/{owner}/{repo}",
                base = config.api_url,
                owner = config.owner,
                repo = config.repo,
            ),
            token: config.token.clone(),
        })
    }

    fn releases_url(&self) -> String {
        format!("{}/releases", self.repo_url)
    }

    fn list_request(&self, url: &str, page: usize) -> RequestBuilder {
        self.client.get(url).query(&[
            ("access_token", self.token.as_str()),
            ("page", page.to_string().as_str()),
            ("per_page", PER_PAGE.to_string().as_str()),
        ])
    }

    fn delete_request(&self, id: u64) -> RequestBuilder {
        let url = format!("{}/{id}", self.releases_url());
        self.client
            .delete(url)
            .query(&[("access_token", self.token.as_str())])
    }

    async fn list_page(&self, url: &str, page: usize) -> HostResult<Vec<GiteeRelease>> {
        let batch = self
            .list_request(url, page)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(batch)
    }
}

const DELETE_SUCCESS: StatusCode = StatusCode::NO_CONTENT;
const CREATE_SUCCESS: StatusCode = StatusCode::CREATED;
const ATTACH_SUCCESS: StatusCode = StatusCode::CREATED;

/**
    Gitee endpoints document exactly one success status each,
    any other status, even another 2xx, counts as a failure.
*/
fn is_expected_status(status: StatusCode, expected: StatusCode) -> bool {
    status == expected
}

async fn expect_status(
    response: Response,
    expected: StatusCode,
    operation: &'static str,
) -> HostResult<Response> {
    let status = response.status();
    if is_expected_status(status, expected) {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {}>", e.without_url()));
    Err(HostError::UnexpectedStatus {
        operation,
        status,
        body,
    })
}

#[async_trait]
impl DestinationHost for GiteeDestination {
    #[instrument(skip(self), fields(repo = %self.repo_url), level = "debug")]
    async fn list_releases(&self) -> HostResult<Vec<DestinationRelease>> {
        let url = self.releases_url();
        let url = url.as_str();

        let releases = collect_pages(move |page| self.list_page(url, page))
            .await?
            .into_iter()
            .map(DestinationRelease::from)
            .collect::<Vec<_>>();

        debug!(count = releases.len(), "fetched releases");
        Ok(releases)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_release(&self, id: u64) -> HostResult<()> {
        let response = self.delete_request(id).send().await?;
        expect_status(response, DELETE_SUCCESS, "delete release").await?;
        Ok(())
    }

    #[instrument(skip(self, release), fields(tag = %release.tag), level = "debug")]
    async fn create_release(&self, release: &NewRelease<'_>) -> HostResult<DestinationRelease> {
        let payload = GiteeCreateRelease::new(&self.token, release);
        let response = self
            .client
            .post(self.releases_url())
            .json(&payload)
            .send()
            .await?;
        let response = expect_status(response, CREATE_SUCCESS, "create release").await?;
        let created: GiteeRelease = response.json().await?;
        Ok(created.into())
    }

    #[instrument(
        skip(self, upload),
        fields(name = %upload.name, size = upload.contents.len()),
        level = "debug"
    )]
    async fn attach_asset(&self, release_id: u64, upload: AssetUpload<'_>) -> HostResult<()> {
        let url = format!("{}/{release_id}/attach_files", self.releases_url());
        let part = Part::bytes(upload.contents)
            .file_name(upload.name.to_string())
            .mime_str(upload.content_type)?;
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.token.as_str())])
            .multipart(form)
            .send()
            .await?;
        expect_status(response, ATTACH_SUCCESS, "attach asset").await?;
        Ok(())
    }
}
