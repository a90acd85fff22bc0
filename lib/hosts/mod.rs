use std::future::Future;

use async_trait::async_trait;
use tracing::debug;

use crate::release::{Asset, AssetUpload, DestinationRelease, NewRelease, Release};

mod client;
mod result;

pub mod gitee;
pub mod github;

pub use self::client::create_client;
pub use self::result::{HostError, HostResult};

/**
    Number of items requested per page from paginated list endpoints.
*/
pub(crate) const PER_PAGE: usize = 100;

/**
    Fetches pages starting at page 1 until one comes back with
    fewer than [`PER_PAGE`] items, concatenating all of them.
*/
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> HostResult<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = HostResult<Vec<T>>>,
{
    let mut items = Vec::new();
    for page in 1.. {
        debug!(page, "fetching page");
        let batch = fetch_page(page).await?;
        let count = batch.len();
        items.extend(batch);
        if count < PER_PAGE {
            break;
        }
    }
    Ok(items)
}

/**
    The authoritative origin of releases.
*/
#[async_trait]
pub trait SourceHost: Send + Sync {
    /**
        Lists every release of the source repository, in the order returned by the host.
    */
    async fn list_releases(&self) -> HostResult<Vec<Release>>;

    /**
        Downloads the raw contents of the given asset.
    */
    async fn download_asset(&self, asset: &Asset) -> HostResult<Vec<u8>>;
}

/**
    The secondary host that is kept in sync with the source.
*/
#[async_trait]
pub trait DestinationHost: Send + Sync {
    /**
        Lists every release currently present on the destination repository.
    */
    async fn list_releases(&self) -> HostResult<Vec<DestinationRelease>>;

    /**
        Deletes the release with the given destination-side id.
    */
    async fn delete_release(&self, id: u64) -> HostResult<()>;

    /**
        Creates a new release, returning it with its destination-side id.
    */
    async fn create_release(&self, release: &NewRelease<'_>) -> HostResult<DestinationRelease>;

    /**
        Attaches a file to the release with the given destination-side id.
    */
    async fn attach_asset(&self, release_id: u64, upload: AssetUpload<'_>) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    async fn pages_fetched(sizes: &[usize]) -> (Vec<usize>, usize) {
        let mut requested = Vec::new();
        let items = collect_pages(|page| {
            requested.push(page);
            let size = sizes[page - 1];
            async move { Ok(vec![page; size]) }
        })
        .await
        .unwrap();
        (requested, items.len())
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let (requested, total) = pages_fetched(&[PER_PAGE, PER_PAGE, 37]).await;
        assert_eq!(requested, vec![1, 2, 3]);
        assert_eq!(total, 2 * PER_PAGE + 37);
    }

    #[tokio::test]
    async fn full_last_page_needs_one_more_request() {
        let (requested, total) = pages_fetched(&[PER_PAGE, 0]).await;
        assert_eq!(requested, vec![1, 2]);
        assert_eq!(total, PER_PAGE);
    }

    #[tokio::test]
    async fn single_short_page() {
        let (requested, total) = pages_fetched(&[3]).await;
        assert_eq!(requested, vec![1]);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn page_errors_are_returned() {
        let mut calls = 0;
        let result = collect_pages(|page| {
            calls += 1;
            async move {
                if page == 2 {
                    Err(HostError::UnexpectedStatus {
                        operation: "list releases",
                        status: StatusCode::BAD_GATEWAY,
                        body: String::new(),
                    })
                } else {
                    Ok(vec![(); PER_PAGE])
                }
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
