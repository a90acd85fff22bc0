//! In-memory hosts for exercising the mirror without a network.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

use crate::{
    hosts::{DestinationHost, HostError, HostResult, SourceHost},
    release::{Asset, AssetUpload, DestinationRelease, NewRelease, Release},
};

pub fn release(tag: &str, published_at: Option<DateTime<Utc>>) -> Release {
    Release {
        tag: tag.to_string(),
        display_name: None,
        body: None,
        is_prerelease: true,
        target_commit: "main".to_string(),
        published_at,
        assets: Vec::new(),
    }
}

pub fn asset(name: &str, content_type: &str) -> Asset {
    Asset {
        name: name.to_string(),
        content_type: content_type.to_string(),
        retrieval_locator: Url::parse(&format!("https://api.github.com/assets/{name}")).unwrap(),
    }
}

fn status_error(operation: &'static str, status: StatusCode) -> HostError {
    HostError::UnexpectedStatus {
        operation,
        status,
        body: String::new(),
    }
}

#[derive(Debug, Default)]
pub struct FakeSource {
    releases: Vec<Release>,
    contents: HashMap<String, Vec<u8>>,
    fail_list: bool,
}

impl FakeSource {
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases,
            ..Self::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    pub fn with_contents(mut self, name: &str, contents: &[u8]) -> Self {
        self.contents.insert(name.to_string(), contents.to_vec());
        self
    }
}

#[async_trait]
impl SourceHost for FakeSource {
    async fn list_releases(&self) -> HostResult<Vec<Release>> {
        if self.fail_list {
            return Err(status_error("list releases", StatusCode::UNAUTHORIZED));
        }
        Ok(self.releases.clone())
    }

    async fn download_asset(&self, asset: &Asset) -> HostResult<Vec<u8>> {
        self.contents
            .get(&asset.name)
            .cloned()
            .ok_or_else(|| status_error("download asset", StatusCode::NOT_FOUND))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Delete(u64),
    Create(String),
    Attach(u64, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub name: String,
    pub content_type: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRelease {
    pub id: u64,
    pub tag: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
    pub target_commit: String,
    pub assets: Vec<StoredAsset>,
}

#[derive(Debug, Default)]
struct State {
    releases: Vec<StoredRelease>,
    calls: Vec<Call>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct FakeDestination {
    state: Mutex<State>,
    fail_list: bool,
    fail_delete: bool,
    fail_create: HashSet<String>,
    fail_upload: HashSet<String>,
}

impl FakeDestination {
    /**
        Creates a destination that already holds empty releases for the given tags,
        with ids assigned sequentially starting at 1.
    */
    pub fn with_existing(tags: &[&str]) -> Self {
        let dest = Self::default();
        {
            let mut state = dest.state.lock().unwrap();
            for tag in tags {
                let id = state.next_id();
                state.releases.push(StoredRelease {
                    id,
                    tag: (*tag).to_string(),
                    name: "stale".to_string(),
                    body: "stale".to_string(),
                    prerelease: false,
                    target_commit: "old".to_string(),
                    assets: Vec::new(),
                });
            }
        }
        dest
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_create(mut self, tag: &str) -> Self {
        self.fail_create.insert(tag.to_string());
        self
    }

    pub fn failing_upload(mut self, name: &str) -> Self {
        self.fail_upload.insert(name.to_string());
        self
    }

    pub fn releases(&self) -> Vec<StoredRelease> {
        self.state.lock().unwrap().releases.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl DestinationHost for FakeDestination {
    async fn list_releases(&self) -> HostResult<Vec<DestinationRelease>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);
        if self.fail_list {
            return Err(status_error("list releases", StatusCode::BAD_GATEWAY));
        }
        Ok(state
            .releases
            .iter()
            .map(|r| DestinationRelease {
                id: r.id,
                tag: r.tag.clone(),
            })
            .collect())
    }

    async fn delete_release(&self, id: u64) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(id));
        if self.fail_delete {
            return Err(status_error("delete release", StatusCode::INTERNAL_SERVER_ERROR));
        }
        state.releases.retain(|r| r.id != id);
        Ok(())
    }

    async fn create_release(&self, release: &NewRelease<'_>) -> HostResult<DestinationRelease> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(release.tag.to_string()));
        if self.fail_create.contains(release.tag) {
            return Err(status_error("create release", StatusCode::UNPROCESSABLE_ENTITY));
        }
        let id = state.next_id();
        state.releases.push(StoredRelease {
            id,
            tag: release.tag.to_string(),
            name: release.name.to_string(),
            body: release.body.to_string(),
            prerelease: release.prerelease,
            target_commit: release.target_commit.to_string(),
            assets: Vec::new(),
        });
        Ok(DestinationRelease {
            id,
            tag: release.tag.to_string(),
        })
    }

    async fn attach_asset(&self, release_id: u64, upload: AssetUpload<'_>) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::Attach(release_id, upload.name.to_string()));
        if self.fail_upload.contains(upload.name) {
            return Err(status_error("attach asset", StatusCode::BAD_REQUEST));
        }
        let release = state
            .releases
            .iter_mut()
            .find(|r| r.id == release_id)
            .ok_or_else(|| status_error("attach asset", StatusCode::NOT_FOUND))?;
        release.assets.push(StoredAsset {
            name: upload.name.to_string(),
            content_type: upload.content_type.to_string(),
            contents: upload.contents,
        });
        Ok(())
    }
}
