use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::release::{Asset, Release};

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub prerelease: bool,
    pub target_commitish: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubAsset {
    pub id: u64,
    pub url: Url,
    pub name: String,
    pub content_type: String,
}

impl From<GithubRelease> for Release {
    fn from(release: GithubRelease) -> Self {
        // Drafts normally have no publish time, but never trust that alone
        let published_at = if release.draft {
            None
        } else {
            release.published_at
        };
        Self {
            tag: release.tag_name,
            display_name: release.name,
            body: release.body,
            is_prerelease: release.prerelease,
            target_commit: release.target_commitish,
            published_at,
            assets: release.assets.into_iter().map(Asset::from).collect(),
        }
    }
}

impl From<GithubAsset> for Asset {
    fn from(asset: GithubAsset) -> Self {
        Self {
            name: asset.name,
            content_type: asset.content_type,
            retrieval_locator: asset.url,
        }
    }
}
