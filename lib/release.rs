use std::borrow::Cow;

use chrono::{DateTime, Utc};
use url::Url;

/**
    A release as published on the source host.

    This is a provider-agnostic, read-only view of a release, materialized
    once per run from an API response and never mutated afterwards.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub display_name: Option<String>,
    pub body: Option<String>,
    pub is_prerelease: bool,
    pub target_commit: String,
    pub published_at: Option<DateTime<Utc>>,
    pub assets: Vec<Asset>,
}

impl Release {
    /**
        Returns the human-readable title of the release,
        falling back to the tag if no name was given.
    */
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.tag)
    }

    /**
        Returns the release body, falling back to a short
        generated description if the body is missing or empty.
    */
    #[must_use]
    pub fn body(&self) -> Cow<'_, str> {
        match self.body.as_deref() {
            Some(body) if !body.is_empty() => Cow::Borrowed(body),
            _ => Cow::Owned(format!("Release for {}", self.tag)),
        }
    }

    /**
        Drafts have not been published yet and are never mirrored.
    */
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.published_at.is_none()
    }
}

/**
    A single binary file attached to a source release.

    The contents are not part of this type - they are fetched
    through the `retrieval_locator` only while being transferred.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub content_type: String,
    pub retrieval_locator: Url,
}

/**
    A release that already exists on the destination host.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRelease {
    pub id: u64,
    pub tag: String,
}

/**
    Metadata for a release to be created on the destination host,
    with the name and body defaults already applied.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease<'a> {
    pub tag: &'a str,
    pub name: &'a str,
    pub body: Cow<'a, str>,
    pub prerelease: bool,
    pub target_commit: &'a str,
}

impl<'a> From<&'a Release> for NewRelease<'a> {
    fn from(release: &'a Release) -> Self {
        Self {
            tag: &release.tag,
            name: release.display_name(),
            body: release.body(),
            prerelease: release.is_prerelease,
            target_commit: &release.target_commit,
        }
    }
}

/**
    The contents of an asset, held in memory for the duration of one upload.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload<'a> {
    pub name: &'a str,
    pub content_type: &'a str,
    pub contents: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_release(name: Option<&str>, body: Option<&str>) -> Release {
        Release {
            tag: "v1.2.0".to_string(),
            display_name: name.map(ToString::to_string),
            body: body.map(ToString::to_string),
            is_prerelease: true,
            target_commit: "main".to_string(),
            published_at: None,
            assets: Vec::new(),
        }
    }

    #[test]
    fn display_name_defaults_to_tag() {
        assert_eq!(new_release(None, None).display_name(), "v1.2.0");
        assert_eq!(
            new_release(Some("Big Update"), None).display_name(),
            "Big Update"
        );
    }

    #[test]
    fn body_defaults_when_missing_or_empty() {
        assert_eq!(new_release(None, None).body(), "Release for v1.2.0");
        assert_eq!(new_release(None, Some("")).body(), "Release for v1.2.0");
        assert_eq!(new_release(None, Some("Fixes")).body(), "Fixes");
    }

    #[test]
    fn new_release_carries_defaults() {
        let release = new_release(None, None);
        let new = NewRelease::from(&release);
        assert_eq!(new.tag, "v1.2.0");
        assert_eq!(new.name, "v1.2.0");
        assert_eq!(new.body, "Release for v1.2.0");
        assert!(new.prerelease);
        assert_eq!(new.target_commit, "main");
    }

    #[test]
    fn unpublished_is_draft() {
        let mut release = new_release(None, None);
        assert!(release.is_draft());
        release.published_at = Some(Utc::now());
        assert!(!release.is_draft());
    }
}
