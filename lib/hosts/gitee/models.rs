use serde::{Deserialize, Serialize};

use crate::release::{DestinationRelease, NewRelease};

#[derive(Debug, Clone, Deserialize)]
pub struct GiteeRelease {
    pub id: u64,
    pub tag_name: String,
}

impl From<GiteeRelease> for DestinationRelease {
    fn from(release: GiteeRelease) -> Self {
        Self {
            id: release.id,
            tag: release.tag_name,
        }
    }
}

/**
    Request body for creating a release.

    Gitee takes the access token as part of the JSON body for this endpoint.
*/
#[derive(Debug, Clone, Serialize)]
pub struct GiteeCreateRelease<'a> {
    pub access_token: &'a str,
    pub tag_name: &'a str,
    pub name: &'a str,
    pub body: &'a str,
    pub prerelease: bool,
    pub target_commitish: &'a str,
}

impl<'a> GiteeCreateRelease<'a> {
    pub fn new(access_token: &'a str, release: &'a NewRelease<'a>) -> Self {
        Self {
            access_token,
            tag_name: release.tag,
            name: release.name,
            body: &release.body,
            prerelease: release.prerelease,
            target_commitish: release.target_commit,
        }
    }
}
