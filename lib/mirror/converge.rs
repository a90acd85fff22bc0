use tracing::{error, info, warn};

use crate::{
    hosts::{DestinationHost, SourceHost},
    release::NewRelease,
};

use super::{
    plan::PlannedRelease,
    report::{ReleaseOutcome, ReleaseReport},
    transfer::transfer_asset,
};

/**
    Makes the destination release for one tag match its source release.

    Any existing destination release is deleted and a new one is created,
    then every asset is transferred in source order. Nothing here is fatal:
    all failures are logged and recorded in the returned report.
*/
pub async fn converge_release<S, D>(
    source: &S,
    destination: &D,
    planned: &PlannedRelease,
) -> ReleaseReport
where
    S: SourceHost + ?Sized,
    D: DestinationHost + ?Sized,
{
    let release = &planned.release;
    let tag = release.tag.as_str();

    let mut report = ReleaseReport {
        tag: tag.to_string(),
        replaced: planned.replaces,
        delete_failed: false,
        outcome: ReleaseOutcome::CreateFailed {
            reason: String::new(),
        },
        assets_uploaded: 0,
        assets_failed: Vec::new(),
    };

    // A failed delete may leave a conflicting tag behind, but
    // creating anyway is the only way the release can converge
    if let Some(existing_id) = planned.replaces {
        match destination.delete_release(existing_id).await {
            Ok(()) => info!(tag, id = existing_id, "Deleted existing destination release"),
            Err(e) => {
                warn!(
                    tag,
                    id = existing_id,
                    fatal = false,
                    "Could not delete existing destination release: {e}"
                );
                report.delete_failed = true;
            }
        }
    }

    let new_release = NewRelease::from(release);
    let created = match destination.create_release(&new_release).await {
        Ok(created) => {
            info!(tag, id = created.id, name = new_release.name, "Created destination release");
            created
        }
        Err(e) => {
            error!(tag, fatal = false, "Failed to create destination release: {e}");
            report.outcome = ReleaseOutcome::CreateFailed {
                reason: e.to_string(),
            };
            return report;
        }
    };
    report.outcome = ReleaseOutcome::Created { id: created.id };

    if !release.assets.is_empty() {
        info!(tag, count = release.assets.len(), "Uploading assets");
    }

    for asset in &release.assets {
        match transfer_asset(source, destination, created.id, asset).await {
            Ok(size) => {
                info!(tag, asset = %asset.name, size, "Uploaded asset");
                report.assets_uploaded += 1;
            }
            Err(e) => {
                error!(tag, asset = %asset.name, fatal = false, "{e}");
                report.assets_failed.push(asset.name.clone());
            }
        }
    }

    report
}
