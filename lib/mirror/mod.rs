use tracing::{debug, info, instrument};

use crate::{
    hosts::{DestinationHost, SourceHost},
    recency::RecencyFilter,
    result::{MirrorError, MirrorResult},
};

mod converge;
mod plan;
mod report;
mod transfer;

#[cfg(test)]
mod fakes;

pub use self::converge::converge_release;
pub use self::plan::{PlannedRelease, SyncPlan, destination_lookup};
pub use self::report::{MirrorReport, ReleaseOutcome, ReleaseReport};
pub use self::transfer::{TransferError, transfer_asset};

/**
    Mirrors releases from a source host to a destination host.

    The mirror is stateless between runs - everything is derived
    from the two live release lists every time it is run.
*/
#[derive(Debug)]
pub struct Mirror<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    destination: &'a D,
    filter: RecencyFilter,
}

impl<'a, S, D> Mirror<'a, S, D>
where
    S: SourceHost + ?Sized,
    D: DestinationHost + ?Sized,
{
    #[must_use]
    pub fn new(source: &'a S, destination: &'a D, filter: RecencyFilter) -> Self {
        Self {
            source,
            destination,
            filter,
        }
    }

    /**
        Fetches both release lists and computes which releases to converge.

        # Errors

        - If either release list could not be fetched.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn plan(&self) -> MirrorResult<SyncPlan> {
        info!("Fetching releases from source host");
        let source_releases = self
            .source
            .list_releases()
            .await
            .map_err(MirrorError::SourceReleases)?;
        info!(count = source_releases.len(), "Fetched source releases");

        info!("Fetching releases from destination host");
        let destination_releases = self
            .destination
            .list_releases()
            .await
            .map_err(MirrorError::DestinationReleases)?;
        info!(
            count = destination_releases.len(),
            "Found existing destination releases"
        );

        let plan = SyncPlan::new(source_releases, &destination_releases, &self.filter);
        debug!(
            qualifying = plan.len(),
            skipped = plan.skipped(),
            cutoff = ?self.filter.cutoff(),
            "computed sync plan"
        );
        Ok(plan)
    }

    /**
        Converges every release in the plan, one at a time, in plan order.

        Failures of individual releases or assets never stop the run.
    */
    pub async fn apply(&self, plan: &SyncPlan) -> MirrorReport {
        let mut report = MirrorReport {
            releases: Vec::with_capacity(plan.len()),
            skipped: plan.skipped(),
        };

        if plan.is_empty() {
            info!("No releases to sync");
            return report;
        }

        for planned in plan.iter() {
            info!(
                tag = %planned.release.tag,
                name = planned.release.display_name(),
                replaces = ?planned.replaces,
                "Processing release"
            );
            let release_report = converge_release(self.source, self.destination, planned).await;
            report.releases.push(release_report);
        }

        report
    }

    /**
        Plans and applies a complete mirror run.

        # Errors

        - If either release list could not be fetched.
    */
    pub async fn run(&self) -> MirrorResult<MirrorReport> {
        let plan = self.plan().await?;
        let report = self.apply(&plan).await;
        info!("Release synchronization complete: {report}");
        Ok(report)
    }
}
