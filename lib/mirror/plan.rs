use std::{collections::HashMap, fmt};

use crate::{
    recency::RecencyFilter,
    release::{DestinationRelease, Release},
};

/**
    A source release that will be converged, along with the
    id of the destination release it replaces, if one exists.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelease {
    pub release: Release,
    pub replaces: Option<u64>,
}

impl fmt::Display for PlannedRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = &self.release.tag;
        let assets = self.release.assets.len();
        match self.replaces {
            Some(id) => write!(f, "replace release '{tag}' (id {id}) with {assets} asset(s)"),
            None => write!(f, "create release '{tag}' with {assets} asset(s)"),
        }
    }
}

/**
    The ordered set of releases to converge during a run.

    Releases are ordered oldest first, so that if a run is interrupted,
    the most recently published releases are the least likely to be missing.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    releases: Vec<PlannedRelease>,
    skipped: usize,
}

impl SyncPlan {
    /**
        Diffs the source releases against the releases already on the destination.
    */
    #[must_use]
    pub fn new(
        source: Vec<Release>,
        destination: &[DestinationRelease],
        filter: &RecencyFilter,
    ) -> Self {
        let lookup = destination_lookup(destination);
        let total = source.len();

        // Hosts list newest first - reversing before the stable
        // sort keeps that order meaningful for equal timestamps
        let mut qualifying = source
            .into_iter()
            .rev()
            .filter(|release| filter.includes(release))
            .collect::<Vec<_>>();
        qualifying.sort_by_key(|release| release.published_at);

        let releases = qualifying
            .into_iter()
            .map(|release| PlannedRelease {
                replaces: lookup.get(release.tag.as_str()).copied(),
                release,
            })
            .collect::<Vec<_>>();

        Self {
            skipped: total - releases.len(),
            releases,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /**
        Number of source releases that did not qualify for this run.
    */
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedRelease> {
        self.releases.iter()
    }
}

/**
    Builds the mapping from tag to destination release id.
*/
#[must_use]
pub fn destination_lookup(releases: &[DestinationRelease]) -> HashMap<&str, u64> {
    releases
        .iter()
        .map(|release| (release.tag.as_str(), release.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::recency::SyncMode;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn release(tag: &str, hours_ago: Option<i64>) -> Release {
        Release {
            tag: tag.to_string(),
            display_name: None,
            body: None,
            is_prerelease: false,
            target_commit: "main".to_string(),
            published_at: hours_ago.map(|h| now() - TimeDelta::hours(h)),
            assets: Vec::new(),
        }
    }

    fn tags(plan: &SyncPlan) -> Vec<&str> {
        plan.iter().map(|p| p.release.tag.as_str()).collect()
    }

    #[test]
    fn orders_oldest_first() {
        let source = vec![
            release("b", Some(20)),
            release("c", Some(2)),
            release("a", Some(40)),
        ];
        let plan = SyncPlan::new(source, &[], &RecencyFilter::full());
        assert_eq!(tags(&plan), vec!["a", "b", "c"]);
        assert_eq!(plan.skipped(), 0);
    }

    #[test]
    fn equal_timestamps_keep_reversed_source_order() {
        let source = vec![release("newer", Some(5)), release("older", Some(5))];
        let plan = SyncPlan::new(source, &[], &RecencyFilter::full());
        assert_eq!(tags(&plan), vec!["older", "newer"]);
    }

    #[test]
    fn filters_and_counts_skipped() {
        let source = vec![
            release("recent", Some(23)),
            release("old", Some(25)),
            release("draft", None),
        ];
        let filter = RecencyFilter::new(SyncMode::default(), now());
        let plan = SyncPlan::new(source, &[], &filter);
        assert_eq!(tags(&plan), vec!["recent"]);
        assert_eq!(plan.skipped(), 2);
    }

    #[test]
    fn pairs_existing_destination_ids() {
        let source = vec![release("v2", Some(1)), release("v1", Some(2))];
        let destination = vec![
            DestinationRelease {
                id: 11,
                tag: "v1".to_string(),
            },
            DestinationRelease {
                id: 99,
                tag: "unrelated".to_string(),
            },
        ];
        let plan = SyncPlan::new(source, &destination, &RecencyFilter::full());
        let replaces = plan.iter().map(|p| p.replaces).collect::<Vec<_>>();
        assert_eq!(replaces, vec![Some(11), None]);

        let described = plan.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            described,
            vec![
                "replace release 'v1' (id 11) with 0 asset(s)",
                "create release 'v2' with 0 asset(s)",
            ]
        );
    }

    #[test]
    fn empty_when_nothing_qualifies() {
        let source = vec![release("a", Some(30)), release("b", Some(48))];
        let filter = RecencyFilter::new(SyncMode::default(), now());
        let plan = SyncPlan::new(source, &[], &filter);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }
}
