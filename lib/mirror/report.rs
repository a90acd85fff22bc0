use std::fmt;

/**
    What happened to a single release during a run.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The release was created on the destination. Individual assets may still have failed.
    Created { id: u64 },
    /// The release could not be created, and its assets were not transferred.
    CreateFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub tag: String,
    /// Id of the destination release that existed before this run, if any.
    pub replaced: Option<u64>,
    /// Set if the previous destination release could not be deleted.
    pub delete_failed: bool,
    pub outcome: ReleaseOutcome,
    pub assets_uploaded: usize,
    pub assets_failed: Vec<String>,
}

impl ReleaseReport {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self.outcome, ReleaseOutcome::Created { .. })
    }
}

/**
    Summary of a complete mirror run.

    Only recovered failures are recorded here, fatal ones abort
    the run and are returned as errors instead of a report.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub releases: Vec<ReleaseReport>,
    pub skipped: usize,
}

impl MirrorReport {
    #[must_use]
    pub fn created(&self) -> usize {
        self.releases.iter().filter(|r| r.is_created()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.releases.len() - self.created()
    }

    #[must_use]
    pub fn assets_uploaded(&self) -> usize {
        self.releases.iter().map(|r| r.assets_uploaded).sum()
    }

    #[must_use]
    pub fn assets_failed(&self) -> usize {
        self.releases.iter().map(|r| r.assets_failed.len()).sum()
    }

    /**
        Returns `true` if no release or asset failed during the run.
    */
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
            && self.assets_failed() == 0
            && self.releases.iter().all(|r| !r.delete_failed)
    }
}

impl fmt::Display for MirrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} release(s) synced, {} failed, {} skipped; {} asset(s) uploaded, {} failed",
            self.created(),
            self.failed(),
            self.skipped,
            self.assets_uploaded(),
            self.assets_failed(),
        )
    }
}
