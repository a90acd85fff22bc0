use chrono::{DateTime, TimeDelta, Utc};

use crate::release::Release;

/**
    Default trailing window used when only recent releases are mirrored.
*/
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/**
    Which source releases should be mirrored during a run.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Mirror every published release.
    Full,
    /// Mirror only releases published within the given trailing window.
    Recent { window: TimeDelta },
}

impl SyncMode {
    #[must_use]
    pub fn recent_hours(hours: u32) -> Self {
        Self::Recent {
            window: TimeDelta::hours(i64::from(hours)),
        }
    }
}

impl Default for SyncMode {
    fn default() -> Self {
        Self::recent_hours(DEFAULT_WINDOW_HOURS)
    }
}

/**
    Decides whether a release qualifies for mirroring.

    The cutoff is computed once, from a single "now", so that every
    release in a run is judged against the same point in time.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyFilter {
    cutoff: Option<DateTime<Utc>>,
}

impl RecencyFilter {
    /**
        Creates a filter for the given mode, relative to `now`.
    */
    #[must_use]
    pub fn new(mode: SyncMode, now: DateTime<Utc>) -> Self {
        let cutoff = match mode {
            SyncMode::Full => None,
            SyncMode::Recent { window } => Some(now - window),
        };
        Self { cutoff }
    }

    /**
        Creates a filter that lets every published release through.
    */
    #[must_use]
    pub fn full() -> Self {
        Self { cutoff: None }
    }

    /**
        The earliest publish time that still qualifies, if any.
    */
    #[must_use]
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /**
        Checks if the given release should be mirrored.

        Drafts never qualify. With a window, releases published strictly
        before the cutoff are excluded, the cutoff itself is included.
    */
    #[must_use]
    pub fn includes(&self, release: &Release) -> bool {
        let Some(published_at) = release.published_at else {
            return false;
        };
        match self.cutoff {
            None => true,
            Some(cutoff) => published_at >= cutoff,
        }
    }
}
