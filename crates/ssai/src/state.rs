//! Per-session manager state and the read-only view of the collaborators.

use crate::ad::Ad;
use crate::stats::AdStatistics;
use crate::types::{AdProgress, CuePoint, Timestamp};

/// State owned by the ad manager for one stream request.
///
/// `snap_forward_target` is only set between a snapback seek and the
/// `AdBreakEnded` that consumes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerState {
    /// The ad currently playing, if inside a break.
    pub active_ad: Option<Ad>,
    /// Progress received before any ad was active.
    pub pending_progress: Option<AdProgress>,
    /// Seek target to restore once the snapped-to break ends.
    pub snap_forward_target: Option<Timestamp>,
    /// Fallback source; empty means none.
    pub backup_source_url: String,
    /// Offset to start the resolved stream at.
    pub requested_start_time: Option<Timestamp>,
    /// Set once the primary stream has loaded for a non-live session.
    pub seek_observation: bool,
    /// Whether the ad-active indicator is shown.
    pub ad_active: bool,
    /// Counters kept across sessions.
    pub stats: AdStatistics,
}

impl ManagerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every per-session field to its initial value. Statistics survive.
    pub fn reset_session(&mut self) {
        let stats = self.stats;
        *self = Self {
            stats,
            ..Self::default()
        };
    }

    pub fn has_backup(&self) -> bool {
        !self.backup_source_url.is_empty()
    }

    pub fn is_snapped(&self) -> bool {
        self.snap_forward_target.is_some()
    }
}

/// Read-only queries against the ad-stream source and the playback surface.
pub trait Environment {
    /// Current position of the playback surface.
    fn current_time(&self) -> Timestamp;

    /// The cue point whose start lies strictly before `stream_time`, if any.
    fn previous_cue_point_for_stream_time(&self, stream_time: Timestamp) -> Option<CuePoint>;
}
