//! Ad playback statistics.

use serde::{Deserialize, Serialize};

/// Counters accumulated across all sessions of one manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdStatistics {
    /// Ads that reported `Started`
    pub started: u64,
    /// Ads that reported `Complete`
    pub completed: u64,
    /// Ads that reported `Skipped`
    pub skipped: u64,
    /// Seeks redirected back to an unplayed break
    pub snapbacks: u64,
    /// Original seek targets restored after a break
    pub snap_forwards: u64,
    /// Loads of the backup URL after a stream error
    pub backup_loads: u64,
    /// Stream errors with no backup to fall back to
    pub unrecovered_errors: u64,
}

impl AdStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&mut self) {
        self.started += 1;
    }

    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_snapback(&mut self) {
        self.snapbacks += 1;
    }

    pub fn record_snap_forward(&mut self) {
        self.snap_forwards += 1;
    }

    pub fn record_backup_load(&mut self) {
        self.backup_loads += 1;
    }

    pub fn record_unrecovered_error(&mut self) {
        self.unrecovered_errors += 1;
    }

    /// Ads started but not yet completed or skipped.
    pub fn in_flight(&self) -> u64 {
        self.started
            .saturating_sub(self.completed)
            .saturating_sub(self.skipped)
    }
}
