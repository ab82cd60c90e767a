//! The currently playing ad.

use serde::{Deserialize, Serialize};

use crate::types::{AdHandle, AdProgress};

/// An ad from a stitched break, wrapping the source handle and its latest
/// progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    handle: AdHandle,
    progress: Option<AdProgress>,
}

impl Ad {
    pub fn new(handle: AdHandle) -> Self {
        Self {
            handle,
            progress: None,
        }
    }

    pub fn handle(&self) -> &AdHandle {
        &self.handle
    }

    pub fn id(&self) -> &str {
        &self.handle.ad_id
    }

    pub fn progress(&self) -> Option<&AdProgress> {
        self.progress.as_ref()
    }

    /// Replace the progress snapshot.
    pub fn set_progress(&mut self, progress: AdProgress) {
        self.progress = Some(progress);
    }

    pub fn duration(&self) -> Option<f64> {
        self.progress.map(|p| p.duration)
    }

    /// Seconds elapsed within the ad.
    pub fn time_offset(&self) -> Option<f64> {
        self.progress.map(|p| p.current_time)
    }

    pub fn remaining_time(&self) -> Option<f64> {
        self.progress
            .map(|p| (p.duration - p.current_time).max(0.0))
    }

    pub fn position_in_sequence(&self) -> Option<u32> {
        self.progress.map(|p| p.ad_position)
    }

    pub fn sequence_length(&self) -> Option<u32> {
        self.progress.map(|p| p.total_ads)
    }

    pub fn ad_break_duration(&self) -> Option<f64> {
        self.progress.map(|p| p.ad_break_duration)
    }

    /// Stitched ads are part of the content stream and cannot be skipped.
    pub fn is_skippable(&self) -> bool {
        false
    }
}
