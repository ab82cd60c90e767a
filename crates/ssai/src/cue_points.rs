//! Cue point tracking.
//!
//! The source reports the complete cue point list on every change; it is
//! republished as a whole, never patched.

use tracing::info;

use crate::effect::Effect;
use crate::notification::AdNotification;
use crate::types::{CuePoint, RawCuePoint, Timestamp};

/// Map raw source records to cue points, preserving order.
pub fn to_cue_points(raw: &[RawCuePoint]) -> Vec<CuePoint> {
    raw.iter().map(CuePoint::from).collect()
}

pub(crate) fn on_cue_points_changed(raw: &[RawCuePoint]) -> Vec<Effect> {
    info!(count = raw.len(), "Ad event: Cue points changed");
    vec![Effect::Notify(AdNotification::CuePointsChanged {
        cue_points: to_cue_points(raw),
    })]
}

/// The cue point with the latest start strictly before `stream_time`.
///
/// A position exactly on a break start does not count that break as preceding,
/// so the seek issued by a snapback never re-triggers the same break.
pub fn previous_cue_point(cue_points: &[CuePoint], stream_time: Timestamp) -> Option<CuePoint> {
    cue_points
        .iter()
        .filter(|cue| cue.start < stream_time)
        .max_by(|a, b| a.start.total_cmp(&b.start))
        .copied()
}
