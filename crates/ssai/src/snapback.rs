//! Snapback: keeping seeks from skipping unplayed ad breaks.
//!
//! ```text
//!   Idle --(seek past unplayed break)--> Snapped --(AdBreakEnded)--> Idle
//! ```
//!
//! On a qualifying seek the requested position is remembered and playback is
//! moved back to the start of the skipped break. The source then plays the
//! break, and once it ends the remembered position is restored. Only one
//! target is pending at a time: a second qualifying seek while snapped
//! replaces it.

use tracing::{debug, info};

use crate::effect::Effect;
use crate::state::{Environment, ManagerState};
use crate::types::Timestamp;

/// Whether a snap is pending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapState {
    Idle,
    Snapped { target: Timestamp },
}

impl SnapState {
    pub fn of(state: &ManagerState) -> Self {
        match state.snap_forward_target {
            Some(target) => Self::Snapped { target },
            None => Self::Idle,
        }
    }
}

/// React to a position change on the playback surface.
pub(crate) fn on_seeked(
    state: &mut ManagerState,
    position: Timestamp,
    env: &impl Environment,
) -> Vec<Effect> {
    // Seeking to the very beginning is a restart, not a skip.
    if position == 0.0 {
        return Vec::new();
    }

    let Some(cue) = env.previous_cue_point_for_stream_time(position) else {
        return Vec::new();
    };

    // A cue point is marked played as soon as the playhead enters it, so the
    // seek that restores the original target never snaps again.
    if cue.played {
        debug!(position, cue_start = cue.start, "Preceding ad break already played");
        return Vec::new();
    }

    if let Some(previous) = state.snap_forward_target {
        debug!(previous, position, "Replacing pending snap target");
    }
    info!(
        "Seeking back to the start of the ad break at {} and will return to {}",
        cue.start, position
    );
    state.snap_forward_target = Some(position);
    state.stats.record_snapback();
    vec![Effect::Seek(cue.start)]
}

/// Consume the pending target once the break has played through.
///
/// The target is cleared whether or not a seek is issued; a target at or
/// behind the current position has already been reached.
pub(crate) fn restore_after_break(
    state: &mut ManagerState,
    env: &impl Environment,
) -> Vec<Effect> {
    let Some(target) = state.snap_forward_target.take() else {
        return Vec::new();
    };

    let current_time = env.current_time();
    if target > current_time {
        info!(target, current_time, "Returning to seek target after ad break");
        state.stats.record_snap_forward();
        vec![Effect::Seek(target)]
    } else {
        debug!(target, current_time, "Seek target already passed, dropping it");
        Vec::new()
    }
}
