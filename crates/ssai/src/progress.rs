//! Ad progress reconciliation.
//!
//! The ad handle and its progress arrive on independent channels (`Started`
//! and `Progress`) in no guaranteed order. The latest progress snapshot is
//! always buffered in [`ManagerState::pending_progress`], so whichever event
//! comes second can complete the picture:
//!
//! - `Progress` then `Started`: the buffered snapshot is merged into the new ad.
//! - `Started` then `Progress`: the snapshot is merged into the active ad directly.

use tracing::{debug, info};

use crate::ad::Ad;
use crate::effect::Effect;
use crate::notification::AdNotification;
use crate::state::ManagerState;
use crate::types::{AdHandle, AdProgress};

pub(crate) fn on_started(state: &mut ManagerState, handle: AdHandle) -> Vec<Effect> {
    let mut ad = Ad::new(handle);
    if let Some(progress) = state.pending_progress.take() {
        debug!(ad_id = ad.id(), "Merging progress received before ad start");
        ad.set_progress(progress);
    }

    info!(ad_id = ad.id(), "Ad event: Started");
    state.stats.record_started();
    state.ad_active = true;
    state.active_ad = Some(ad.clone());

    vec![
        Effect::Notify(AdNotification::AdStarted { ad }),
        Effect::SetAdActive(true),
        Effect::Pause,
    ]
}

pub(crate) fn on_progress(state: &mut ManagerState, progress: AdProgress) -> Vec<Effect> {
    state.pending_progress = Some(progress);
    if let Some(ad) = state.active_ad.as_mut() {
        ad.set_progress(progress);
    }
    Vec::new()
}

pub(crate) fn on_first_quartile() -> Vec<Effect> {
    info!("Ad event: First Quartile");
    vec![Effect::Notify(AdNotification::AdFirstQuartile)]
}

pub(crate) fn on_midpoint() -> Vec<Effect> {
    info!("Ad event: Midpoint");
    vec![Effect::Notify(AdNotification::AdMidpoint)]
}

pub(crate) fn on_third_quartile() -> Vec<Effect> {
    info!("Ad event: Third Quartile");
    vec![Effect::Notify(AdNotification::AdThirdQuartile)]
}

pub(crate) fn on_complete(state: &mut ManagerState) -> Vec<Effect> {
    info!("Ad event: Complete");
    state.stats.record_completed();
    state.ad_active = false;
    state.active_ad = None;
    vec![
        Effect::Notify(AdNotification::AdComplete),
        Effect::SetAdActive(false),
    ]
}

/// The ad stays active until a later `Complete` or `AdBreakEnded`.
pub(crate) fn on_skipped(state: &mut ManagerState) -> Vec<Effect> {
    info!("Ad event: Skipped");
    state.stats.record_skipped();
    vec![Effect::Notify(AdNotification::AdSkipped)]
}
