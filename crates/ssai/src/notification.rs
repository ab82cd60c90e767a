//! Outward notifications.
//!
//! The closed set of events the surrounding application observes. Publishing is
//! fire-and-forget: nothing is awaited and missed notifications are not replayed.
//!
//! The ad carried by `AdStarted` is a snapshot. Its progress keeps changing
//! after the start, so the currently playing ad is also published on a watch
//! channel that always holds the latest merged state.

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::trace;

use crate::ad::Ad;
use crate::types::CuePoint;

/// Notifications published to the application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AdNotification {
    AdStarted { ad: Ad },
    AdFirstQuartile,
    AdMidpoint,
    AdThirdQuartile,
    AdComplete,
    AdSkipped,
    /// The complete, ordered cue point list.
    CuePointsChanged { cue_points: Vec<CuePoint> },
    /// Stream load failed with no backup; ads and content cannot start.
    StreamUnavailable { message: Option<String> },
}

impl AdNotification {
    /// Canonical snake_case event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AdStarted { .. } => "ad_started",
            Self::AdFirstQuartile => "ad_first_quartile",
            Self::AdMidpoint => "ad_midpoint",
            Self::AdThirdQuartile => "ad_third_quartile",
            Self::AdComplete => "ad_complete",
            Self::AdSkipped => "ad_skipped",
            Self::CuePointsChanged { .. } => "cue_points_changed",
            Self::StreamUnavailable { .. } => "stream_unavailable",
        }
    }
}

/// Broadcast publisher for [`AdNotification`]s, plus the live view of the
/// currently playing ad.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<AdNotification>,
    active_ad: watch::Sender<Option<Ad>>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        let (active_ad, _) = watch::channel(None);
        Self { tx, active_ad }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdNotification> {
        self.tx.subscribe()
    }

    /// Publish without waiting; a send with no subscribers is not an error.
    pub fn publish(&self, notification: AdNotification) {
        let event_type = notification.event_type();
        let receivers = self.tx.send(notification).unwrap_or(0);
        trace!(event_type, receivers, "Published ad notification");
    }

    /// Watch the currently playing ad, `None` between ads.
    pub fn watch_active_ad(&self) -> watch::Receiver<Option<Ad>> {
        self.active_ad.subscribe()
    }

    /// Store `ad` as the current ad. Watchers are only woken when it changed.
    pub fn publish_active_ad(&self, ad: Option<&Ad>) {
        self.active_ad.send_if_modified(|current| {
            if current.as_ref() == ad {
                return false;
            }
            *current = ad.cloned();
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = Notifier::new(8);
        notifier.publish(AdNotification::AdMidpoint);

        let mut rx = notifier.subscribe();
        notifier.publish(AdNotification::AdComplete);
        assert_eq!(rx.try_recv().unwrap(), AdNotification::AdComplete);
    }

    #[test]
    fn test_active_ad_only_wakes_on_change() {
        let notifier = Notifier::new(8);
        let mut rx = notifier.watch_active_ad();
        let ad = Ad::new(crate::types::AdHandle::new("ad-1"));

        notifier.publish_active_ad(Some(&ad));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&ad));

        notifier.publish_active_ad(Some(&ad));
        assert!(!rx.has_changed().unwrap());

        notifier.publish_active_ad(None);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.publish(AdNotification::AdFirstQuartile);
        notifier.publish(AdNotification::AdMidpoint);
        notifier.publish(AdNotification::AdThirdQuartile);

        assert_eq!(rx.recv().await.unwrap(), AdNotification::AdFirstQuartile);
        assert_eq!(rx.recv().await.unwrap(), AdNotification::AdMidpoint);
        assert_eq!(rx.recv().await.unwrap(), AdNotification::AdThirdQuartile);
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(AdNotification::CuePointsChanged {
            cue_points: vec![CuePoint::new(0.0, 10.0, false)],
        })
        .unwrap();
        assert_eq!(json["event"], "cue_points_changed");
        assert_eq!(json["cue_points"][0]["end"], 10.0);
    }
}
