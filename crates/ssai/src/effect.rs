//! Side effects requested by the reducer.

use std::collections::BTreeMap;

use crate::notification::AdNotification;
use crate::types::{AdTagParameters, LoadSource, StreamRequest, Timestamp};

/// A condition that ends ad playback for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum FatalCondition {
    /// The stream failed to resolve and there is nothing to fall back to.
    NoBackupStream { message: Option<String> },
}

/// An action for the executor to carry out against the collaborators.
///
/// Effects are executed in the order they are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Forward a stream request to the ad-stream source.
    RequestStream(StreamRequest),
    ReplaceAdTagParameters(AdTagParameters),
    /// Reset the ad-stream source and stop its polling.
    ResetSource,
    /// Load a URL on the playback surface, optionally starting at an offset.
    Load {
        url: String,
        start_time: Option<Timestamp>,
        source: LoadSource,
    },
    /// Move the playback position.
    Seek(Timestamp),
    Pause,
    /// Toggle the visual ad-active indicator.
    SetAdActive(bool),
    Notify(AdNotification),
    /// Forward manifest timeline metadata to the ad-stream source.
    ProcessMetadata {
        scheme_id_uri: String,
        data: Option<String>,
        timestamp: Timestamp,
    },
    /// Forward in-band timed metadata to the ad-stream source.
    TimedMetadata(BTreeMap<String, String>),
    Fatal(FatalCondition),
}
