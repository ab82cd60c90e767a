//! Inputs to the ad manager.
//!
//! Everything that can change [`ManagerState`](crate::ManagerState) arrives as a
//! [`SessionInput`]: lifecycle notifications from the ad-stream source,
//! position and load feedback from the playback surface, and commands from the
//! application.

use serde::{Deserialize, Serialize};

use crate::types::{
    AdHandle, AdProgress, AdTagParameters, LoadSource, RawCuePoint, StreamRequest,
    TimelineRegion, Timestamp,
};

/// Lifecycle notifications emitted by the ad-stream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The stream was resolved and can be loaded.
    Loaded { url: String },
    /// The stream could not be resolved.
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    AdBreakStarted,
    AdBreakEnded,
    /// An individual ad started playing.
    Started { ad: AdHandle },
    /// Progress within the current ad. May arrive before the matching `Started`.
    Progress { progress: AdProgress },
    FirstQuartile,
    Midpoint,
    ThirdQuartile,
    Complete,
    Skipped,
    /// The full cue point list changed.
    CuePointsChanged { cue_points: Vec<RawCuePoint> },
}

impl StreamEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::Error { .. } => "error",
            Self::AdBreakStarted => "ad_break_started",
            Self::AdBreakEnded => "ad_break_ended",
            Self::Started { .. } => "started",
            Self::Progress { .. } => "progress",
            Self::FirstQuartile => "first_quartile",
            Self::Midpoint => "midpoint",
            Self::ThirdQuartile => "third_quartile",
            Self::Complete => "complete",
            Self::Skipped => "skipped",
            Self::CuePointsChanged { .. } => "cue_points_changed",
        }
    }
}

/// Feedback from the playback surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The position changed, either by the user or programmatically.
    Seeked { position: Timestamp },
    /// A load issued through [`Effect::Load`](crate::Effect::Load) finished.
    LoadCompleted { source: LoadSource, is_live: bool },
}

/// Commands issued by the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestStream {
        request: StreamRequest,
        /// Fallback source; `None` means no fallback.
        backup_url: Option<String>,
        /// Start offset for the resolved stream; `None` means the default position.
        start_time: Option<Timestamp>,
    },
    ReplaceAdTagParameters(AdTagParameters),
    Stop,
    ForwardTimelineRegion(TimelineRegion),
    ForwardTimedMetadata { key: String, data: String },
}

/// Any input the ad manager reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Command(Command),
    Stream(StreamEvent),
    Playback(PlaybackEvent),
}

impl From<Command> for SessionInput {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<StreamEvent> for SessionInput {
    fn from(event: StreamEvent) -> Self {
        Self::Stream(event)
    }
}

impl From<PlaybackEvent> for SessionInput {
    fn from(event: PlaybackEvent) -> Self {
        Self::Playback(event)
    }
}
