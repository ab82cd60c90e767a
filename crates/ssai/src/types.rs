//! Value types shared between the ad manager and its collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Position on the stream timeline, in seconds.
pub type Timestamp = f64;

/// Key/value parameters appended to the ad tag by the ad-stream source.
pub type AdTagParameters = BTreeMap<String, String>;

/// Manifest format requested from the ad-stream source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    #[default]
    Hls,
    Dash,
}

impl StreamFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hls => "hls",
            Self::Dash => "dash",
        }
    }
}

/// A stream request forwarded verbatim to the ad-stream source.
///
/// Live requests identify the stream by `asset_key`; video-on-demand requests
/// by `content_source_id` plus `video_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamRequest {
    pub asset_key: Option<String>,
    pub content_source_id: Option<String>,
    pub video_id: Option<String>,
    pub api_key: Option<String>,
    pub format: StreamFormat,
    pub ad_tag_parameters: AdTagParameters,
}

impl StreamRequest {
    /// Create a live stream request.
    pub fn live(asset_key: impl Into<String>) -> Self {
        Self {
            asset_key: Some(asset_key.into()),
            ..Default::default()
        }
    }

    /// Create a video-on-demand stream request.
    pub fn vod(content_source_id: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            content_source_id: Some(content_source_id.into()),
            video_id: Some(video_id.into()),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: StreamFormat) -> Self {
        self.format = format;
        self
    }

    /// Short label for logging.
    pub fn describe(&self) -> String {
        match (&self.asset_key, &self.content_source_id, &self.video_id) {
            (Some(key), _, _) => format!("live:{key}"),
            (None, Some(cms), Some(vid)) => format!("vod:{cms}/{vid}"),
            _ => "unidentified".to_string(),
        }
    }
}

/// Cue point record as reported by the ad-stream source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCuePoint {
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default)]
    pub played: bool,
}

/// Boundaries of an ad break on the stream timeline.
///
/// `played` is authoritative from the source and never tracked locally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuePoint {
    pub start: Timestamp,
    pub end: Timestamp,
    pub played: bool,
}

impl CuePoint {
    pub fn new(start: Timestamp, end: Timestamp, played: bool) -> Self {
        Self { start, end, played }
    }

    pub fn duration(&self) -> Timestamp {
        (self.end - self.start).max(0.0)
    }

    /// Whether `time` falls inside `[start, end)`.
    pub fn contains(&self, time: Timestamp) -> bool {
        time >= self.start && time < self.end
    }
}

impl From<&RawCuePoint> for CuePoint {
    fn from(raw: &RawCuePoint) -> Self {
        Self::new(raw.start, raw.end, raw.played)
    }
}

/// Opaque ad handle from the ad-stream source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdHandle {
    pub ad_id: String,
    pub creative_id: Option<String>,
    pub title: Option<String>,
    pub ad_system: Option<String>,
}

impl AdHandle {
    pub fn new(ad_id: impl Into<String>) -> Self {
        Self {
            ad_id: ad_id.into(),
            ..Default::default()
        }
    }
}

/// Playback position within the current ad.
///
/// Replaced wholesale on every progress notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdProgress {
    /// Seconds into the current ad.
    pub current_time: f64,
    /// Duration of the current ad in seconds.
    pub duration: f64,
    /// 1-based index of the ad within its break.
    pub ad_position: u32,
    /// Number of ads in the break.
    pub total_ads: u32,
    /// Duration of the whole break in seconds.
    pub ad_break_duration: f64,
}

/// Which source a load request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    /// Stream URL resolved by the ad-stream source.
    Stream,
    /// Fallback URL supplied with the stream request.
    Backup,
}

/// Manifest timeline region already extracted by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRegion {
    pub scheme_id_uri: String,
    #[serde(default)]
    pub message_data: Option<String>,
    pub start_time: Timestamp,
}
