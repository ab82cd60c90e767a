//! Session scripts.
//!
//! A script is a TOML document describing the initial stream request, the cue
//! points the simulated source starts with, and an ordered list of steps:
//!
//! ```toml
//! backup_url = "https://cdn.example.com/backup.m3u8"
//!
//! [request]
//! content_source_id = "2528370"
//! video_id = "tears-of-steel"
//!
//! [[cue_points]]
//! start = 30.0
//! end = 45.0
//!
//! [[step]]
//! action = "event"
//! event = { type = "loaded", url = "https://dai.example.com/stream.m3u8" }
//!
//! [[step]]
//! action = "seek"
//! position = 120.0
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use ssai::{AdTagParameters, RawCuePoint, StreamEvent, StreamRequest, TimelineRegion, Timestamp};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub request: StreamRequest,

    #[serde(default)]
    pub backup_url: Option<String>,

    #[serde(default)]
    pub start_time: Option<Timestamp>,

    /// Whether loads complete as a live stream
    #[serde(default)]
    pub live: bool,

    /// Cue points known to the simulated source before any event arrives
    #[serde(default)]
    pub cue_points: Vec<RawCuePoint>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Deliver a lifecycle event from the ad-stream source.
    Event { event: StreamEvent },
    /// User seek to `position`.
    Seek { position: Timestamp },
    /// Advance the playhead without a seek.
    Play { seconds: Timestamp },
    Stop,
    /// Request a new stream.
    Request {
        request: StreamRequest,
        #[serde(default)]
        backup_url: Option<String>,
        #[serde(default)]
        start_time: Option<Timestamp>,
    },
    TagParameters { parameters: AdTagParameters },
    Region { region: TimelineRegion },
    Metadata { key: String, data: String },
    /// Make the simulated surface refuse subsequent loads.
    RejectLoads { enabled: bool },
    /// Report the stream time for a content time.
    StreamTime { content_time: Timestamp },
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Self::Event { event } => format!("event {}", event.name()),
            Self::Seek { position } => format!("seek {position:.1}"),
            Self::Play { seconds } => format!("play {seconds:.1}s"),
            Self::Stop => "stop".to_owned(),
            Self::Request { request, .. } => format!("request {}", request.describe()),
            Self::TagParameters { parameters } => {
                format!("tag parameters ({} keys)", parameters.len())
            }
            Self::Region { region } => format!("region {}", region.scheme_id_uri),
            Self::Metadata { key, .. } => format!("metadata {key}"),
            Self::RejectLoads { enabled } => format!("reject loads {enabled}"),
            Self::StreamTime { content_time } => format!("stream time for {content_time:.1}"),
        }
    }
}

impl SessionScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: Self = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Play { seconds } if !seconds.is_finite() || *seconds < 0.0 => {
                    return Err(AppError::InvalidInput(format!(
                        "step {}: play duration must be a non-negative number",
                        index + 1
                    )));
                }
                Step::Seek { position } if !position.is_finite() || *position < 0.0 => {
                    return Err(AppError::InvalidInput(format!(
                        "step {}: seek position must be a non-negative number",
                        index + 1
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
