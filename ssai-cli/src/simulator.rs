//! In-process stand-ins for the ad-stream source and the playback surface.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::Serialize;
use ssai::{
    AdStreamSource, AdTagParameters, CuePoint, LoadSource, PlaybackEvent, PlaybackSurface,
    RawCuePoint, SsaiError, StreamRequest, Timestamp, cue_points::to_cue_points,
    previous_cue_point,
};
use tracing::debug;

/// Ad-stream source backed by a fixed cue point list.
#[derive(Debug, Default)]
pub struct SimulatedSource {
    cue_points: Vec<CuePoint>,
    requests: Vec<StreamRequest>,
    metadata_forwarded: usize,
}

impl SimulatedSource {
    pub fn new(cue_points: &[RawCuePoint]) -> Self {
        let mut source = Self::default();
        source.set_cue_points(cue_points);
        source
    }

    pub fn cue_points(&self) -> &[CuePoint] {
        &self.cue_points
    }

    pub fn requests(&self) -> &[StreamRequest] {
        &self.requests
    }

    pub fn metadata_forwarded(&self) -> usize {
        self.metadata_forwarded
    }

    pub fn set_cue_points(&mut self, raw: &[RawCuePoint]) {
        self.cue_points = to_cue_points(raw);
        self.cue_points.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    /// Mark the break containing `position` as played.
    pub fn mark_played_at(&mut self, position: Timestamp) {
        if let Some(cue) = self.cue_points.iter_mut().find(|cue| cue.contains(position)) {
            debug!(start = cue.start, end = cue.end, "Marking cue point played");
            cue.played = true;
        }
    }
}

impl AdStreamSource for SimulatedSource {
    fn request_stream(&mut self, request: &StreamRequest) -> ssai::Result<()> {
        debug!("Simulated source received request for {}", request.describe());
        self.requests.push(request.clone());
        Ok(())
    }

    fn replace_ad_tag_parameters(&mut self, params: &AdTagParameters) -> ssai::Result<()> {
        if let Some(request) = self.requests.last_mut() {
            request.ad_tag_parameters = params.clone();
        }
        Ok(())
    }

    fn reset(&mut self) {
        debug!("Simulated source reset");
    }

    fn stream_time_for_content_time(&self, content_time: Timestamp) -> Timestamp {
        let mut stream_time = content_time;
        for cue in &self.cue_points {
            if cue.start <= stream_time {
                stream_time += cue.duration();
            }
        }
        stream_time
    }

    fn previous_cue_point_for_stream_time(&self, stream_time: Timestamp) -> Option<CuePoint> {
        previous_cue_point(&self.cue_points, stream_time)
    }

    fn process_metadata(
        &mut self,
        scheme_id_uri: &str,
        data: Option<&str>,
        timestamp: Timestamp,
    ) -> ssai::Result<()> {
        debug!(
            scheme_id_uri,
            has_data = data.is_some(),
            timestamp,
            "Simulated source received metadata"
        );
        self.metadata_forwarded += 1;
        Ok(())
    }

    fn on_timed_metadata(&mut self, metadata: &BTreeMap<String, String>) -> ssai::Result<()> {
        debug!(keys = metadata.len(), "Simulated source received timed metadata");
        self.metadata_forwarded += 1;
        Ok(())
    }
}

/// Something the manager did to the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SurfaceAction {
    Seek {
        position: Timestamp,
    },
    Pause,
    Load {
        url: String,
        start_time: Option<Timestamp>,
        source: LoadSource,
    },
    AdActive {
        active: bool,
    },
}

impl fmt::Display for SurfaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seek { position } => write!(f, "seek to {position:.1}"),
            Self::Pause => write!(f, "pause"),
            Self::Load {
                url,
                start_time,
                source,
            } => {
                write!(f, "load {source:?} {url}")?;
                if let Some(start) = start_time {
                    write!(f, " from {start:.1}")?;
                }
                Ok(())
            }
            Self::AdActive { active } => write!(f, "ad active = {active}"),
        }
    }
}

/// Playback surface that completes loads and seeks immediately.
///
/// Feedback the real element would report asynchronously is queued and must
/// be drained through the manager with [`SimulatedSurface::next_feedback`].
#[derive(Debug, Default)]
pub struct SimulatedSurface {
    position: Timestamp,
    paused: bool,
    ad_active: bool,
    live: bool,
    reject_loads: bool,
    loaded_url: Option<String>,
    actions: Vec<SurfaceAction>,
    feedback: VecDeque<PlaybackEvent>,
}

impl SimulatedSurface {
    pub fn new(live: bool) -> Self {
        Self {
            live,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Timestamp {
        self.position
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ad_active(&self) -> bool {
        self.ad_active
    }

    pub fn loaded_url(&self) -> Option<&str> {
        self.loaded_url.as_deref()
    }

    pub fn set_reject_loads(&mut self, reject: bool) {
        self.reject_loads = reject;
    }

    /// Move the playhead as a user would. Nothing is queued; the caller
    /// delivers the seek itself.
    pub fn user_seek(&mut self, position: Timestamp) {
        self.position = position;
        self.paused = false;
    }

    pub fn advance(&mut self, seconds: Timestamp) {
        self.position += seconds;
        self.paused = false;
    }

    pub fn next_feedback(&mut self) -> Option<PlaybackEvent> {
        self.feedback.pop_front()
    }

    pub fn take_actions(&mut self) -> Vec<SurfaceAction> {
        std::mem::take(&mut self.actions)
    }
}

impl PlaybackSurface for SimulatedSurface {
    fn current_time(&self) -> Timestamp {
        self.position
    }

    fn set_current_time(&mut self, time: Timestamp) {
        self.position = time;
        self.actions.push(SurfaceAction::Seek { position: time });
        self.feedback.push_back(PlaybackEvent::Seeked { position: time });
    }

    fn pause(&mut self) {
        self.paused = true;
        self.actions.push(SurfaceAction::Pause);
    }

    fn load(
        &mut self,
        url: &str,
        start_time: Option<Timestamp>,
        source: LoadSource,
    ) -> ssai::Result<()> {
        if self.reject_loads {
            return Err(SsaiError::playback(format!("load rejected: {url}")));
        }

        self.actions.push(SurfaceAction::Load {
            url: url.to_owned(),
            start_time,
            source,
        });
        self.loaded_url = Some(url.to_owned());
        self.position = start_time.unwrap_or(0.0);
        self.paused = false;
        self.feedback.push_back(PlaybackEvent::LoadCompleted {
            source,
            is_live: self.live,
        });
        Ok(())
    }

    fn set_ad_active(&mut self, active: bool) {
        self.ad_active = active;
        self.actions.push(SurfaceAction::AdActive { active });
    }
}
