//! Collaborator traits.
//!
//! The ad manager drives two external components: the ad-stream source that
//! resolves stitched streams and reports ad lifecycle events, and the playback
//! surface that renders the stream.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{AdTagParameters, CuePoint, LoadSource, StreamRequest, Timestamp};

/// The external ad-insertion service.
///
/// Lifecycle events are delivered separately as
/// [`StreamEvent`](crate::StreamEvent)s; this trait covers the commands and
/// queries the manager issues.
pub trait AdStreamSource {
    /// Start resolving a stitched stream. Results arrive as `Loaded` or `Error`.
    fn request_stream(&mut self, request: &StreamRequest) -> Result<()>;

    fn replace_ad_tag_parameters(&mut self, params: &AdTagParameters) -> Result<()>;

    /// Drop internal state and stop any continuous polling.
    fn reset(&mut self);

    /// Map a content position (excluding ads) to a stream position.
    fn stream_time_for_content_time(&self, content_time: Timestamp) -> Timestamp;

    /// The cue point starting strictly before `stream_time`, if any.
    fn previous_cue_point_for_stream_time(&self, stream_time: Timestamp) -> Option<CuePoint>;

    /// Forward manifest metadata.
    fn process_metadata(
        &mut self,
        scheme_id_uri: &str,
        data: Option<&str>,
        timestamp: Timestamp,
    ) -> Result<()>;

    /// Forward in-band timed metadata.
    fn on_timed_metadata(&mut self, metadata: &BTreeMap<String, String>) -> Result<()>;
}

/// The media element the stream plays on.
pub trait PlaybackSurface {
    fn current_time(&self) -> Timestamp;

    /// Move the playhead. The surface reports the change back as
    /// [`PlaybackEvent::Seeked`](crate::PlaybackEvent::Seeked).
    fn set_current_time(&mut self, time: Timestamp);

    fn pause(&mut self);

    /// Begin loading `url`. Completion is reported asynchronously as
    /// [`PlaybackEvent::LoadCompleted`](crate::PlaybackEvent::LoadCompleted)
    /// carrying the same `source`.
    fn load(&mut self, url: &str, start_time: Option<Timestamp>, source: LoadSource) -> Result<()>;

    /// Show or hide the ad-active indicator on the ad container.
    fn set_ad_active(&mut self, _active: bool) {}
}
