//! Effect executor binding the router to real collaborators.

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, warn};

use crate::config::AdManagerConfig;
use crate::effect::{Effect, FatalCondition};
use crate::error::{Result, SsaiError};
use crate::event::{Command, PlaybackEvent, SessionInput, StreamEvent};
use crate::ad::Ad;
use crate::notification::{AdNotification, Notifier};
use crate::router::Router;
use crate::state::{Environment, ManagerState};
use crate::stats::AdStatistics;
use crate::traits::{AdStreamSource, PlaybackSurface};
use crate::types::{AdTagParameters, CuePoint, StreamRequest, TimelineRegion, Timestamp};

/// Read-only view handed to the router while an input is reduced.
struct Collaborators<'a, S, P> {
    source: &'a S,
    surface: &'a P,
}

impl<S: AdStreamSource, P: PlaybackSurface> Environment for Collaborators<'_, S, P> {
    fn current_time(&self) -> Timestamp {
        self.surface.current_time()
    }

    fn previous_cue_point_for_stream_time(&self, stream_time: Timestamp) -> Option<CuePoint> {
        self.source.previous_cue_point_for_stream_time(stream_time)
    }
}

/// Coordinates one playback surface with one ad-stream source.
///
/// Every input goes through [`Router::reduce`]; the returned effects are then
/// executed in order against the collaborators. A manager can serve any number
/// of consecutive stream requests as long as each is preceded by [`stop`](Self::stop).
pub struct AdManager<S, P> {
    router: Router,
    state: ManagerState,
    source: S,
    surface: P,
    notifier: Notifier,
}

impl<S: AdStreamSource, P: PlaybackSurface> AdManager<S, P> {
    pub fn new(source: S, surface: P) -> Self {
        Self::with_config(source, surface, AdManagerConfig::default())
    }

    pub fn with_config(source: S, surface: P, config: AdManagerConfig) -> Self {
        let notifier = Notifier::new(config.notification_capacity);
        Self {
            router: Router::new(config),
            state: ManagerState::new(),
            source,
            surface,
            notifier,
        }
    }

    /// Subscribe to outward notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AdNotification> {
        self.notifier.subscribe()
    }

    /// Watch the currently playing ad with its latest merged progress.
    pub fn watch_active_ad(&self) -> watch::Receiver<Option<Ad>> {
        self.notifier.watch_active_ad()
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    pub fn stats(&self) -> AdStatistics {
        self.state.stats
    }

    pub fn config(&self) -> &AdManagerConfig {
        self.router.config()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    /// Request a stitched stream. `backup_url` is loaded if the request fails;
    /// `start_time` is applied to whichever stream ends up loading.
    pub fn request_stream(
        &mut self,
        request: StreamRequest,
        backup_url: Option<String>,
        start_time: Option<Timestamp>,
    ) -> Result<()> {
        self.dispatch(Command::RequestStream {
            request,
            backup_url,
            start_time,
        })
    }

    pub fn replace_ad_tag_parameters(&mut self, params: AdTagParameters) -> Result<()> {
        self.dispatch(Command::ReplaceAdTagParameters(params))
    }

    /// Reset the source and clear per-session state. A load already in flight
    /// is not interrupted.
    pub fn stop(&mut self) -> Result<()> {
        self.dispatch(Command::Stop)
    }

    pub fn forward_timeline_region(&mut self, region: TimelineRegion) -> Result<()> {
        self.dispatch(Command::ForwardTimelineRegion(region))
    }

    pub fn forward_timed_metadata(
        &mut self,
        key: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<()> {
        self.dispatch(Command::ForwardTimedMetadata {
            key: key.into(),
            data: data.into(),
        })
    }

    pub fn stream_time_for_content_time(&self, content_time: Timestamp) -> Timestamp {
        self.source.stream_time_for_content_time(content_time)
    }

    pub fn handle_stream_event(&mut self, event: StreamEvent) -> Result<()> {
        self.dispatch(event)
    }

    pub fn handle_playback_event(&mut self, event: PlaybackEvent) -> Result<()> {
        self.dispatch(event)
    }

    /// Reduce one input and execute its effects.
    ///
    /// All effects run even if one of them fails; the first failure is
    /// returned afterwards. A fatal stream error is returned as
    /// [`SsaiError::NoBackupStream`].
    pub fn dispatch(&mut self, input: impl Into<SessionInput>) -> Result<()> {
        let env = Collaborators {
            source: &self.source,
            surface: &self.surface,
        };
        let effects = self.router.reduce(&mut self.state, input.into(), &env);
        let result = self.execute(effects);
        self.notifier.publish_active_ad(self.state.active_ad.as_ref());
        result
    }

    fn execute(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut first_error = None;

        for effect in effects {
            debug!(?effect, "Executing effect");
            if let Err(e) = self.apply(effect) {
                warn!("Effect failed: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::RequestStream(request) => self.source.request_stream(&request),
            Effect::ReplaceAdTagParameters(params) => {
                self.source.replace_ad_tag_parameters(&params)
            }
            Effect::ResetSource => {
                self.source.reset();
                Ok(())
            }
            Effect::Load {
                url,
                start_time,
                source,
            } => self.surface.load(&url, start_time, source),
            Effect::Seek(time) => {
                self.surface.set_current_time(time);
                Ok(())
            }
            Effect::Pause => {
                self.surface.pause();
                Ok(())
            }
            Effect::SetAdActive(active) => {
                self.surface.set_ad_active(active);
                Ok(())
            }
            Effect::Notify(notification) => {
                self.notifier.publish(notification);
                Ok(())
            }
            Effect::ProcessMetadata {
                scheme_id_uri,
                data,
                timestamp,
            } => self
                .source
                .process_metadata(&scheme_id_uri, data.as_deref(), timestamp),
            Effect::TimedMetadata(metadata) => self.source.on_timed_metadata(&metadata),
            Effect::Fatal(FatalCondition::NoBackupStream { message }) => {
                error!("Ad stream failed with no backup stream to fall back to");
                self.notifier.publish(AdNotification::StreamUnavailable {
                    message: message.clone(),
                });
                Err(SsaiError::NoBackupStream(message))
            }
        }
    }
}
