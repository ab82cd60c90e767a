//! Stream lifecycle routing.
//!
//! [`Router::reduce`] is the single dispatch point for every [`SessionInput`].
//! It mutates the [`ManagerState`] in place and returns the effects to execute,
//! delegating ad lifecycle events to the progress reconciler, seeks to the
//! snapback controller and cue point changes to the cue point tracker.

use tracing::{debug, error, info, warn};

use crate::config::AdManagerConfig;
use crate::cue_points;
use crate::effect::{Effect, FatalCondition};
use crate::event::{Command, PlaybackEvent, SessionInput, StreamEvent};
use crate::metadata;
use crate::progress;
use crate::snapback;
use crate::state::{Environment, ManagerState};
use crate::types::{LoadSource, StreamRequest, Timestamp};

/// Dispatches inputs to the component that owns them.
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: AdManagerConfig,
}

impl Router {
    pub fn new(config: AdManagerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdManagerConfig {
        &self.config
    }

    /// Apply one input to `state`, returning the effects in execution order.
    pub fn reduce(
        &self,
        state: &mut ManagerState,
        input: SessionInput,
        env: &impl Environment,
    ) -> Vec<Effect> {
        match input {
            SessionInput::Command(command) => self.on_command(state, command),
            SessionInput::Stream(event) => self.on_stream_event(state, event, env),
            SessionInput::Playback(event) => self.on_playback_event(state, event, env),
        }
    }

    fn on_command(&self, state: &mut ManagerState, command: Command) -> Vec<Effect> {
        match command {
            Command::RequestStream {
                request,
                backup_url,
                start_time,
            } => request_stream(state, request, backup_url, start_time),
            Command::ReplaceAdTagParameters(params) => {
                vec![Effect::ReplaceAdTagParameters(params)]
            }
            Command::Stop => stop(state),
            Command::ForwardTimelineRegion(region) => {
                metadata::forward_timeline_region(region, &self.config.dai_scheme_id_uri)
            }
            Command::ForwardTimedMetadata { key, data } => {
                metadata::forward_timed_metadata(key, data)
            }
        }
    }

    fn on_stream_event(
        &self,
        state: &mut ManagerState,
        event: StreamEvent,
        env: &impl Environment,
    ) -> Vec<Effect> {
        debug!(event = event.name(), "Ad stream event");
        match event {
            StreamEvent::Loaded { url } => on_loaded(state, url),
            StreamEvent::Error { message } => on_error(state, message),
            StreamEvent::AdBreakStarted => {
                info!("Ad Break Started");
                Vec::new()
            }
            StreamEvent::AdBreakEnded => on_ad_break_ended(state, env),
            StreamEvent::Started { ad } => progress::on_started(state, ad),
            StreamEvent::Progress { progress: snapshot } => progress::on_progress(state, snapshot),
            StreamEvent::FirstQuartile => progress::on_first_quartile(),
            StreamEvent::Midpoint => progress::on_midpoint(),
            StreamEvent::ThirdQuartile => progress::on_third_quartile(),
            StreamEvent::Complete => progress::on_complete(state),
            StreamEvent::Skipped => progress::on_skipped(state),
            StreamEvent::CuePointsChanged { cue_points: raw } => {
                cue_points::on_cue_points_changed(&raw)
            }
        }
    }

    fn on_playback_event(
        &self,
        state: &mut ManagerState,
        event: PlaybackEvent,
        env: &impl Environment,
    ) -> Vec<Effect> {
        match event {
            PlaybackEvent::Seeked { position } => {
                if !state.seek_observation || !self.config.snapback_enabled {
                    return Vec::new();
                }
                snapback::on_seeked(state, position, env)
            }
            PlaybackEvent::LoadCompleted { source, is_live } => {
                on_load_completed(state, source, is_live);
                Vec::new()
            }
        }
    }
}

fn request_stream(
    state: &mut ManagerState,
    request: StreamRequest,
    backup_url: Option<String>,
    start_time: Option<Timestamp>,
) -> Vec<Effect> {
    info!(request = %request.describe(), "Requesting ad stream");
    state.backup_source_url = backup_url.unwrap_or_default();
    state.requested_start_time = start_time;
    vec![Effect::RequestStream(request)]
}

/// Reset the source and drop every piece of per-session state.
fn stop(state: &mut ManagerState) -> Vec<Effect> {
    if state.is_snapped() {
        debug!("Discarding pending snap target on stop");
    }
    let was_ad_active = state.ad_active;
    state.reset_session();

    let mut effects = vec![Effect::ResetSource];
    if was_ad_active {
        debug!("Clearing ad-active indicator on stop");
        effects.push(Effect::SetAdActive(false));
    }
    effects
}

fn on_loaded(state: &ManagerState, url: String) -> Vec<Effect> {
    info!(%url, "Ad SS Loaded");
    vec![Effect::Load {
        url,
        start_time: state.requested_start_time,
        source: LoadSource::Stream,
    }]
}

fn on_error(state: &mut ManagerState, message: Option<String>) -> Vec<Effect> {
    info!(reason = message.as_deref().unwrap_or(""), "Ad SS Error");
    if !state.has_backup() {
        error!("No backup url provided");
        state.stats.record_unrecovered_error();
        return vec![Effect::Fatal(FatalCondition::NoBackupStream { message })];
    }

    warn!(backup_url = %state.backup_source_url, "Falling back to backup stream");
    state.stats.record_backup_load();
    vec![Effect::Load {
        url: state.backup_source_url.clone(),
        start_time: state.requested_start_time,
        source: LoadSource::Backup,
    }]
}

/// Live sessions never observe seeks: without a fixed duration there is no
/// well-defined break to skip over.
fn on_load_completed(state: &mut ManagerState, source: LoadSource, is_live: bool) {
    match source {
        LoadSource::Stream if is_live => {
            debug!("Live stream loaded, snapback disabled");
        }
        LoadSource::Stream => {
            debug!("Stream loaded, observing seeks");
            state.seek_observation = true;
        }
        LoadSource::Backup => {
            debug!("Backup stream loaded");
        }
    }
}

fn on_ad_break_ended(state: &mut ManagerState, env: &impl Environment) -> Vec<Effect> {
    info!("Ad Break Ended");
    state.ad_active = false;
    state.active_ad = None;

    let mut effects = vec![Effect::SetAdActive(false)];
    effects.extend(snapback::restore_after_break(state, env));
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::AdNotification;
    use crate::test_utils::FakeEnv;
    use crate::types::AdHandle;

    fn request(state: &mut ManagerState, router: &Router, backup: Option<&str>, start: Option<f64>) {
        router.reduce(
            state,
            Command::RequestStream {
                request: StreamRequest::vod("2528370", "tears"),
                backup_url: backup.map(str::to_string),
                start_time: start,
            }
            .into(),
            &FakeEnv::default(),
        );
    }

    fn armed_state(router: &Router) -> ManagerState {
        let mut state = ManagerState::new();
        request(&mut state, router, None, None);
        router.reduce(
            &mut state,
            PlaybackEvent::LoadCompleted {
                source: LoadSource::Stream,
                is_live: false,
            }
            .into(),
            &FakeEnv::default(),
        );
        state
    }

    #[test]
    fn test_request_stream_stores_defaults() {
        let router = Router::default();
        let mut state = ManagerState::new();

        let effects = router.reduce(
            &mut state,
            Command::RequestStream {
                request: StreamRequest::live("asset"),
                backup_url: None,
                start_time: None,
            }
            .into(),
            &FakeEnv::default(),
        );

        assert_eq!(effects, vec![Effect::RequestStream(StreamRequest::live("asset"))]);
        assert_eq!(state.backup_source_url, "");
        assert_eq!(state.requested_start_time, None);
    }

    #[test]
    fn test_loaded_uses_requested_start_time() {
        let router = Router::default();
        let mut state = ManagerState::new();
        request(&mut state, &router, None, Some(30.0));

        let effects = router.reduce(
            &mut state,
            StreamEvent::Loaded {
                url: "https://dai/stream.m3u8".to_string(),
            }
            .into(),
            &FakeEnv::default(),
        );

        assert_eq!(
            effects,
            vec![Effect::Load {
                url: "https://dai/stream.m3u8".to_string(),
                start_time: Some(30.0),
                source: LoadSource::Stream,
            }]
        );
    }

    #[test]
    fn test_error_without_backup_is_fatal() {
        let router = Router::default();
        let mut state = ManagerState::new();
        request(&mut state, &router, None, None);

        let effects = router.reduce(
            &mut state,
            StreamEvent::Error { message: None }.into(),
            &FakeEnv::default(),
        );

        assert_eq!(
            effects,
            vec![Effect::Fatal(FatalCondition::NoBackupStream { message: None })]
        );
        assert_eq!(state.stats.unrecovered_errors, 1);
    }

    #[test]
    fn test_error_with_backup_loads_once() {
        let router = Router::default();
        let mut state = ManagerState::new();
        request(&mut state, &router, Some("https://backup/x.m3u8"), Some(12.0));

        let effects = router.reduce(
            &mut state,
            StreamEvent::Error { message: None }.into(),
            &FakeEnv::default(),
        );

        assert_eq!(
            effects,
            vec![Effect::Load {
                url: "https://backup/x.m3u8".to_string(),
                start_time: Some(12.0),
                source: LoadSource::Backup,
            }]
        );
    }

    #[test]
    fn test_seeks_ignored_until_stream_loaded() {
        let router = Router::default();
        let env = FakeEnv::at(0.0).with_cue(100.0, 130.0, false);
        let mut state = ManagerState::new();
        request(&mut state, &router, None, None);

        let effects = router.reduce(
            &mut state,
            PlaybackEvent::Seeked { position: 500.0 }.into(),
            &env,
        );

        assert!(effects.is_empty());
        assert!(state.snap_forward_target.is_none());
    }

    #[test]
    fn test_live_stream_never_arms_snapback() {
        let router = Router::default();
        let env = FakeEnv::at(0.0).with_cue(100.0, 130.0, false);
        let mut state = ManagerState::new();
        request(&mut state, &router, None, None);
        router.reduce(
            &mut state,
            PlaybackEvent::LoadCompleted {
                source: LoadSource::Stream,
                is_live: true,
            }
            .into(),
            &env,
        );

        let effects = router.reduce(
            &mut state,
            PlaybackEvent::Seeked { position: 500.0 }.into(),
            &env,
        );

        assert!(!state.seek_observation);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_backup_load_does_not_arm_snapback() {
        let router = Router::default();
        let mut state = ManagerState::new();
        router.reduce(
            &mut state,
            PlaybackEvent::LoadCompleted {
                source: LoadSource::Backup,
                is_live: false,
            }
            .into(),
            &FakeEnv::default(),
        );
        assert!(!state.seek_observation);
    }

    #[test]
    fn test_snapback_disabled_by_config() {
        let router = Router::new(AdManagerConfig::default().with_snapback(false));
        let env = FakeEnv::at(0.0).with_cue(100.0, 130.0, false);
        let mut state = armed_state(&router);

        let effects = router.reduce(
            &mut state,
            PlaybackEvent::Seeked { position: 500.0 }.into(),
            &env,
        );

        assert!(effects.is_empty());
    }

    #[test]
    fn test_snap_then_break_end_restores_target() {
        let router = Router::default();
        let mut state = armed_state(&router);

        let env = FakeEnv::at(0.0).with_cue(100.0, 130.0, false);
        let effects = router.reduce(
            &mut state,
            PlaybackEvent::Seeked { position: 500.0 }.into(),
            &env,
        );
        assert_eq!(effects, vec![Effect::Seek(100.0)]);

        router.reduce(
            &mut state,
            StreamEvent::Started {
                ad: AdHandle::new("ad-1"),
            }
            .into(),
            &env,
        );

        let env = FakeEnv::at(130.0).with_cue(100.0, 130.0, true);
        let effects = router.reduce(&mut state, StreamEvent::AdBreakEnded.into(), &env);

        assert_eq!(
            effects,
            vec![Effect::SetAdActive(false), Effect::Seek(500.0)]
        );
        assert!(state.snap_forward_target.is_none());
        assert!(state.active_ad.is_none());
    }

    #[test]
    fn test_break_end_without_snap_leaves_position() {
        let router = Router::default();
        let mut state = armed_state(&router);

        let effects = router.reduce(
            &mut state,
            StreamEvent::AdBreakEnded.into(),
            &FakeEnv::at(45.0),
        );

        assert_eq!(effects, vec![Effect::SetAdActive(false)]);
    }

    #[test]
    fn test_stop_clears_session_state() {
        let router = Router::default();
        let mut state = armed_state(&router);
        request(&mut state, &router, Some("https://backup/x.m3u8"), Some(5.0));
        state.snap_forward_target = Some(300.0);

        let effects = router.reduce(&mut state, Command::Stop.into(), &FakeEnv::default());

        assert_eq!(effects, vec![Effect::ResetSource]);
        assert_eq!(state.backup_source_url, "");
        assert!(state.snap_forward_target.is_none());
        assert!(!state.seek_observation);

        // idempotent
        let effects = router.reduce(&mut state, Command::Stop.into(), &FakeEnv::default());
        assert_eq!(effects, vec![Effect::ResetSource]);
    }

    #[test]
    fn test_stop_mid_ad_clears_indicator() {
        let router = Router::default();
        let mut state = armed_state(&router);
        router.reduce(
            &mut state,
            StreamEvent::Started {
                ad: AdHandle::new("ad-1"),
            }
            .into(),
            &FakeEnv::default(),
        );
        assert!(state.ad_active);

        let effects = router.reduce(&mut state, Command::Stop.into(), &FakeEnv::default());

        assert_eq!(effects, vec![Effect::ResetSource, Effect::SetAdActive(false)]);
        assert!(!state.ad_active);
        assert!(state.active_ad.is_none());
    }

    #[test]
    fn test_ad_break_started_is_informational() {
        let router = Router::default();
        let mut state = armed_state(&router);
        let before = state.clone();

        let effects = router.reduce(
            &mut state,
            StreamEvent::AdBreakStarted.into(),
            &FakeEnv::default(),
        );

        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_cue_points_changed_routed() {
        let router = Router::default();
        let mut state = ManagerState::new();

        let effects = router.reduce(
            &mut state,
            StreamEvent::CuePointsChanged { cue_points: vec![] }.into(),
            &FakeEnv::default(),
        );

        assert_eq!(
            effects,
            vec![Effect::Notify(AdNotification::CuePointsChanged {
                cue_points: vec![]
            })]
        );
    }
}
