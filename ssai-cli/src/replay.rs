//! Drives an [`AdManager`] through a [`SessionScript`].

use serde::Serialize;
use ssai::{
    AdManager, AdManagerConfig, AdNotification, AdStatistics, CuePoint, PlaybackEvent,
    StreamEvent, Timestamp,
};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::script::{SessionScript, Step};
use crate::simulator::{SimulatedSource, SimulatedSurface, SurfaceAction};

/// Upper bound on surface feedback handled per step. A manager that keeps
/// seeking in response to its own seeks would otherwise never settle.
const MAX_FEEDBACK_PER_STEP: usize = 32;

type SimulatedManager = AdManager<SimulatedSource, SimulatedSurface>;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub step: usize,
    pub input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<SurfaceAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<AdNotification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReportEntry {
    fn new(step: usize, input: String) -> Self {
        Self {
            step,
            input,
            actions: Vec::new(),
            notifications: Vec::new(),
            errors: Vec::new(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub entries: Vec<ReportEntry>,
    pub stats: AdStatistics,
    pub final_position: Timestamp,
    pub snap_forward_target: Option<Timestamp>,
    pub ad_active: bool,
    pub cue_points: Vec<CuePoint>,
}

impl ReplayReport {
    pub fn notifications(&self) -> impl Iterator<Item = &AdNotification> {
        self.entries.iter().flat_map(|entry| entry.notifications.iter())
    }

    pub fn actions(&self) -> impl Iterator<Item = &SurfaceAction> {
        self.entries.iter().flat_map(|entry| entry.actions.iter())
    }
}

pub struct Replayer {
    manager: SimulatedManager,
    notifications: Receiver<AdNotification>,
}

impl Replayer {
    pub fn new(script: &SessionScript, config: AdManagerConfig) -> Result<Self> {
        config.validate()?;
        let source = SimulatedSource::new(&script.cue_points);
        let surface = SimulatedSurface::new(script.live);
        let manager = AdManager::with_config(source, surface, config);
        let notifications = manager.subscribe();
        Ok(Self {
            manager,
            notifications,
        })
    }

    pub fn manager(&self) -> &SimulatedManager {
        &self.manager
    }

    /// Issue the script's initial request and apply every step in order.
    pub fn run(mut self, script: &SessionScript) -> Result<ReplayReport> {
        info!(
            "Replaying session for {} ({} steps)",
            script.request.describe(),
            script.steps.len()
        );

        let mut entries = Vec::with_capacity(script.steps.len() + 1);
        let initial = Step::Request {
            request: script.request.clone(),
            backup_url: script.backup_url.clone(),
            start_time: script.start_time,
        };
        entries.push(self.apply(0, &initial)?);

        for (index, step) in script.steps.iter().enumerate() {
            entries.push(self.apply(index + 1, step)?);
        }

        Ok(self.finish(entries))
    }

    pub fn apply(&mut self, index: usize, step: &Step) -> Result<ReportEntry> {
        let mut entry = ReportEntry::new(index, step.label());
        debug!(step = index, "Applying {}", entry.input);

        let result = match step {
            Step::Event { event } => {
                self.before_stream_event(event);
                self.manager.handle_stream_event(event.clone())
            }
            Step::Seek { position } => {
                self.manager.surface_mut().user_seek(*position);
                self.manager.handle_playback_event(PlaybackEvent::Seeked {
                    position: *position,
                })
            }
            Step::Play { seconds } => {
                self.manager.surface_mut().advance(*seconds);
                Ok(())
            }
            Step::Stop => self.manager.stop(),
            Step::Request {
                request,
                backup_url,
                start_time,
            } => self
                .manager
                .request_stream(request.clone(), backup_url.clone(), *start_time),
            Step::TagParameters { parameters } => {
                self.manager.replace_ad_tag_parameters(parameters.clone())
            }
            Step::Region { region } => self.manager.forward_timeline_region(region.clone()),
            Step::Metadata { key, data } => {
                self.manager.forward_timed_metadata(key.clone(), data.clone())
            }
            Step::RejectLoads { enabled } => {
                self.manager.surface_mut().set_reject_loads(*enabled);
                Ok(())
            }
            Step::StreamTime { content_time } => {
                let stream_time = self.manager.stream_time_for_content_time(*content_time);
                entry.detail = Some(format!(
                    "content {content_time:.1} -> stream {stream_time:.1}"
                ));
                Ok(())
            }
        };
        record(&mut entry, result);

        self.drain_feedback(&mut entry)?;
        entry.actions = self.manager.surface_mut().take_actions();
        self.drain_notifications(&mut entry);
        Ok(entry)
    }

    /// Keep the simulated source consistent with the event it is about to report.
    fn before_stream_event(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::CuePointsChanged { cue_points } => {
                self.manager.source_mut().set_cue_points(cue_points);
            }
            StreamEvent::AdBreakStarted => {
                let position = self.manager.surface().position();
                self.manager.source_mut().mark_played_at(position);
            }
            _ => {}
        }
    }

    fn drain_feedback(&mut self, entry: &mut ReportEntry) -> Result<()> {
        let mut handled = 0;
        while let Some(feedback) = self.manager.surface_mut().next_feedback() {
            handled += 1;
            if handled > MAX_FEEDBACK_PER_STEP {
                return Err(AppError::Replay(format!(
                    "step {} did not settle after {} surface events",
                    entry.step, MAX_FEEDBACK_PER_STEP
                )));
            }
            debug!(?feedback, "Delivering surface feedback");
            let result = self.manager.handle_playback_event(feedback);
            record(entry, result);
        }
        Ok(())
    }

    fn drain_notifications(&mut self, entry: &mut ReportEntry) {
        loop {
            match self.notifications.try_recv() {
                Ok(notification) => entry.notifications.push(notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Notification receiver lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn finish(self, entries: Vec<ReportEntry>) -> ReplayReport {
        let state = self.manager.state();
        ReplayReport {
            entries,
            stats: self.manager.stats(),
            final_position: self.manager.surface().position(),
            snap_forward_target: state.snap_forward_target,
            ad_active: state.ad_active,
            cue_points: self.manager.source().cue_points().to_vec(),
        }
    }
}

fn record(entry: &mut ReportEntry, result: ssai::Result<()>) {
    if let Err(e) = result {
        warn!(step = entry.step, "{}", e);
        entry.errors.push(e.to_string());
    }
}

/// Replay `script` with `config` and collect the report.
pub fn replay(script: &SessionScript, config: AdManagerConfig) -> Result<ReplayReport> {
    Replayer::new(script, config)?.run(script)
}
