//! # ssai
//!
//! Playback coordination for streams with server-side stitched ad breaks.
//!
//! The crate sits between an ad-insertion service that reports stream loading,
//! ad lifecycle, progress and cue point changes, and a playback surface that
//! can be paused, seeked and pointed at a new source.
//!
//! ## Core
//!
//! - [`Router`] - Single dispatch over every [`SessionInput`], returning [`Effect`]s
//! - [`ManagerState`] - Per-session state threaded through the router
//! - [`snapback`] - Redirects seeks that skip an unplayed break and restores them afterwards
//! - [`progress`] - Resolves the `Started`/`Progress` event race
//! - [`cue_points`] - Republishes cue point lists
//!
//! ## Runtime
//!
//! - [`AdManager`] - Executes effects against an [`AdStreamSource`] and a [`PlaybackSurface`]
//! - [`SessionDriver`] - Async loop feeding a manager from a channel
//! - [`Notifier`] - Broadcast of [`AdNotification`]s to the application

pub mod ad;
pub mod config;
pub mod cue_points;
pub mod effect;
pub mod error;
pub mod event;
pub mod manager;
mod metadata;
pub mod notification;
pub mod progress;
pub mod router;
pub mod session;
pub mod snapback;
pub mod state;
pub mod stats;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use ad::Ad;
pub use config::{AdManagerConfig, DEFAULT_DAI_SCHEME_ID_URI};
pub use cue_points::previous_cue_point;
pub use effect::{Effect, FatalCondition};
pub use error::{Result, SsaiError};
pub use event::{Command, PlaybackEvent, SessionInput, StreamEvent};
pub use manager::AdManager;
pub use notification::{AdNotification, Notifier};
pub use router::Router;
pub use session::{SessionDriver, SessionHandle};
pub use snapback::SnapState;
pub use state::{Environment, ManagerState};
pub use stats::AdStatistics;
pub use traits::{AdStreamSource, PlaybackSurface};
pub use types::{
    AdHandle, AdProgress, AdTagParameters, CuePoint, LoadSource, RawCuePoint, StreamFormat,
    StreamRequest, TimelineRegion, Timestamp,
};
