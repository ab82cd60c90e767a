//! Ad manager error types.

use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, SsaiError>;

/// Errors that can occur while coordinating a stitched ad stream.
#[derive(Error, Debug)]
pub enum SsaiError {
    /// The ad-stream source failed to load the stream and no backup URL was configured.
    ///
    /// Ad playback cannot start for this session. The manager surfaces this once
    /// per `Error` event and does not retry.
    #[error("Stream unavailable and no backup url provided{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NoBackupStream(Option<String>),

    /// The ad-stream source rejected a command.
    #[error("Ad stream source error: {0}")]
    Source(String),

    /// The playback surface rejected a command.
    #[error("Playback error: {0}")]
    Playback(String),

    /// The session driver is no longer accepting inputs.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SsaiError {
    /// Create an ad-stream source error.
    pub fn ad_source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a playback surface error.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is the surfaced "no fallback stream" condition rather
    /// than a collaborator failure.
    pub fn is_stream_unavailable(&self) -> bool {
        matches!(self, Self::NoBackupStream(_))
    }
}
