use serde::{Deserialize, Serialize};

use crate::error::{Result, SsaiError};

/// Scheme id of manifest timeline regions carrying ad-stream metadata.
pub const DEFAULT_DAI_SCHEME_ID_URI: &str = "urn:google:dai:2018";

/// Default capacity of the outward notification channel.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

/// Configurable options for the ad manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdManagerConfig {
    /// Redirect seeks that skip an unplayed ad break back to the break start.
    /// Only applies to non-live sessions.
    pub snapback_enabled: bool,

    /// Timeline regions with this scheme id are forwarded to the ad-stream source
    pub dai_scheme_id_uri: String,

    /// Buffered notifications per subscriber before lagging ones drop the oldest
    pub notification_capacity: usize,
}

impl Default for AdManagerConfig {
    fn default() -> Self {
        Self {
            snapback_enabled: true,
            dai_scheme_id_uri: DEFAULT_DAI_SCHEME_ID_URI.to_owned(),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

impl AdManagerConfig {
    pub fn with_snapback(mut self, enabled: bool) -> Self {
        self.snapback_enabled = enabled;
        self
    }

    pub fn with_dai_scheme_id_uri(mut self, scheme_id_uri: impl Into<String>) -> Self {
        self.dai_scheme_id_uri = scheme_id_uri.into();
        self
    }

    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.notification_capacity == 0 {
            return Err(SsaiError::config("notification_capacity must be at least 1"));
        }
        if self.dai_scheme_id_uri.trim().is_empty() {
            return Err(SsaiError::config("dai_scheme_id_uri must not be empty"));
        }
        Ok(())
    }
}
