//! Async session driver.
//!
//! Feeds inputs from a channel into an [`AdManager`] one at a time, so every
//! transition runs to completion before the next input is looked at. Ad
//! stream events and playback feedback from different producers are
//! serialized through the same channel.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ad::Ad;
use crate::error::{Result, SsaiError};
use crate::event::SessionInput;
use crate::manager::AdManager;
use crate::traits::{AdStreamSource, PlaybackSurface};

/// Default capacity of the input channel.
pub const DEFAULT_INPUT_CAPACITY: usize = 256;

/// Producer side of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    input_tx: mpsc::Sender<SessionInput>,
    cancel_token: CancellationToken,
    active_ad: watch::Receiver<Option<Ad>>,
}

impl SessionHandle {
    pub async fn send(&self, input: impl Into<SessionInput>) -> Result<()> {
        self.input_tx
            .send(input.into())
            .await
            .map_err(|_| SsaiError::SessionClosed)
    }

    /// Stop the session. The driver resets the manager before returning it.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.input_tx.is_closed()
    }

    /// The currently playing ad, updated as its progress arrives.
    pub fn active_ad(&self) -> watch::Receiver<Option<Ad>> {
        self.active_ad.clone()
    }
}

/// Runs an [`AdManager`] against a stream of [`SessionInput`]s.
pub struct SessionDriver<S, P> {
    manager: AdManager<S, P>,
    input_rx: mpsc::Receiver<SessionInput>,
    cancel_token: CancellationToken,
}

impl<S: AdStreamSource, P: PlaybackSurface> SessionDriver<S, P> {
    pub fn new(manager: AdManager<S, P>) -> (Self, SessionHandle) {
        Self::with_capacity(manager, DEFAULT_INPUT_CAPACITY)
    }

    pub fn with_capacity(manager: AdManager<S, P>, capacity: usize) -> (Self, SessionHandle) {
        let (input_tx, input_rx) = mpsc::channel(capacity.max(1));
        let cancel_token = CancellationToken::new();
        let handle = SessionHandle {
            input_tx,
            cancel_token: cancel_token.clone(),
            active_ad: manager.watch_active_ad(),
        };
        let driver = Self {
            manager,
            input_rx,
            cancel_token,
        };
        (driver, handle)
    }

    pub fn manager(&self) -> &AdManager<S, P> {
        &self.manager
    }

    /// Process inputs until every handle is dropped or the session is cancelled,
    /// then hand the manager back.
    ///
    /// A stream error without a backup is logged and the loop keeps going;
    /// collaborator failures end the session.
    pub async fn run(mut self) -> Result<AdManager<S, P>> {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel_token.cancelled() => {
                    info!("Session cancelled, stopping ad manager");
                    self.manager.stop()?;
                    break;
                }

                input = self.input_rx.recv() => {
                    match input {
                        Some(input) => self.handle_input(input)?,
                        None => {
                            debug!("Session input channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.manager)
    }

    fn handle_input(&mut self, input: SessionInput) -> Result<()> {
        match self.manager.dispatch(input) {
            Err(e) if e.is_stream_unavailable() => {
                warn!("Ad playback unavailable for this session: {}", e);
                Ok(())
            }
            other => other,
        }
    }
}
