//! Library target for the `ssai-replay` binary.
//!
//! Session scripts are parsed by [`script`], replayed against the simulated
//! collaborators in [`simulator`] by [`replay`], and rendered by [`output`].

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod replay;
pub mod script;
pub mod simulator;
