//! # LinguaLink Channel
//!
//! Duplex link to the translation backend.
//!
//! [`ResilientChannel::spawn`] starts a task that keeps a WebSocket open to
//! one of the configured endpoints, cycling through them on failure. The
//! engine talks to it through a [`ChannelHandle`] and listens for
//! [`ChannelEvent`]s.

mod channel;
mod config;
mod endpoints;
mod error;
mod protocol;
mod state;
mod targets;

pub use channel::{ChannelEvent, ChannelHandle, ResilientChannel, SpawnedChannel};
pub use config::ChannelConfig;
pub use endpoints::{EndpointRing, parse_endpoint};
pub use error::ChannelError;
pub use protocol::{InboundPayload, OutboundMessage, TranslationResult, parse_inbound};
pub use state::{ChannelPhase, ChannelState, ChannelStatus, StatusLevel};
pub use targets::{TargetLanguage, default_targets};
