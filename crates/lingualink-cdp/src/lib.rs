//! # LinguaLink CDP
//!
//! Mirrors a meeting tab from Chrome into a [`lingualink_dom::Document`]
//! over the Chrome DevTools Protocol.
//!
//! Start Chrome with remote debugging enabled:
//!
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```
//!
//! then run a [`PageHost`] (or [`run_host`] for automatic re-attach) and
//! apply the [`DocumentUpdate`](lingualink_dom::DocumentUpdate)s it sends.

mod client;
mod config;
mod convert;
mod error;
mod host;
mod protocol;
mod session;

pub use client::CdpClient;
pub use config::HostConfig;
pub use convert::{DomEvent, node_to_snapshot, translate_event, unloaded_children};
pub use error::CdpError;
pub use host::{PageHost, ProbeFilter, run_host};
pub use protocol::*;
pub use session::PageSession;
