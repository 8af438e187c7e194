//! # LinguaLink RunLoop
//!
//! The live caption engine: one task mirrors the page, captures the
//! current caption and hands it to the translation channel at a bounded
//! rate, while a second task forwards channel status and translations to
//! the overlay.
//!
//! ## Flow
//!
//! ```text
//! DocumentUpdate ──► Engine ──► OutboundLimiter ──► ChannelHandle ──► backend
//!                      ▲                                                 │
//!                 SettingsHandle                                         ▼
//!                      │                                          ChannelEvent
//!                      └──────────────► OverlayBridge ◄──────────────────┘
//!                                            │
//!                                            ▼
//!                                       OverlaySink
//! ```
//!
//! ## Timing
//!
//! - The capture poll runs every second by default and rescans only when
//!   the caption has been unchanged for longer than the stale window.
//! - The engine tick runs every 16 ms. At most one caption goes out per
//!   250 ms and an unchanged caption is never resent unless a toggle
//!   changed.

pub mod engine;
pub mod error;
pub mod limiter;
pub mod overlay;
pub mod service;
pub mod settings;

pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use limiter::{LimiterConfig, OutboundLimiter, TickContext, is_final};
pub use overlay::{OverlayBridge, OverlaySink, TranslationBoard, TranslationLine};
pub use service::{CaptionService, ServiceConfig};
pub use settings::{Settings, SettingsConfig, SettingsHandle};
