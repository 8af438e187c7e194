//! # LinguaLink Capture
//!
//! Finds the live caption on a mirrored meeting page.
//!
//! Text enters through two paths. Mutations in subscribed roots are turned
//! into candidates one node at a time, while a periodic poll re-discovers
//! roots and, when no caption was accepted recently, scans every root for
//! the best-scoring candidate. Both paths feed a [`CaptionTracker`].

mod config;
mod error;
mod extract;
mod filter;
mod heuristics;
mod normalize;
mod pipeline;
mod scan;
mod scorer;
mod tracker;

pub use config::CaptureConfig;
pub use error::CaptureError;
pub use extract::{CaptionCandidate, Extractor};
pub use filter::{NoiseFilter, SYSTEM_MESSAGE_PATTERNS};
pub use heuristics::{CAPTION_ATTR, CaptionHeuristics, CaptionMarkers, declares_live_region};
pub use normalize::{LengthGate, normalize_text};
pub use pipeline::{CapturePipeline, PollOutcome};
pub use scan::{ScoredCandidate, Scanner};
pub use scorer::{ScoreWeights, Scorer};
pub use tracker::{CaptionState, CaptionTracker};
