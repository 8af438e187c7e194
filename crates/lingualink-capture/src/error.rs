//! Capture error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Invalid system message pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid length window: min {min} is greater than max {max}")]
    InvalidLengthWindow { min: usize, max: usize },
}
