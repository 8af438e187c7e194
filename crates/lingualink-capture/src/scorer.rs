//! Candidate scoring.

use serde::{Deserialize, Serialize};

use crate::extract::CaptionCandidate;

/// Score contributions added to the candidate's character length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_live_region")]
    pub live_region: i32,
    #[serde(default = "default_log_role")]
    pub log_role: i32,
    #[serde(default = "default_caption_attr")]
    pub caption_attr: i32,
    #[serde(default = "default_caption_class")]
    pub caption_class: i32,
    /// Usually negative.
    #[serde(default = "default_system_message")]
    pub system_message: i32,
    #[serde(default = "default_line_pattern")]
    pub line_pattern: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            live_region: default_live_region(),
            log_role: default_log_role(),
            caption_attr: default_caption_attr(),
            caption_class: default_caption_class(),
            system_message: default_system_message(),
            line_pattern: default_line_pattern(),
        }
    }
}

fn default_live_region() -> i32 {
    50
}

fn default_log_role() -> i32 {
    40
}

fn default_caption_attr() -> i32 {
    40
}

fn default_caption_class() -> i32 {
    30
}

fn default_system_message() -> i32 {
    -40
}

fn default_line_pattern() -> i32 {
    20
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, candidate: &CaptionCandidate, is_system_message: bool) -> i32 {
        let w = &self.weights;
        let length = i32::try_from(candidate.text.chars().count()).unwrap_or(i32::MAX);
        let mut score = length;
        let m = &candidate.markers;
        if m.live_region {
            score += w.live_region;
        }
        if m.log_role {
            score += w.log_role;
        }
        if m.caption_attr {
            score += w.caption_attr;
        }
        if m.caption_class {
            score += w.caption_class;
        }
        if is_system_message {
            score += w.system_message;
        }
        if candidate.line_pattern {
            score += w.line_pattern;
        }
        score
    }
}
