//! Caption text normalisation.

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length window for accepted captions, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthGate {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl LengthGate {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    pub fn admits(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_chars && len <= self.max_chars
    }
}

impl Default for LengthGate {
    fn default() -> Self {
        Self::new(2, 300)
    }
}
