//! Structural caption heuristics.

use lingualink_dom::{Document, ElementData, NodeId};

/// Data attribute that explicitly marks a caption element.
pub const CAPTION_ATTR: &str = "data-caption";

/// Attribute markers that make an element look like a caption source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptionMarkers {
    /// Non-empty `aria-live`.
    pub live_region: bool,
    /// `role="log"`.
    pub log_role: bool,
    /// `data-caption` present.
    pub caption_attr: bool,
    /// Class mentions caption or subtitle.
    pub caption_class: bool,
}

/// Matches caption-like elements and the recognised caption line pattern.
#[derive(Debug, Clone)]
pub struct CaptionHeuristics {
    line_container_classes: Vec<String>,
    line_text_classes: Vec<String>,
}

impl CaptionHeuristics {
    pub fn new(line_container_classes: Vec<String>, line_text_classes: Vec<String>) -> Self {
        Self {
            line_container_classes,
            line_text_classes,
        }
    }

    /// Whether the element matches any caption heuristic.
    pub fn is_caption_like(&self, el: &ElementData) -> bool {
        matches!(el.attr("aria-live"), Some("polite" | "assertive"))
            || el.attr("role") == Some("log")
            || (el.attr("role") == Some("region") && el.has_attr("aria-live"))
            || el.has_attr(CAPTION_ATTR)
            || has_caption_class(el)
            || self.is_line_container(el)
            || self.is_line_text(el)
    }

    pub fn is_line_container(&self, el: &ElementData) -> bool {
        self.line_container_classes.iter().any(|c| el.has_class(c))
    }

    pub fn is_line_text(&self, el: &ElementData) -> bool {
        self.line_text_classes.iter().any(|c| el.has_class(c))
    }

    pub fn markers(&self, el: &ElementData) -> CaptionMarkers {
        CaptionMarkers {
            live_region: el.attr("aria-live").is_some_and(|v| !v.is_empty()),
            log_role: el.attr("role") == Some("log"),
            caption_attr: el.has_attr(CAPTION_ATTR),
            caption_class: has_caption_class(el),
        }
    }

    /// Whether the element is independently known to carry captions: it
    /// sits in a `role="log"` region, declares a live region, or carries a
    /// caption attribute or class.
    pub fn is_confirmed_container(&self, doc: &Document, id: NodeId) -> bool {
        let Some(el) = doc.element(id) else {
            return false;
        };
        if doc.closest(id, |e| e.attr("role") == Some("log")).is_some() {
            return true;
        }
        declares_live_region(el) || el.has_attr(CAPTION_ATTR) || has_caption_class(el)
    }
}

impl Default for CaptionHeuristics {
    fn default() -> Self {
        Self::new(
            vec!["nMcdL".to_string()],
            vec!["VbkSUe".to_string(), "ygicle".to_string()],
        )
    }
}

/// Any `aria-live` attribute, whatever its value.
pub fn declares_live_region(el: &ElementData) -> bool {
    el.has_attr("aria-live")
}

fn has_caption_class(el: &ElementData) -> bool {
    let class = el.class_name().to_lowercase();
    class.contains("caption") || class.contains("subtitle")
}
