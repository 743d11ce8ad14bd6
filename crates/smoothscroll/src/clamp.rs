//! Bounds clamping
//!
//! Limits a requested destination to `[0, max]` per axis, where `max` is the
//! content size minus the visible viewport size. Absent axes pass through.

use crate::target::ScrollTarget;

/// A destination in absolute offsets; `None` axes are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl ScrollPosition {
    pub fn new(left: Option<f64>, top: Option<f64>) -> Self {
        Self { left, top }
    }
}

/// Maximum scroll offsets `(left, top)` of a target
///
/// For the root scroller the viewport comes from the document's root
/// element, since some hosts misreport it on the scrolling element itself.
/// The result may be negative when content is smaller than the viewport.
pub fn max_scroll(target: &ScrollTarget) -> (f64, f64) {
    let element = target.element();
    let content = element.metrics();
    let viewport = if target.is_root() {
        element.owner_document().document_element().metrics()
    } else {
        content
    };

    (
        content.scroll_width - viewport.client_width,
        content.scroll_height - viewport.client_height,
    )
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    // Not f64::clamp: max can be below zero, and then max wins
    value.max(0.0).min(max)
}

/// Clamp a destination into the scrollable bounds of `target`
pub fn clamp(target: &ScrollTarget, position: ScrollPosition) -> ScrollPosition {
    let (max_left, max_top) = max_scroll(target);
    ScrollPosition {
        left: position.left.map(|left| clamp_axis(left, max_left)),
        top: position.top.map(|top| clamp_axis(top, max_top)),
    }
}
