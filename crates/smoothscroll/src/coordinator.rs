//! Animated scrolling
//!
//! Runs one value animation per axis of a container and joins their
//! completions. Axes animate concurrently; there is no cancellation, so a
//! second animation on a busy axis races the first until both reach rest.

use smoothscroll_animation::ValueAnimator;

use crate::completion::Completion;
use crate::dom::{Axis, Element};

/// Animate a single number from `from` to `to`, writing every value
///
/// The returned completion resolves exactly once, when the animator stops.
pub fn animate_axis<F>(animator: &dyn ValueAnimator, from: f64, to: f64, write: F) -> Completion
where
    F: FnMut(f64) + Send + 'static,
{
    let (signal, completion) = Completion::pending();
    animator.start(
        from,
        to,
        Box::new(write),
        Box::new(move || signal.complete()),
    );
    completion
}

fn scroll_axis(
    animator: &dyn ValueAnimator,
    element: &Element,
    axis: Axis,
    target: Option<f64>,
) -> Completion {
    let Some(target) = target else {
        return Completion::ready();
    };

    let start = element.scroll_offset(axis);
    if start == target {
        tracing::trace!(?axis, target, "axis already in place");
        return Completion::ready();
    }

    let element = element.clone();
    animate_axis(animator, start, target, move |value| {
        element.set_scroll_offset(axis, value);
    })
}

/// Smoothly scroll `element` towards `left`/`top`
///
/// An absent axis, or one already at its target, starts no animation.
pub fn smooth_scroll(
    animator: &dyn ValueAnimator,
    element: &Element,
    left: Option<f64>,
    top: Option<f64>,
) -> Completion {
    let horizontal = scroll_axis(animator, element, Axis::Horizontal, left);
    let vertical = scroll_axis(animator, element, Axis::Vertical, top);
    Completion::join([horizontal, vertical])
}
