//! Scroll-into-view dispatch
//!
//! Geometry is delegated to a [`ViewAlignmentCalculator`]: given an element
//! and alignment options it lists every ancestor container that has to move
//! and where to. Each of those moves is clamped and applied like a regular
//! scroll, all at once, and their completions join into one.

use smoothscroll_animation::ValueAnimator;

use crate::clamp::ScrollPosition;
use crate::completion::Completion;
use crate::dispatch::execute;
use crate::dom::Element;
use crate::options::{ScrollIntoViewArg, ViewAlignmentRequest};
use crate::target::ScrollTarget;

/// One container adjustment needed to bring an element into view
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAction {
    pub container: Element,
    pub left: f64,
    pub top: f64,
}

impl ScrollAction {
    pub fn new(container: Element, left: f64, top: f64) -> Self {
        Self {
            container,
            left,
            top,
        }
    }
}

/// Computes the container adjustments for a scroll-into-view
///
/// The returned list is authoritative and applied in full.
pub trait ViewAlignmentCalculator: Send + Sync {
    fn compute(&self, element: &Element, request: &ViewAlignmentRequest) -> Vec<ScrollAction>;
}

impl<F> ViewAlignmentCalculator for F
where
    F: Fn(&Element, &ViewAlignmentRequest) -> Vec<ScrollAction> + Send + Sync,
{
    fn compute(&self, element: &Element, request: &ViewAlignmentRequest) -> Vec<ScrollAction> {
        self(element, request)
    }
}

/// Calculator for hosts without layout information: nothing ever moves
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlignment;

impl ViewAlignmentCalculator for NoAlignment {
    fn compute(&self, _element: &Element, _request: &ViewAlignmentRequest) -> Vec<ScrollAction> {
        Vec::new()
    }
}

/// Bring `element` into view
pub(crate) fn align_into_view(
    animator: &dyn ValueAnimator,
    calculator: &dyn ViewAlignmentCalculator,
    element: &Element,
    arg: &ScrollIntoViewArg,
) -> Completion {
    if !element.is_connected() {
        tracing::debug!("scrollIntoView on detached element, ignoring");
        return Completion::ready();
    }

    let request = arg.request();
    let actions = calculator.compute(element, &request);
    tracing::debug!(containers = actions.len(), ?request, "scrollIntoView");

    Completion::join(actions.into_iter().map(|action| {
        let target = ScrollTarget::for_element(&action.container);
        execute(
            animator,
            &target,
            ScrollPosition::new(Some(action.left), Some(action.top)),
            request.behavior,
        )
    }))
}
