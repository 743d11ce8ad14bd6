//! Scroll dispatch
//!
//! One call of `scroll`, `scrollTo` or `scrollBy` moves through these steps:
//!
//! 1. nullish options: no-op
//! 2. options that are not object-like: rejected before anything is touched
//! 3. receiver resolved to a concrete container; detached: no-op
//! 4. options merged over defaults
//! 5. `scrollBy` turns its deltas into absolute offsets
//! 6. destination clamped
//! 7. instant write, or animation for `behavior: "smooth"`

use serde_json::Value;
use smoothscroll_animation::ValueAnimator;

use crate::clamp::{clamp, ScrollPosition};
use crate::completion::Completion;
use crate::coordinator::smooth_scroll;
use crate::dom::ScrollSurface;
use crate::error::{Result, ScrollError};
use crate::options::{ScrollBehavior, ScrollRequest, ScrollToOptions};
use crate::target::ScrollTarget;

/// The three option-taking scroll operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollOperation {
    /// `scroll`: absolute
    Scroll,
    /// `scrollTo`: absolute
    ScrollTo,
    /// `scrollBy`: relative to the current offsets
    ScrollBy,
}

impl ScrollOperation {
    /// Host method name, as used in error messages
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::ScrollTo => "scrollTo",
            Self::ScrollBy => "scrollBy",
        }
    }

    pub fn is_relative(self) -> bool {
        self == Self::ScrollBy
    }
}

/// Dispatch a call carrying a single dynamic options argument
pub(crate) fn dispatch_value(
    animator: &dyn ValueAnimator,
    operation: ScrollOperation,
    surface: &ScrollSurface,
    options: &Value,
) -> Result<Completion> {
    if options.is_null() {
        tracing::debug!(method = operation.method_name(), "nullish options, nothing to do");
        return Ok(Completion::ready());
    }

    let options = ScrollToOptions::from_value(options).ok_or_else(|| {
        ScrollError::invalid_argument(operation.method_name(), surface.interface_name())
    })?;

    Ok(dispatch(animator, operation, surface, &options))
}

/// Dispatch a call with already-typed options
pub(crate) fn dispatch(
    animator: &dyn ValueAnimator,
    operation: ScrollOperation,
    surface: &ScrollSurface,
    options: &ScrollToOptions,
) -> Completion {
    let target = ScrollTarget::resolve(surface);
    if target.is_detached() {
        tracing::debug!(
            method = operation.method_name(),
            "target detached from document, ignoring"
        );
        return Completion::ready();
    }

    let request = ScrollRequest::merged(options);
    let element = target.element();
    let position = if operation.is_relative() {
        ScrollPosition::new(
            request.left.map(|dx| dx + element.scroll_left()),
            request.top.map(|dy| dy + element.scroll_top()),
        )
    } else {
        ScrollPosition::new(request.left, request.top)
    };

    execute(animator, &target, position, request.behavior)
}

/// Clamp a destination and apply it instantly or animated
pub(crate) fn execute(
    animator: &dyn ValueAnimator,
    target: &ScrollTarget,
    position: ScrollPosition,
    behavior: ScrollBehavior,
) -> Completion {
    let ScrollPosition { left, top } = clamp(target, position);
    let element = target.element();

    match behavior {
        ScrollBehavior::Smooth => {
            tracing::debug!(?left, ?top, "animated scroll");
            smooth_scroll(animator, element, left, top)
        }
        ScrollBehavior::Auto => {
            tracing::debug!(?left, ?top, "instant scroll");
            if let Some(left) = left {
                element.set_scroll_left(left);
            }
            if let Some(top) = top {
                element.set_scroll_top(top);
            }
            Completion::ready()
        }
    }
}
