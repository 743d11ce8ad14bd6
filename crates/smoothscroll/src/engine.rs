//! Scroll engine
//!
//! Bundles the two collaborators a scroll needs (an animator for smooth
//! behavior and a calculator for scroll-into-view geometry) and exposes the
//! option-taking operations on top of them.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use smoothscroll_animation::{ImmediateAnimator, ValueAnimator};

use crate::align::{align_into_view, NoAlignment, ViewAlignmentCalculator};
use crate::completion::Completion;
use crate::dispatch::{dispatch, dispatch_value, ScrollOperation};
use crate::dom::{Element, ScrollSurface};
use crate::error::Result;
use crate::options::{ScrollIntoViewArg, ScrollToOptions};

/// Entry point for option-based scrolling
///
/// Cheap to clone; clones share their collaborators.
///
/// # Example
///
/// ```rust
/// use smoothscroll::{
///     Document, ScrollEngine, ScrollMetrics, ScrollSurface, ScrollToOptions, Window,
/// };
/// use smoothscroll_animation::ImmediateAnimator;
///
/// let doc = Document::new();
/// doc.document_element()
///     .set_metrics(ScrollMetrics::from_sizes((2000.0, 2000.0), (1680.0, 800.0)));
///
/// let engine = ScrollEngine::new(ImmediateAnimator);
/// let window: ScrollSurface = Window::new(doc.clone()).into();
/// let _ = engine.scroll_to_options(&window, ScrollToOptions::new().top(100.0));
///
/// assert_eq!(doc.document_element().scroll_top(), 100.0);
/// ```
#[derive(Clone)]
pub struct ScrollEngine {
    animator: Arc<dyn ValueAnimator>,
    aligner: Arc<dyn ViewAlignmentCalculator>,
}

impl ScrollEngine {
    /// Create an engine that animates through `animator`
    ///
    /// Scroll-into-view moves nothing until a calculator is set with
    /// [`ScrollEngine::with_aligner`].
    pub fn new(animator: impl ValueAnimator + 'static) -> Self {
        Self {
            animator: Arc::new(animator),
            aligner: Arc::new(NoAlignment),
        }
    }

    /// Use `aligner` to compute scroll-into-view adjustments
    pub fn with_aligner(mut self, aligner: impl ViewAlignmentCalculator + 'static) -> Self {
        self.aligner = Arc::new(aligner);
        self
    }

    pub fn animator(&self) -> &dyn ValueAnimator {
        self.animator.as_ref()
    }

    /// Run `operation` with a dynamic options argument
    ///
    /// Fails only when `options` is neither nullish nor object-like.
    pub fn dispatch(
        &self,
        operation: ScrollOperation,
        surface: &ScrollSurface,
        options: &Value,
    ) -> Result<Completion> {
        dispatch_value(self.animator(), operation, surface, options)
    }

    /// Run `operation` with typed options
    pub fn dispatch_options(
        &self,
        operation: ScrollOperation,
        surface: &ScrollSurface,
        options: ScrollToOptions,
    ) -> Completion {
        dispatch(self.animator(), operation, surface, &options)
    }

    pub fn scroll(&self, surface: &ScrollSurface, options: &Value) -> Result<Completion> {
        self.dispatch(ScrollOperation::Scroll, surface, options)
    }

    pub fn scroll_to(&self, surface: &ScrollSurface, options: &Value) -> Result<Completion> {
        self.dispatch(ScrollOperation::ScrollTo, surface, options)
    }

    pub fn scroll_by(&self, surface: &ScrollSurface, options: &Value) -> Result<Completion> {
        self.dispatch(ScrollOperation::ScrollBy, surface, options)
    }

    pub fn scroll_options(&self, surface: &ScrollSurface, options: ScrollToOptions) -> Completion {
        self.dispatch_options(ScrollOperation::Scroll, surface, options)
    }

    pub fn scroll_to_options(
        &self,
        surface: &ScrollSurface,
        options: ScrollToOptions,
    ) -> Completion {
        self.dispatch_options(ScrollOperation::ScrollTo, surface, options)
    }

    pub fn scroll_by_options(
        &self,
        surface: &ScrollSurface,
        options: ScrollToOptions,
    ) -> Completion {
        self.dispatch_options(ScrollOperation::ScrollBy, surface, options)
    }

    /// Scroll every container needed to bring `element` into view
    pub fn scroll_into_view(
        &self,
        element: &Element,
        arg: impl Into<ScrollIntoViewArg>,
    ) -> Completion {
        align_into_view(
            self.animator(),
            self.aligner.as_ref(),
            element,
            &arg.into(),
        )
    }
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new(ImmediateAnimator)
    }
}

impl fmt::Debug for ScrollEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::ScrollAction;
    use crate::dom::{Document, ScrollMetrics};
    use crate::options::{ScrollBlock, ViewAlignmentRequest};
    use serde_json::json;
    use smoothscroll_animation::AnimationScheduler;

    fn smooth_div(doc: &Document) -> Element {
        let div = doc.create_element("div");
        div.set_metrics(ScrollMetrics::from_sizes((1000.0, 1000.0), (100.0, 100.0)));
        doc.body().append_child(&div);
        div
    }

    #[test]
    fn test_smooth_sequence_settles_on_each_target() {
        let doc = Document::new();
        let div = smooth_div(&doc);
        let surface: ScrollSurface = div.clone().into();

        let scheduler = AnimationScheduler::new();
        let engine = ScrollEngine::new(scheduler.handle());

        let steps = [
            (json!({"behavior": "smooth", "left": 100, "top": 100}), (100.0, 100.0)),
            (json!({"behavior": "smooth", "left": 50}), (50.0, 100.0)),
            (json!({"behavior": "smooth", "top": 50}), (50.0, 50.0)),
            (json!({"behavior": "smooth", "left": 50, "top": 50}), (50.0, 50.0)),
        ];

        for (options, expected) in steps {
            let completion = engine.scroll_to(&surface, &options).unwrap();
            scheduler.run_until_idle(60, 600);
            pollster::block_on(completion);
            assert_eq!((div.scroll_left(), div.scroll_top()), expected);
        }
    }

    #[test]
    fn test_nan_axis_from_value_is_left_alone() {
        let doc = Document::new();
        let div = smooth_div(&doc);
        div.set_scroll_left(50.0);
        let surface: ScrollSurface = div.clone().into();

        let engine = ScrollEngine::default();
        for options in [
            json!({"left": f64::NAN, "top": 100}),
            json!({"left": null, "top": 100}),
        ] {
            let mut completion = engine.scroll(&surface, &options).unwrap();
            assert!(completion.is_complete());
            assert_eq!((div.scroll_left(), div.scroll_top()), (50.0, 100.0));
        }
    }

    #[test]
    fn test_smooth_scroll_to_current_value_starts_nothing() {
        let doc = Document::new();
        let div = smooth_div(&doc);
        div.set_scroll_left(50.0);

        let scheduler = AnimationScheduler::new();
        let engine = ScrollEngine::new(scheduler.handle());
        let surface: ScrollSurface = div.clone().into();
        let mut completion =
            engine.scroll_to_options(&surface, ScrollToOptions::new().left(50.0).smooth());

        assert_eq!(scheduler.spring_count(), 0);
        assert!(completion.is_complete());
    }

    #[test]
    fn test_overlapping_smooth_scrolls_race_to_last_target() {
        let doc = Document::new();
        let div = smooth_div(&doc);
        let surface: ScrollSurface = div.clone().into();

        let scheduler = AnimationScheduler::new();
        let engine = ScrollEngine::new(scheduler.handle());

        let first = engine.scroll_to_options(&surface, ScrollToOptions::new().top(800.0).smooth());
        scheduler.tick_by(1.0 / 60.0);
        let second =
            engine.scroll_to_options(&surface, ScrollToOptions::new().top(200.0).smooth());

        // The first animation is not cancelled
        assert_eq!(scheduler.spring_count(), 2);

        scheduler.run_until_idle(60, 1200);
        pollster::block_on(Completion::join([first, second]));
        let top = div.scroll_top();
        assert!(top == 800.0 || top == 200.0);
    }

    #[test]
    fn test_scroll_into_view_uses_aligner() {
        let doc = Document::new();
        let div = smooth_div(&doc);
        let item = doc.create_element("p");
        div.append_child(&item);

        let engine = ScrollEngine::default().with_aligner({
            let div = div.clone();
            move |_: &Element, request: &ViewAlignmentRequest| {
                let top = match request.block {
                    ScrollBlock::End => 900.0,
                    _ => 300.0,
                };
                vec![ScrollAction::new(div.clone(), 0.0, top)]
            }
        });

        pollster::block_on(engine.scroll_into_view(&item, true));
        assert_eq!(div.scroll_top(), 300.0);

        pollster::block_on(engine.scroll_into_view(&item, false));
        assert_eq!(div.scroll_top(), 900.0);
    }
}
