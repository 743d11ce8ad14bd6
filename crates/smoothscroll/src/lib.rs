//! Smooth Scroll
//!
//! Options-aware `scroll`, `scrollTo`, `scrollBy` and `scrollIntoView` for
//! hosts whose own scroll operations only understand `(x, y)`.
//!
//! # Features
//!
//! - **Structured Options**: `{left, top, behavior}` and
//!   `{behavior, block, inline}` merged over fresh defaults on every call
//! - **Bounds Clamping**: destinations clamped to the container's scrollable
//!   range, with the root scroller measured against the viewport
//! - **Smooth Behavior**: both axes animated concurrently through a
//!   [`smoothscroll_animation::ValueAnimator`], joined into one [`Completion`]
//! - **Scroll Into View**: container moves computed by a pluggable
//!   [`ViewAlignmentCalculator`] and applied together
//! - **Reversible Install**: shims swapped into an [`OperationRegistry`] with
//!   every captured original restored by [`Uninstall::uninstall`]
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use smoothscroll::{install, Document, InstallOptions, OperationName, OperationRegistry};
//! use smoothscroll::{ScrollEngine, ScrollMetrics, ScrollSurface, Window};
//!
//! let doc = Document::new();
//! doc.document_element()
//!     .set_metrics(ScrollMetrics::from_sizes((2000.0, 2000.0), (1680.0, 800.0)));
//! let window: ScrollSurface = Window::new(doc.clone()).into();
//!
//! let registry = OperationRegistry::new();
//! let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::default());
//!
//! registry
//!     .invoke(OperationName::ScrollBy, &window, &[json!({"top": 300})])
//!     .unwrap();
//! assert_eq!(doc.document_element().scroll_top(), 300.0);
//!
//! uninstall.uninstall();
//! ```

pub mod align;
pub mod call;
pub mod clamp;
pub mod completion;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod dom;
pub mod engine;
pub mod error;
pub mod install;
pub mod options;
pub mod registry;
pub mod target;

pub use align::{NoAlignment, ScrollAction, ViewAlignmentCalculator};
pub use call::{IntoViewCall, ScrollCall};
pub use clamp::{clamp, max_scroll, ScrollPosition};
pub use completion::{Completion, CompletionSignal};
pub use config::EngineConfig;
pub use coordinator::{animate_axis, smooth_scroll};
pub use dispatch::ScrollOperation;
pub use dom::{Axis, Document, Element, NodeId, ScrollMetrics, ScrollSurface, SurfaceKind, Window};
pub use engine::ScrollEngine;
pub use error::{ConfigError, Result, ScrollError};
pub use install::{install, InstallOptions, Restoration, Uninstall};
pub use options::{
    ScrollBehavior, ScrollBlock, ScrollInline, ScrollIntoViewArg, ScrollIntoViewOptions,
    ScrollRequest, ScrollToOptions, ViewAlignmentRequest,
};
pub use registry::{
    Operation, OperationKey, OperationName, OperationOrigin, OperationRegistry, OperationResult,
};
pub use target::ScrollTarget;
