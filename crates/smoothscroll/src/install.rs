//! Reversible installation of the smooth-scroll shims
//!
//! [`install`] replaces the seven scroll slots of an [`OperationRegistry`]
//! with shims that understand structured options. Whatever occupied a slot
//! before (a host operation, another layer, or nothing) is captured and
//! handed back by the returned [`Uninstall`].
//!
//! A shim routes a single-argument call through the [`ScrollEngine`]. Every
//! other call shape belongs to the captured operation, or to a numeric
//! fallback when the slot was empty.

use serde::Deserialize;
use serde_json::Value;

use crate::call::{IntoViewCall, ScrollCall};
use crate::dispatch::ScrollOperation;
use crate::dom::{ScrollSurface, SurfaceKind};
use crate::engine::ScrollEngine;
use crate::options::ScrollToOptions;
use crate::registry::{
    Operation, OperationKey, OperationName, OperationOrigin, OperationRegistry, OperationResult,
};
use crate::target::ScrollTarget;

/// Installation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct InstallOptions {
    /// Install even when the host scrolls smoothly on its own
    pub force: bool,
}

impl InstallOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Puts one captured operation back into its slot
///
/// Restoring twice just writes the same operation again.
#[derive(Debug, Clone)]
pub struct Restoration {
    registry: OperationRegistry,
    key: OperationKey,
    original: Option<Operation>,
}

impl Restoration {
    pub fn key(&self) -> OperationKey {
        self.key
    }

    /// The operation that occupied the slot before installation
    pub fn original(&self) -> Option<&Operation> {
        self.original.as_ref()
    }

    pub fn restore(&self) {
        tracing::trace!(key = %self.key, "restoring operation");
        self.registry.restore(self.key, self.original.clone());
    }
}

/// Undoes an [`install`]
#[derive(Debug, Default)]
#[must_use = "dropping an Uninstall leaves the shims installed for good"]
pub struct Uninstall {
    restorations: Vec<Restoration>,
}

impl Uninstall {
    pub fn restorations(&self) -> &[Restoration] {
        &self.restorations
    }

    pub fn is_empty(&self) -> bool {
        self.restorations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.restorations.len()
    }

    /// Run every restoration once
    pub fn uninstall(self) {
        for restoration in &self.restorations {
            restoration.restore();
        }
        tracing::debug!(restored = self.restorations.len(), "smooth-scroll shims removed");
    }
}

const SCROLL_OPERATIONS: [OperationName; 3] = [
    OperationName::Scroll,
    OperationName::ScrollBy,
    OperationName::ScrollTo,
];

/// Install the smooth-scroll shims into `registry`
///
/// Nothing is replaced when the host already supports scroll behavior,
/// unless `options.force` is set. Installing twice without uninstalling in
/// between captures the first layer as the "original".
pub fn install(
    registry: &OperationRegistry,
    engine: &ScrollEngine,
    options: InstallOptions,
) -> Uninstall {
    if !options.force && registry.supports_scroll_behavior() {
        tracing::debug!("host supports scroll behavior natively, not installing");
        return Uninstall::default();
    }

    let mut restorations = Vec::with_capacity(7);
    for surface in [SurfaceKind::Window, SurfaceKind::Element] {
        for name in SCROLL_OPERATIONS {
            let key = OperationKey::new(surface, name);
            restorations.push(replace(registry, key, |original| {
                scroll_shim(engine.clone(), name, original)
            }));
        }
    }

    let key = OperationKey::element(OperationName::ScrollIntoView);
    restorations.push(replace(registry, key, |original| {
        scroll_into_view_shim(engine.clone(), original)
    }));

    tracing::debug!(
        installed = restorations.len(),
        force = options.force,
        "smooth-scroll shims installed"
    );
    Uninstall { restorations }
}

fn replace(
    registry: &OperationRegistry,
    key: OperationKey,
    make_shim: impl FnOnce(Option<Operation>) -> Operation,
) -> Restoration {
    let original = registry.get(key);
    if let Some(op) = &original {
        if op.origin() == OperationOrigin::Shim {
            tracing::warn!(%key, "installing over an existing smooth-scroll shim");
        }
    }

    registry.install(key, make_shim(original.clone()));
    Restoration {
        registry: registry.clone(),
        key,
        original,
    }
}

fn scroll_operation(name: OperationName) -> ScrollOperation {
    match name {
        OperationName::ScrollBy => ScrollOperation::ScrollBy,
        OperationName::ScrollTo => ScrollOperation::ScrollTo,
        _ => ScrollOperation::Scroll,
    }
}

fn scroll_shim(engine: ScrollEngine, name: OperationName, original: Option<Operation>) -> Operation {
    let operation = scroll_operation(name);
    Operation::shim(move |surface: &ScrollSurface, args: &[Value]| -> OperationResult {
        let (x, y) = match (ScrollCall::classify(args), &original) {
            (ScrollCall::Options(options), _) => {
                return engine.dispatch(operation, surface, &options).map(Some);
            }
            (_, Some(original)) => return original.call(surface, args),
            (ScrollCall::LegacyAxisPair(x, y), None) => (x, y),
            (ScrollCall::LegacyNone, None) => (f64::NAN, f64::NAN),
        };
        let _ = engine.dispatch_options(operation, surface, legacy_options(operation, x, y));
        Ok(None)
    })
}

/// Options for a legacy `(x, y)` call on a slot without an original
///
/// Absolute calls treat a non-number as 0. Relative calls leave that axis
/// alone.
fn legacy_options(operation: ScrollOperation, x: f64, y: f64) -> ScrollToOptions {
    if operation.is_relative() {
        ScrollToOptions::new().left(x).top(y)
    } else {
        ScrollToOptions::new().left(or_zero(x)).top(or_zero(y))
    }
}

fn or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

fn scroll_into_view_shim(engine: ScrollEngine, original: Option<Operation>) -> Operation {
    Operation::shim(move |surface: &ScrollSurface, args: &[Value]| -> OperationResult {
        let target = ScrollTarget::resolve(surface);
        match IntoViewCall::classify(args) {
            IntoViewCall::Options(options) => {
                Ok(Some(engine.scroll_into_view(target.element(), options)))
            }
            IntoViewCall::Legacy(arg) => match &original {
                Some(original) => original.call(surface, args),
                None => {
                    let _ = engine.scroll_into_view(target.element(), arg);
                    Ok(None)
                }
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ScrollMetrics, Window};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn document() -> Document {
        let doc = Document::new();
        doc.document_element().set_metrics(ScrollMetrics::from_sizes(
            (2000.0, 2000.0),
            (1680.0, 800.0),
        ));
        doc
    }

    fn all_keys() -> Vec<OperationKey> {
        let mut keys = Vec::new();
        for surface in [SurfaceKind::Window, SurfaceKind::Element] {
            for name in SCROLL_OPERATIONS {
                keys.push(OperationKey::new(surface, name));
            }
        }
        keys.push(OperationKey::element(OperationName::ScrollIntoView));
        keys
    }

    #[test]
    fn test_installs_seven_slots() {
        let registry = OperationRegistry::new();
        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::default());

        assert_eq!(uninstall.len(), 7);
        for key in all_keys() {
            let op = registry.get(key).unwrap();
            assert_eq!(op.origin(), OperationOrigin::Shim);
        }
        assert!(registry
            .get(OperationKey::window(OperationName::ScrollIntoView))
            .is_none());

        uninstall.uninstall();
        for key in all_keys() {
            assert!(registry.get(key).is_none());
        }
    }

    #[test]
    fn test_native_support_skips_unless_forced() {
        let registry = OperationRegistry::new();
        registry.set_supports_scroll_behavior(true);
        let engine = ScrollEngine::default();

        let uninstall = install(&registry, &engine, InstallOptions::default());
        assert!(uninstall.is_empty());
        assert!(registry.get(OperationKey::window(OperationName::Scroll)).is_none());

        let uninstall = install(&registry, &engine, InstallOptions::forced());
        assert_eq!(uninstall.len(), 7);
        uninstall.uninstall();
    }

    #[test]
    fn test_restoration_is_repeatable() {
        let registry = OperationRegistry::new();
        let native = Operation::new(|_, _| Ok(None));
        let key = OperationKey::element(OperationName::ScrollTo);
        registry.install(key, native.clone());

        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::forced());
        let restoration = uninstall
            .restorations()
            .iter()
            .find(|r| r.key() == key)
            .cloned()
            .unwrap();
        assert!(restoration.original().unwrap().same(&native));

        restoration.restore();
        restoration.restore();
        assert!(registry.get(key).unwrap().same(&native));
        uninstall.uninstall();
        assert!(registry.get(key).unwrap().same(&native));
    }

    #[test]
    fn test_legacy_calls_delegate_to_original() {
        let registry = OperationRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = OperationKey::element(OperationName::ScrollTo);
        registry.install(
            key,
            Operation::new({
                let calls = Arc::clone(&calls);
                move |_, args| {
                    assert_eq!(args.len(), 2);
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                }
            }),
        );

        let doc = document();
        let surface: ScrollSurface = doc.document_element().into();
        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::forced());

        registry
            .invoke(OperationName::ScrollTo, &surface, &[json!(10), json!(10)])
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(doc.document_element().scroll_left(), 0.0);

        // Structured calls never reach the original
        registry
            .invoke(OperationName::ScrollTo, &surface, &[json!({"left": 10})])
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(doc.document_element().scroll_left(), 10.0);

        uninstall.uninstall();
    }

    #[test]
    fn test_legacy_fallbacks_without_original() {
        let registry = OperationRegistry::new();
        let doc = document();
        let window: ScrollSurface = Window::new(doc.clone()).into();
        let html = doc.document_element();
        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::forced());

        registry
            .invoke(OperationName::ScrollTo, &window, &[json!(50), json!(60)])
            .unwrap();
        assert_eq!((html.scroll_left(), html.scroll_top()), (50.0, 60.0));

        // Junk coerces to 0 on absolute calls
        registry
            .invoke(OperationName::Scroll, &window, &[json!("junk"), json!(70)])
            .unwrap();
        assert_eq!((html.scroll_left(), html.scroll_top()), (0.0, 70.0));

        // ...and leaves the axis alone on relative calls
        registry
            .invoke(OperationName::ScrollBy, &window, &[json!("junk"), json!(5)])
            .unwrap();
        assert_eq!((html.scroll_left(), html.scroll_top()), (0.0, 75.0));

        // No arguments: scroll to the origin, scroll by nothing
        registry
            .invoke(OperationName::ScrollBy, &window, &[])
            .unwrap();
        assert_eq!((html.scroll_left(), html.scroll_top()), (0.0, 75.0));
        registry.invoke(OperationName::ScrollTo, &window, &[]).unwrap();
        assert_eq!((html.scroll_left(), html.scroll_top()), (0.0, 0.0));

        uninstall.uninstall();
    }

    #[test]
    fn test_structured_call_reports_its_method() {
        let registry = OperationRegistry::new();
        let doc = document();
        let window: ScrollSurface = Window::new(doc.clone()).into();
        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::forced());

        let err = registry
            .invoke(OperationName::ScrollBy, &window, &[json!(1)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to execute 'scrollBy' on 'Window': parameter 1 ('options') is not an object."
        );

        let result = registry.invoke(OperationName::Scroll, &window, &[json!({"top": 5})]);
        assert!(matches!(result, Ok(Some(_))));

        uninstall.uninstall();
    }

    #[test]
    fn test_scroll_into_view_legacy_delegates_to_original() {
        let registry = OperationRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = OperationKey::element(OperationName::ScrollIntoView);
        registry.install(
            key,
            Operation::new({
                let calls = Arc::clone(&calls);
                move |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                }
            }),
        );

        let doc = document();
        let surface: ScrollSurface = doc.body().into();
        let uninstall = install(&registry, &ScrollEngine::default(), InstallOptions::forced());

        for args in [vec![], vec![json!(true)], vec![json!(0)], vec![json!(null)]] {
            let result = registry.invoke(OperationName::ScrollIntoView, &surface, &args);
            assert!(matches!(result, Ok(None)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let result = registry.invoke(
            OperationName::ScrollIntoView,
            &surface,
            &[json!({"block": "center"})],
        );
        assert!(matches!(result, Ok(Some(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        uninstall.uninstall();
    }
}
