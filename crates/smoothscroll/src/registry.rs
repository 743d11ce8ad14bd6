//! Operation registry
//!
//! The host's table of scroll operations, keyed by surface and name. Slots
//! are swapped through [`OperationRegistry::install`], which hands back the
//! previous occupant, and put back with [`OperationRegistry::restore`].
//! Nothing else mutates the table.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::completion::Completion;
use crate::dom::{ScrollSurface, SurfaceKind};
use crate::error::Result;

/// Name of a scroll-related host operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationName {
    Scroll,
    ScrollBy,
    ScrollTo,
    ScrollIntoView,
}

impl OperationName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::ScrollBy => "scrollBy",
            Self::ScrollTo => "scrollTo",
            Self::ScrollIntoView => "scrollIntoView",
        }
    }
}

/// A slot in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub surface: SurfaceKind,
    pub name: OperationName,
}

impl OperationKey {
    pub fn new(surface: SurfaceKind, name: OperationName) -> Self {
        Self { surface, name }
    }

    pub fn window(name: OperationName) -> Self {
        Self::new(SurfaceKind::Window, name)
    }

    pub fn element(name: OperationName) -> Self {
        Self::new(SurfaceKind::Element, name)
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.surface.interface_name(), self.name.as_str())
    }
}

/// What an operation returns: a completion for structured calls, nothing for legacy ones
pub type OperationResult = Result<Option<Completion>>;

type OperationFn = dyn Fn(&ScrollSurface, &[Value]) -> OperationResult + Send + Sync;

/// Where an operation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOrigin {
    /// Provided by the host
    Host,
    /// A smooth-scroll shim
    Shim,
}

/// A callable operation with identity
///
/// Clones share identity; compare with [`Operation::same`].
#[derive(Clone)]
pub struct Operation {
    func: Arc<OperationFn>,
    origin: OperationOrigin,
}

impl Operation {
    /// Wrap a host-provided operation
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&ScrollSurface, &[Value]) -> OperationResult + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            origin: OperationOrigin::Host,
        }
    }

    pub(crate) fn shim<F>(func: F) -> Self
    where
        F: Fn(&ScrollSurface, &[Value]) -> OperationResult + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            origin: OperationOrigin::Shim,
        }
    }

    pub fn call(&self, surface: &ScrollSurface, args: &[Value]) -> OperationResult {
        (self.func)(surface, args)
    }

    pub fn origin(&self) -> OperationOrigin {
        self.origin
    }

    /// Whether both handles are the very same operation
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("origin", &self.origin)
            .field("ptr", &Arc::as_ptr(&self.func).cast::<()>())
            .finish()
    }
}

#[derive(Default)]
struct RegistryInner {
    slots: FxHashMap<OperationKey, Operation>,
    supports_scroll_behavior: bool,
}

/// The host's table of scroll operations
///
/// Cloning shares the same table.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl OperationRegistry {
    /// An empty table on a host without native smooth scrolling
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the host scrolls smoothly on its own
    pub fn supports_scroll_behavior(&self) -> bool {
        self.lock().supports_scroll_behavior
    }

    pub fn set_supports_scroll_behavior(&self, supported: bool) {
        self.lock().supports_scroll_behavior = supported;
    }

    /// The operation currently in `key`, if any
    pub fn get(&self, key: OperationKey) -> Option<Operation> {
        self.lock().slots.get(&key).cloned()
    }

    /// Put `operation` into `key`, returning the previous occupant
    pub fn install(&self, key: OperationKey, operation: Operation) -> Option<Operation> {
        self.lock().slots.insert(key, operation)
    }

    /// Put `previous` back into `key`; `None` empties the slot
    pub fn restore(&self, key: OperationKey, previous: Option<Operation>) {
        let mut inner = self.lock();
        match previous {
            Some(operation) => {
                inner.slots.insert(key, operation);
            }
            None => {
                inner.slots.remove(&key);
            }
        }
    }

    /// Call the operation named `name` on `surface`
    ///
    /// An empty slot does nothing. The table is not locked while the
    /// operation runs.
    pub fn invoke(
        &self,
        name: OperationName,
        surface: &ScrollSurface,
        args: &[Value],
    ) -> OperationResult {
        let key = OperationKey::new(surface.kind(), name);
        let Some(operation) = self.get(key) else {
            tracing::debug!(%key, "no operation installed");
            return Ok(None);
        };
        operation.call(surface, args)
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("OperationRegistry")
            .field("slots", &inner.slots.len())
            .field("supports_scroll_behavior", &inner.supports_scroll_behavior)
            .finish()
    }
}
