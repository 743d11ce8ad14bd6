//! Host element tree
//!
//! A minimal live model of the scrollable containers a document exposes.
//! Nodes live in a slot map owned by the [`Document`]; [`Element`] and
//! [`Window`] are cheap handles into it. The engine only ever reads geometry
//! from these handles and writes their two scroll-offset fields.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier of a node inside its document
    pub struct NodeId;
}

/// One scroll axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `scroll_left`
    Horizontal,
    /// `scroll_top`
    Vertical,
}

/// Content and viewport sizes of a container
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Build metrics from a `(width, height)` content size and viewport size
    pub fn from_sizes(content: (f64, f64), client: (f64, f64)) -> Self {
        Self {
            scroll_width: content.0,
            scroll_height: content.1,
            client_width: client.0,
            client_height: client.1,
        }
    }
}

#[derive(Debug)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    metrics: ScrollMetrics,
    scroll_left: f64,
    scroll_top: f64,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            metrics: ScrollMetrics::default(),
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }
}

struct DocumentInner {
    nodes: SlotMap<NodeId, Node>,
    document_element: NodeId,
    body: NodeId,
    scrolling_element: Option<NodeId>,
}

impl DocumentInner {
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&child| child != id);
        }
    }
}

/// A document: the owner of an element tree
///
/// Cloning shares the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

impl Document {
    /// Create a document with an `html` root and a `body` child
    ///
    /// The root element doubles as the scrolling element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let document_element = nodes.insert(Node::new("html"));
        let body = nodes.insert(Node::new("body"));
        nodes[body].parent = Some(document_element);
        nodes[document_element].children.push(body);

        Self {
            inner: Arc::new(Mutex::new(DocumentInner {
                nodes,
                document_element,
                body,
                scrolling_element: Some(document_element),
            })),
        }
    }

    /// Create a document that does not report a scrolling element
    pub fn without_scrolling_element() -> Self {
        let document = Self::new();
        document.set_scrolling_element(None);
        document
    }

    fn lock(&self) -> MutexGuard<'_, DocumentInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn element(&self, id: NodeId) -> Element {
        Element {
            document: self.clone(),
            id,
        }
    }

    /// The root element of the tree
    pub fn document_element(&self) -> Element {
        let id = self.lock().document_element;
        self.element(id)
    }

    pub fn body(&self) -> Element {
        let id = self.lock().body;
        self.element(id)
    }

    /// The element the host reports as its scrolling element, if any
    pub fn scrolling_element(&self) -> Option<Element> {
        let id = self.lock().scrolling_element?;
        Some(self.element(id))
    }

    pub fn set_scrolling_element(&self, element: Option<&Element>) {
        self.lock().scrolling_element = element.map(|e| e.id);
    }

    /// The element whose offsets represent the whole document's scroll position
    ///
    /// Prefers the scrolling element and falls back to the root element.
    pub fn root_scroller(&self) -> Element {
        let inner = self.lock();
        let id = inner.scrolling_element.unwrap_or(inner.document_element);
        drop(inner);
        self.element(id)
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.lock().nodes.insert(Node::new(tag));
        self.element(id)
    }

    /// Check whether two handles refer to the same document
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.lock().nodes.len())
            .finish()
    }
}

/// Handle to an element of a [`Document`]
#[derive(Clone)]
pub struct Element {
    document: Document,
    id: NodeId,
}

impl Element {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn owner_document(&self) -> &Document {
        &self.document
    }

    pub fn tag(&self) -> String {
        self.read(|n| n.tag.clone()).unwrap_or_default()
    }

    fn read<R>(&self, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.document.lock().nodes.get(self.id).map(f)
    }

    fn write(&self, f: impl FnOnce(&mut Node)) {
        if let Some(node) = self.document.lock().nodes.get_mut(self.id) {
            f(node);
        }
    }

    pub fn scroll_left(&self) -> f64 {
        self.read(|n| n.scroll_left).unwrap_or_default()
    }

    pub fn scroll_top(&self) -> f64 {
        self.read(|n| n.scroll_top).unwrap_or_default()
    }

    /// Write the horizontal offset verbatim (no clamping)
    pub fn set_scroll_left(&self, value: f64) {
        self.write(|n| n.scroll_left = value);
    }

    /// Write the vertical offset verbatim (no clamping)
    pub fn set_scroll_top(&self, value: f64) {
        self.write(|n| n.scroll_top = value);
    }

    pub fn scroll_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.scroll_left(),
            Axis::Vertical => self.scroll_top(),
        }
    }

    pub fn set_scroll_offset(&self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.set_scroll_left(value),
            Axis::Vertical => self.set_scroll_top(value),
        }
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.read(|n| n.metrics).unwrap_or_default()
    }

    pub fn set_metrics(&self, metrics: ScrollMetrics) {
        self.write(|n| n.metrics = metrics);
    }

    pub fn scroll_width(&self) -> f64 {
        self.metrics().scroll_width
    }

    pub fn scroll_height(&self) -> f64 {
        self.metrics().scroll_height
    }

    pub fn client_width(&self) -> f64 {
        self.metrics().client_width
    }

    pub fn client_height(&self) -> f64 {
        self.metrics().client_height
    }

    pub fn parent(&self) -> Option<Element> {
        let parent = self.read(|n| n.parent).flatten()?;
        Some(self.document.element(parent))
    }

    /// Append `child` as the last child of this element
    ///
    /// The child is first removed from its current parent. Appending an
    /// ancestor (or an element of another document) is ignored.
    pub fn append_child(&self, child: &Element) {
        if !self.document.ptr_eq(&child.document) {
            tracing::warn!("append_child across documents ignored");
            return;
        }

        let mut inner = self.document.lock();
        if inner.contains(child.id, self.id) {
            tracing::warn!("append_child would create a cycle, ignored");
            return;
        }
        inner.detach(child.id);
        if let Some(node) = inner.nodes.get_mut(child.id) {
            node.parent = Some(self.id);
        }
        if let Some(parent) = inner.nodes.get_mut(self.id) {
            parent.children.push(child.id);
        }
    }

    /// Detach this element from its parent
    pub fn remove(&self) {
        self.document.lock().detach(self.id);
    }

    /// Check whether `other` is this element or one of its descendants
    pub fn contains(&self, other: &Element) -> bool {
        self.document.ptr_eq(&other.document) && self.document.lock().contains(self.id, other.id)
    }

    /// Check whether this element is part of its document's active tree
    pub fn is_connected(&self) -> bool {
        let inner = self.document.lock();
        inner.contains(inner.document_element, self.id)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.document.ptr_eq(&other.document)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}

/// A window-like object: the logical scroll target for a whole document
#[derive(Clone, Debug)]
pub struct Window {
    document: Document,
}

impl Window {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Which kind of surface an operation is installed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Window,
    Element,
}

impl SurfaceKind {
    /// Interface name used in host error messages
    pub fn interface_name(self) -> &'static str {
        match self {
            Self::Window => "Window",
            Self::Element => "Element",
        }
    }
}

/// The receiver of a scroll operation
#[derive(Clone, Debug)]
pub enum ScrollSurface {
    Window(Window),
    Element(Element),
}

impl ScrollSurface {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::Window(_) => SurfaceKind::Window,
            Self::Element(_) => SurfaceKind::Element,
        }
    }

    pub fn interface_name(&self) -> &'static str {
        self.kind().interface_name()
    }
}

impl From<Window> for ScrollSurface {
    fn from(window: Window) -> Self {
        Self::Window(window)
    }
}

impl From<Element> for ScrollSurface {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&Window> for ScrollSurface {
    fn from(window: &Window) -> Self {
        Self::Window(window.clone())
    }
}

impl From<&Element> for ScrollSurface {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}
