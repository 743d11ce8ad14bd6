//! Scroll target resolution
//!
//! Turns the receiver of an operation into the concrete container whose
//! offsets get written. A window always resolves to its document's root
//! scroller.

use crate::dom::{Element, ScrollSurface};

/// The concrete container a scroll request is applied to
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTarget {
    element: Element,
    is_root: bool,
}

impl ScrollTarget {
    /// Resolve the receiver of an operation
    pub fn resolve(surface: &ScrollSurface) -> Self {
        match surface {
            ScrollSurface::Window(window) => Self {
                element: window.document().root_scroller(),
                is_root: true,
            },
            ScrollSurface::Element(element) => Self::for_element(element),
        }
    }

    /// Wrap an element, noting whether it is its document's root scroller
    pub fn for_element(element: &Element) -> Self {
        let is_root = element.owner_document().root_scroller() == *element;
        Self {
            element: element.clone(),
            is_root,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Whether this is the document's root scrolling surface
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the container has been removed from the active tree
    pub fn is_detached(&self) -> bool {
        !self.element.is_connected()
    }
}
