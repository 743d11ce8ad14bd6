//! Scroll options and request normalization
//!
//! Callers hand over partial options (every field optional). Each call merges
//! them over fresh defaults into an immutable request; there is no shared
//! default object to mutate.
//!
//! Dynamic host arguments arrive as [`serde_json::Value`]s and are read with
//! the host's coercion rules: arrays count as objects, an absent numeric field
//! is NaN, and NaN on an axis means "leave this axis alone".

use serde::Deserialize;
use serde_json::{Map, Value};

/// Scroll animation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Instant scroll (no animation)
    #[default]
    Auto,
    /// Smooth animated scroll
    Smooth,
}

impl ScrollBehavior {
    /// Read a host behavior string; anything but `"smooth"` is instant
    pub fn from_host_str(value: &str) -> Self {
        if value == "smooth" {
            Self::Smooth
        } else {
            Self::Auto
        }
    }
}

/// Vertical scroll alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    /// Align to top of viewport
    #[default]
    Start,
    /// Align to center of viewport
    Center,
    /// Align to bottom of viewport
    End,
    /// Scroll minimum distance to make visible
    Nearest,
}

/// Horizontal scroll alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollInline {
    /// Align to left of viewport
    Start,
    /// Align to center of viewport
    Center,
    /// Align to right of viewport
    End,
    /// Scroll minimum distance to make visible
    #[default]
    Nearest,
}

fn parse_alignment(value: &str) -> Option<(ScrollBlock, ScrollInline)> {
    match value {
        "start" => Some((ScrollBlock::Start, ScrollInline::Start)),
        "center" => Some((ScrollBlock::Center, ScrollInline::Center)),
        "end" => Some((ScrollBlock::End, ScrollInline::End)),
        "nearest" => Some((ScrollBlock::Nearest, ScrollInline::Nearest)),
        _ => None,
    }
}

/// Host object check: objects and arrays are object-like
pub fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Host truthiness of a value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Host numeric coercion of a value
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [item] if !is_object(item) => match item {
                // `[null]` stringifies to "" and so becomes 0
                Value::Null => 0.0,
                Value::Bool(_) => f64::NAN,
                other => to_number(other),
            },
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts spellings the host does not
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// Treat NaN as an absent axis
fn axis(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Caller-supplied scroll options
///
/// `None` means "not supplied"; `Some(f64::NAN)` is accepted and treated as
/// absent once merged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollToOptions {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub behavior: Option<ScrollBehavior>,
}

impl ScrollToOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn smooth(self) -> Self {
        self.behavior(ScrollBehavior::Smooth)
    }

    /// Read options from a host value
    ///
    /// Returns `None` when the value is not object-like. Absent numeric
    /// fields stay unsupplied; present ones are coerced.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            Value::Array(_) => Some(Self::default()),
            _ => None,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            left: axis_field(map, "left"),
            top: axis_field(map, "top"),
            behavior: map.get("behavior").map(behavior_from_value),
        }
    }
}

/// Read one axis field; `null` stands for `undefined` and is left unsupplied
///
/// `serde_json` has no NaN, so `f64::NAN` and a serialized `None` both
/// arrive as `null`.
fn axis_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(to_number(value)),
    }
}

fn behavior_from_value(value: &Value) -> ScrollBehavior {
    match value {
        Value::String(s) => ScrollBehavior::from_host_str(s),
        _ => ScrollBehavior::Auto,
    }
}

/// A scroll request with defaults filled in
///
/// Axes are absolute offsets once they reach the clamper; `None` means the
/// axis is never touched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollRequest {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    /// Merge caller options over the defaults
    pub fn merged(options: &ScrollToOptions) -> Self {
        let defaults = Self::default();
        Self {
            left: axis(options.left).or(defaults.left),
            top: axis(options.top).or(defaults.top),
            behavior: options.behavior.unwrap_or(defaults.behavior),
        }
    }

    pub fn is_smooth(&self) -> bool {
        self.behavior == ScrollBehavior::Smooth
    }
}

/// Caller-supplied scroll-into-view options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollIntoViewOptions {
    pub behavior: Option<ScrollBehavior>,
    pub block: Option<ScrollBlock>,
    pub inline: Option<ScrollInline>,
}

impl ScrollIntoViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn block(mut self, block: ScrollBlock) -> Self {
        self.block = Some(block);
        self
    }

    pub fn inline(mut self, inline: ScrollInline) -> Self {
        self.inline = Some(inline);
        self
    }

    /// Read options from a host value; `None` when not object-like
    ///
    /// Unknown alignment strings are ignored and keep their default.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Array(_) => return Some(Self::default()),
            _ => return None,
        };
        let alignment = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .and_then(parse_alignment)
        };
        Some(Self {
            behavior: map.get("behavior").map(behavior_from_value),
            block: alignment("block").map(|(block, _)| block),
            inline: alignment("inline").map(|(_, inline)| inline),
        })
    }
}

/// The argument of a scroll-into-view call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ScrollIntoViewArg {
    /// No argument (or a nullish one)
    #[default]
    Absent,
    /// Legacy boolean form
    AlignToTop(bool),
    /// Structured options
    Options(ScrollIntoViewOptions),
}

impl ScrollIntoViewArg {
    /// Merge the argument over the alignment defaults
    pub fn request(&self) -> ViewAlignmentRequest {
        match self {
            Self::Absent | Self::AlignToTop(true) => ViewAlignmentRequest::default(),
            Self::AlignToTop(false) => {
                ViewAlignmentRequest::merged(&ScrollIntoViewOptions::new().block(ScrollBlock::End))
            }
            Self::Options(options) => ViewAlignmentRequest::merged(options),
        }
    }
}

impl From<bool> for ScrollIntoViewArg {
    fn from(align_to_top: bool) -> Self {
        Self::AlignToTop(align_to_top)
    }
}

impl From<Option<bool>> for ScrollIntoViewArg {
    fn from(align_to_top: Option<bool>) -> Self {
        align_to_top.map_or(Self::Absent, Self::AlignToTop)
    }
}

impl From<ScrollIntoViewOptions> for ScrollIntoViewArg {
    fn from(options: ScrollIntoViewOptions) -> Self {
        Self::Options(options)
    }
}

/// A scroll-into-view request with defaults filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAlignmentRequest {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
    pub inline: ScrollInline,
}

impl Default for ViewAlignmentRequest {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::Auto,
            block: ScrollBlock::Start,
            inline: ScrollInline::Nearest,
        }
    }
}

impl ViewAlignmentRequest {
    /// Merge caller options over the defaults
    pub fn merged(options: &ScrollIntoViewOptions) -> Self {
        let defaults = Self::default();
        Self {
            behavior: options.behavior.unwrap_or(defaults.behavior),
            block: options.block.unwrap_or(defaults.block),
            inline: options.inline.unwrap_or(defaults.inline),
        }
    }
}
