//! Call-shape classification
//!
//! Installed operations receive raw positional arguments. They are sorted
//! into call shapes once, up front, instead of sniffing arity at every site.

use serde_json::Value;

use crate::options::{is_object, is_truthy, to_number, ScrollIntoViewArg, ScrollIntoViewOptions};

/// Shape of a `scroll`/`scrollTo`/`scrollBy` call
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollCall {
    /// Exactly one argument: the structured-options form (still unvalidated)
    Options(Value),
    /// Two or more arguments: legacy `(x, y)`, coerced to numbers
    LegacyAxisPair(f64, f64),
    /// No arguments at all
    LegacyNone,
}

impl ScrollCall {
    pub fn classify(args: &[Value]) -> Self {
        match args {
            [] => Self::LegacyNone,
            [options] => Self::Options(options.clone()),
            [x, y, ..] => Self::LegacyAxisPair(to_number(x), to_number(y)),
        }
    }
}

/// Shape of a `scrollIntoView` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntoViewCall {
    /// An object-like first argument
    Options(ScrollIntoViewOptions),
    /// Anything else: absent, nullish or a truthy/falsy primitive
    Legacy(ScrollIntoViewArg),
}

impl IntoViewCall {
    pub fn classify(args: &[Value]) -> Self {
        match args.first() {
            None | Some(Value::Null) => Self::Legacy(ScrollIntoViewArg::Absent),
            Some(value) if is_object(value) => {
                Self::Options(ScrollIntoViewOptions::from_value(value).unwrap_or_default())
            }
            Some(value) => Self::Legacy(ScrollIntoViewArg::AlignToTop(is_truthy(value))),
        }
    }
}

impl From<ScrollIntoViewArg> for IntoViewCall {
    fn from(arg: ScrollIntoViewArg) -> Self {
        match arg {
            ScrollIntoViewArg::Options(options) => Self::Options(options),
            other => Self::Legacy(other),
        }
    }
}
