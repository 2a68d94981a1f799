//! Constant and attribute-level predicates.
//!
//! Object predicates are plain `Fn(&R) -> bool`. Entry predicates look at
//! one attribute at a time as `Fn(&str, &Value) -> bool`.

use std::fmt;

use querykv_record::{Record, Value};

pub fn always_true<T: ?Sized>(_: &T) -> bool {
    true
}

pub fn always_false<T: ?Sized>(_: &T) -> bool {
    false
}

pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

pub fn is_not_null(value: &Value) -> bool {
    !value.is_null()
}

/// Matches an attribute that is present and explicitly null.
pub fn is_entry_value_null(_name: &str, value: &Value) -> bool {
    value.is_null()
}

/// Matches the attribute `name` when it equals `value`.
pub fn attribute_equals(
    name: impl Into<String>,
    value: impl Into<Value>,
) -> impl Fn(&str, &Value) -> bool {
    let name = name.into();
    let value = value.into();
    move |n: &str, v: &Value| n == name && *v == value
}

/// Matches any attribute equal to `value`.
pub fn value_equals(value: impl Into<Value>) -> impl Fn(&str, &Value) -> bool {
    let value = value.into();
    move |_: &str, v: &Value| *v == value
}

/// Record-level gate applied before materialization.
pub enum EntryFilter<'a> {
    /// Every record passes, including ones with an empty attribute map.
    Any,
    /// A record passes when at least one of its attribute entries matches.
    Matching(Box<dyn Fn(&str, &Value) -> bool + 'a>),
}

impl<'a> EntryFilter<'a> {
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + 'a,
    {
        EntryFilter::Matching(Box::new(predicate))
    }

    pub fn matches<K>(&self, record: &Record<K>) -> bool {
        match self {
            EntryFilter::Any => true,
            EntryFilter::Matching(predicate) => record
                .attributes
                .iter()
                .any(|(name, value)| predicate(name, value)),
        }
    }
}

impl fmt::Debug for EntryFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryFilter::Any => f.write_str("Any"),
            EntryFilter::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}
