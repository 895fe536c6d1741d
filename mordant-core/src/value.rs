use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered mapping from declaration/selector keys to style values.
///
/// Insertion order is preserved because it is the order declarations are
/// rendered in; identity for deduplication purposes is order-independent
/// (see [`crate::Fingerprint`]).
pub type StyleMap = IndexMap<String, StyleValue>;

/// A node in a style value tree.
///
/// Keys of a [`StyleMap`] are plain CSS property names, pseudo-class keys
/// (`":hover"`), at-rule keys (`"@media ..."`), or whatever a registered
/// selector handler claims. Values are primitives, fallback lists, or
/// nested trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A literal CSS value, emitted verbatim.
    Str(String),
    /// A numeric value; rendered with a `px` suffix unless the property
    /// is unitless.
    Num(f64),
    /// Fallback chain: one declaration per element, in order.
    List(Vec<StyleValue>),
    /// A nested declaration block (pseudo-class, media query, ...).
    Map(StyleMap),
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        StyleValue::Str(v.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(v: String) -> Self {
        StyleValue::Str(v)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Num(v)
    }
}

impl From<i32> for StyleValue {
    fn from(v: i32) -> Self {
        StyleValue::Num(v as f64)
    }
}

impl From<u32> for StyleValue {
    fn from(v: u32) -> Self {
        StyleValue::Num(v as f64)
    }
}

impl From<Vec<StyleValue>> for StyleValue {
    fn from(v: Vec<StyleValue>) -> Self {
        StyleValue::List(v)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(v: StyleMap) -> Self {
        StyleValue::Map(v)
    }
}

/// Merges `src` into `dst` with last-write-wins semantics.
///
/// Nested maps merge recursively (later entries override earlier ones at
/// the same path); any other pair of values is replaced wholesale. A key
/// that is overwritten keeps its original position in the map, so the
/// first definition of a property decides where it renders.
pub(crate) fn merge_into(dst: &mut StyleMap, src: &StyleMap) {
    for (key, value) in src {
        match (dst.get_mut(key), value) {
            (Some(StyleValue::Map(existing)), StyleValue::Map(incoming)) => {
                merge_into(existing, incoming);
            }
            _ => {
                dst.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Builds a [`StyleMap`] from a declaration literal.
///
/// Keys are string literals; values are expressions, `[...]` fallback
/// lists, or nested `{...}` blocks. Parenthesize negative numbers.
///
/// ```
/// use mordant_core::decls;
///
/// let button = decls! {
///     "color": "red",
///     "margin": 10,
///     ":hover": { "color": "blue" },
/// };
/// assert_eq!(button.len(), 3);
/// ```
#[macro_export]
macro_rules! decls {
    ( $($key:tt : $value:tt),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut map = $crate::StyleMap::new();
        $( map.insert(($key).to_string(), $crate::style!($value)); )*
        map
    }};
}

/// Builds a [`StyleValue`] from a literal: a `{...}` declaration block, a
/// `[...]` fallback list, or any expression convertible into a value.
#[macro_export]
macro_rules! style {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::StyleValue::Map($crate::decls! { $($key : $value),* })
    };
    ([ $($value:tt),* $(,)? ]) => {
        $crate::StyleValue::List(vec![ $( $crate::style!($value) ),* ])
    };
    ($other:expr) => {
        $crate::StyleValue::from($other)
    };
}
