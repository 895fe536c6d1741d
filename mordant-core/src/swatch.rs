use indexmap::IndexMap;

use crate::fingerprint::Fingerprint;
use crate::value::StyleMap;

/// A named style sheet produced by [`create`].
pub type Sheet = IndexMap<String, Swatch>;

/// A registered style: a caller-supplied key bound to a declaration tree
/// under a fingerprint-qualified name.
///
/// The name is `<key>_<fingerprint>`, so two swatches created from
/// structurally-equal definitions — even by independent [`create`] calls —
/// share a name, and the injection engine deduplicates them. Swatches are
/// immutable; creating one has no side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    name: String,
    definition: StyleMap,
}

impl Swatch {
    /// Registers a declaration tree under the given key.
    pub fn new(key: impl AsRef<str>, definition: StyleMap) -> Self {
        let name = format!("{}_{}", key.as_ref(), Fingerprint::of_map(&definition));
        Swatch { name, definition }
    }

    /// The fingerprint-qualified class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaration tree this swatch was registered with.
    pub fn definition(&self) -> &StyleMap {
        &self.definition
    }
}

/// Registers a sheet of named declaration trees.
///
/// Pure: no interaction with any injection registry. The returned map
/// preserves definition order.
///
/// ```
/// use mordant_core::{create, decls};
///
/// let sheet = create([("button", decls! { "color": "red" })]);
/// assert!(sheet["button"].name().starts_with("button_"));
/// ```
pub fn create<K: Into<String>>(definitions: impl IntoIterator<Item = (K, StyleMap)>) -> Sheet {
    definitions
        .into_iter()
        .map(|(key, definition)| {
            let key = key.into();
            let swatch = Swatch::new(&key, definition);
            (key, swatch)
        })
        .collect()
}

/// Builds a [`Sheet`] from named declaration literals.
///
/// ```
/// use mordant_core::sheet;
///
/// let styles = sheet! {
///     button: { "color": "red", ":hover": { "color": "blue" } },
///     label: { "font-weight": "bold" },
/// };
/// assert_eq!(styles.len(), 2);
/// ```
#[macro_export]
macro_rules! sheet {
    ( $( $name:ident : $definition:tt ),* $(,)? ) => {
        $crate::create([ $( (stringify!($name), $crate::decls! $definition) ),* ])
    };
}
