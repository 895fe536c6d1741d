use std::fmt;

use crate::value::{StyleMap, StyleValue};

/// A truncated Blake3 digest identifying a style value tree by content.
///
/// Fingerprints are computed over a canonical CBOR encoding in which map
/// keys are sorted recursively, so structurally-equal trees produce the
/// same fingerprint regardless of declaration order. List order is
/// significant. Six bytes of digest (12 hex chars) are kept; collisions
/// are not guarded against.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 6]);

impl Fingerprint {
    /// Computes the fingerprint of a style value tree.
    pub fn of(value: &StyleValue) -> Self {
        Self::from_canonical(canonical(value))
    }

    /// Computes the fingerprint of a top-level declaration map.
    pub(crate) fn of_map(map: &StyleMap) -> Self {
        Self::from_canonical(canonical_map(map))
    }

    fn from_canonical(value: ciborium::Value) -> Self {
        let mut bytes = Vec::new();
        // Encoding an in-memory tree into a Vec cannot fail.
        ciborium::into_writer(&value, &mut bytes).expect("CBOR encoding should not fail");
        let digest = blake3::hash(&bytes);
        let mut out = [0u8; 6];
        out.copy_from_slice(&digest.as_bytes()[..6]);
        Fingerprint(out)
    }
}

/// Rewrites a style value into CBOR with recursively key-sorted maps.
fn canonical(value: &StyleValue) -> ciborium::Value {
    match value {
        StyleValue::Str(s) => ciborium::Value::Text(s.clone()),
        StyleValue::Num(n) => ciborium::Value::Float(*n),
        StyleValue::List(items) => ciborium::Value::Array(items.iter().map(canonical).collect()),
        StyleValue::Map(map) => canonical_map(map),
    }
}

fn canonical_map(map: &StyleMap) -> ciborium::Value {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    ciborium::Value::Map(
        entries
            .into_iter()
            .map(|(key, value)| (ciborium::Value::Text(key.clone()), canonical(value)))
            .collect(),
    )
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}
