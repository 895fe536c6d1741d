use std::sync::{Arc, RwLock};

/// Error from a live rule sink (e.g. the document rejected a rule).
#[derive(Debug, thiserror::Error)]
#[error("style sink error: {0}")]
pub struct SinkError(String);

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError(message.into())
    }
}

/// A live style-sheet sink: the `insertRule`-style primitive the injection
/// engine writes through when it is not buffering.
///
/// Sinks receive complete rule strings — rendering and deduplication are
/// handled by higher layers. All methods take `&self` to support sinks
/// with internal locking.
pub trait RuleSink {
    /// Appends one rule to the live sheet.
    fn insert_rule(&self, rule: &str) -> Result<(), SinkError>;
}

/// A shared, type-erased sink handle.
///
/// DOM sinks hold `!Send` document references, so the thread-safety bound
/// is dropped on wasm, where everything is single-threaded anyway.
#[cfg(not(target_arch = "wasm32"))]
pub type SharedSink = Arc<dyn RuleSink + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type SharedSink = Arc<dyn RuleSink>;

/// An in-memory sink backed by a Vec of rule strings.
///
/// Useful for testing and as a reference implementation.
#[derive(Debug, Default)]
pub struct MemorySink {
    rules: RwLock<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the rules inserted so far, in order.
    pub fn rules(&self) -> Vec<String> {
        self.rules.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.rules.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().unwrap().is_empty()
    }
}

impl RuleSink for MemorySink {
    fn insert_rule(&self, rule: &str) -> Result<(), SinkError> {
        self.rules.write().unwrap().push(rule.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_rules_in_order() {
        let sink = MemorySink::new();
        sink.insert_rule(".a{color:red;}").unwrap();
        sink.insert_rule(".b{color:blue;}").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.rules(), [".a{color:red;}", ".b{color:blue;}"]);
    }

    #[test]
    fn memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
    }
}
