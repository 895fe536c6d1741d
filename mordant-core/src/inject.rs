use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;

use crate::handler::SelectorHandler;
use crate::render::{RenderError, generate_css};
use crate::sink::{SharedSink, SinkError};
use crate::swatch::Swatch;
use crate::value::{StyleMap, merge_into};

/// Joins swatch names into a composite class name. Class-name-safe, and
/// cannot collide with a `<key>_<hex>` swatch name.
pub(crate) const COMPOSITE_JOIN: &str = "-_-";

/// Error from the injection engine or the buffering lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// `start_buffering` was called while a buffered session was active.
    #[error("style buffering is already active")]
    AlreadyBuffering,
    /// `flush_to_string` was called outside a buffered session.
    #[error("style buffering is not active")]
    NotBuffering,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

enum Mode {
    /// Write-through: rules go straight to the live sink.
    Idle,
    /// Collect-only: rules accumulate until flushed.
    Buffering { rules: Vec<String> },
}

/// The injection engine: process-wide bookkeeping of emitted styles.
///
/// Holds the dedup registry of class names already written to the sink or
/// captured in a buffer, the buffering mode, and the set of class names
/// requested during the current buffered session. Explicit state passed by
/// reference — there are no globals; construct one per process, or one per
/// request for SSR isolation.
pub(crate) struct Injector {
    injected: HashSet<String>,
    rendered: IndexSet<String>,
    mode: Mode,
    sink: SharedSink,
}

impl Injector {
    pub(crate) fn new(sink: SharedSink) -> Self {
        Injector {
            injected: HashSet::new(),
            rendered: IndexSet::new(),
            mode: Mode::Idle,
            sink,
        }
    }

    /// Clears all bookkeeping; subsequent calls behave as a fresh process.
    pub(crate) fn reset(&mut self) {
        log::debug!("injection state reset");
        self.injected.clear();
        self.rendered.clear();
        self.mode = Mode::Idle;
    }

    pub(crate) fn is_buffering(&self) -> bool {
        matches!(self.mode, Mode::Buffering { .. })
    }

    /// Enters collect-only mode. Nested buffering is a misuse.
    pub(crate) fn start_buffering(&mut self) -> Result<(), InjectError> {
        if matches!(self.mode, Mode::Buffering { .. }) {
            return Err(InjectError::AlreadyBuffering);
        }
        log::debug!("style buffering started");
        self.rendered.clear();
        self.mode = Mode::Buffering { rules: Vec::new() };
        Ok(())
    }

    /// Drains the buffer into one CSS string and returns to write-through
    /// mode. The dedup registry is left intact, so a later render in the
    /// same session does not re-emit.
    pub(crate) fn flush_to_string(&mut self) -> Result<String, InjectError> {
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Buffering { rules } => {
                log::debug!("flushed {} buffered rule(s)", rules.len());
                Ok(rules.concat())
            }
            Mode::Idle => Err(InjectError::NotBuffering),
        }
    }

    /// Class names requested during the current or just-flushed buffered
    /// session, in first-use order. Valid until the next `reset`.
    pub(crate) fn rendered_class_names(&self) -> Vec<String> {
        self.rendered.iter().cloned().collect()
    }

    /// Seeds the dedup registry with externally-known class names (e.g.
    /// from a server-rendered payload) without emitting any CSS. Never
    /// touches the buffer.
    pub(crate) fn add_rendered_class_names<I, S>(&mut self, class_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in class_names {
            self.injected.insert(name.into());
        }
    }

    /// Injects the merged styles exactly once and returns the composite
    /// class name.
    ///
    /// `None` entries are skipped; an empty list yields an empty class
    /// name and emits nothing. A registry hit returns immediately without
    /// re-rendering. Otherwise the definitions merge left-to-right (last
    /// write wins), render through the handler registry scoped to the
    /// composite class, and the rule text goes to the buffer or the live
    /// sink depending on mode.
    pub(crate) fn inject(
        &mut self,
        use_important: bool,
        styles: &[Option<&Swatch>],
        handlers: &[Arc<dyn SelectorHandler>],
    ) -> Result<String, InjectError> {
        let active: Vec<&Swatch> = styles.iter().filter_map(|style| *style).collect();
        if active.is_empty() {
            return Ok(String::new());
        }

        let class_name = active
            .iter()
            .map(|swatch| swatch.name())
            .collect::<Vec<_>>()
            .join(COMPOSITE_JOIN);

        // A server handoff needs every class the markup references, not
        // just the ones whose rules were newly emitted this pass.
        if matches!(self.mode, Mode::Buffering { .. }) {
            self.rendered.insert(class_name.clone());
        }

        if self.injected.contains(&class_name) {
            log::trace!("dedup hit for {class_name}");
            return Ok(class_name);
        }

        let mut merged = StyleMap::new();
        for swatch in &active {
            merge_into(&mut merged, swatch.definition());
        }

        let selector = format!(".{class_name}");
        let css = generate_css(&selector, &merged, handlers, use_important)?;

        match &mut self.mode {
            Mode::Buffering { rules } => rules.push(css),
            Mode::Idle => self.sink.insert_rule(&css)?,
        }
        log::debug!("injected rules for {class_name}");
        self.injected.insert(class_name.clone());

        Ok(class_name)
    }
}
