use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::handler::{SelectorHandler, default_selector_handlers};
use crate::inject::{InjectError, Injector};
use crate::sink::{MemorySink, SharedSink};
use crate::swatch::Swatch;

/// A configured styling instance: handler registry, `!important` policy,
/// rule sink, and the injection engine behind it.
///
/// This is the explicit-context replacement for module-global state:
/// construct one per process, or one per request for SSR isolation, and
/// share it by reference. [`Styler::extend`] produces a new instance with
/// extra handlers that shares this instance's injection registry, so
/// deduplication stays process-wide across extensions.
pub struct Styler {
    use_important: bool,
    handlers: Vec<Arc<dyn SelectorHandler>>,
    injector: Arc<Mutex<Injector>>,
}

/// The CSS captured by a buffered render pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedCss {
    /// Concatenated rule text, in injection order.
    pub content: String,
    /// Class names requested during the pass, in first-use order.
    pub class_names: Vec<String>,
}

/// The result of [`Styler::render_static`].
#[derive(Debug, Serialize)]
pub struct StaticRender<T> {
    /// Whatever the render function returned.
    pub html: T,
    /// Exactly the CSS that render pass needed.
    pub css: RenderedCss,
}

impl Styler {
    /// A styler with the default selector handlers (pseudo-selectors and
    /// media queries), `!important` on every declaration, and an
    /// in-memory sink. Use [`Styler::with_sink`] to write through to a
    /// live document.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(MemorySink::new()))
    }

    /// A styler writing through to the given live sink when not
    /// buffering.
    pub fn with_sink(sink: SharedSink) -> Self {
        Styler {
            use_important: true,
            handlers: default_selector_handlers(),
            injector: Arc::new(Mutex::new(Injector::new(sink))),
        }
    }

    /// Sets whether rendered declarations carry `!important`.
    ///
    /// The flag is fixed per shared-registry family: instances created
    /// through [`Styler::extend`] inherit it, which keeps the class name
    /// a complete dedup key.
    pub fn use_important(mut self, on: bool) -> Self {
        self.use_important = on;
        self
    }

    /// Returns a new instance whose handler registry is this one's
    /// followed by `handlers`, sharing this instance's injection state.
    /// The original instance is unaffected.
    pub fn extend(&self, handlers: Vec<Arc<dyn SelectorHandler>>) -> Styler {
        let mut combined = self.handlers.clone();
        combined.extend(handlers);
        Styler {
            use_important: self.use_important,
            handlers: combined,
            injector: Arc::clone(&self.injector),
        }
    }

    /// Injects the merged styles exactly once and returns the composite
    /// class name.
    ///
    /// `None` entries allow conditional styles at call sites. Multiple
    /// swatches merge left-to-right (last write wins) into a single rule
    /// set under a composite class name (the swatch names joined with
    /// `-_-`); a single swatch keeps its own name. An empty or all-`None`
    /// call returns an empty class name and emits nothing.
    pub fn css<'a>(
        &self,
        styles: impl IntoIterator<Item = Option<&'a Swatch>>,
    ) -> Result<String, InjectError> {
        let styles: Vec<Option<&Swatch>> = styles.into_iter().collect();
        self.injector
            .lock()
            .unwrap()
            .inject(self.use_important, &styles, &self.handlers)
    }

    /// Seeds the dedup registry with class names already delivered by a
    /// prior render (e.g. extracted from a server-rendered payload), so
    /// this process does not re-emit their rules. Emits nothing and never
    /// touches an active buffer.
    pub fn rehydrate<I, S>(&self, class_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.injector
            .lock()
            .unwrap()
            .add_rendered_class_names(class_names);
    }

    /// Runs `render` with buffering active and returns its output
    /// together with exactly the CSS that pass produced.
    ///
    /// Equivalent to reset → start buffering → render → flush. The
    /// returned `css.content` is empty when no styling calls occurred.
    /// Non-reentrant: a second call while one is in flight fails with
    /// [`InjectError::AlreadyBuffering`]. If `render` panics the engine
    /// is left buffering and must be [`Styler::reset`] before reuse.
    pub fn render_static<T>(
        &self,
        render: impl FnOnce() -> T,
    ) -> Result<StaticRender<T>, InjectError> {
        // Guard before resetting, so a nested call cannot clear the outer
        // pass's buffer.
        if self.injector.lock().unwrap().is_buffering() {
            return Err(InjectError::AlreadyBuffering);
        }
        self.reset();
        self.start_buffering()?;
        let html = render();
        let content = self.flush_to_string()?;
        Ok(StaticRender {
            html,
            css: RenderedCss {
                content,
                class_names: self.rendered_class_names(),
            },
        })
    }

    /// Clears the dedup registry, any buffer, and the rendered-name set.
    /// Safe to call from any state.
    pub fn reset(&self) {
        self.injector.lock().unwrap().reset();
    }

    /// Enters collect-only mode; fails fast if already buffering.
    pub fn start_buffering(&self) -> Result<(), InjectError> {
        self.injector.lock().unwrap().start_buffering()
    }

    /// Drains the buffer into one CSS string, keeping the dedup registry,
    /// and returns to write-through mode.
    pub fn flush_to_string(&self) -> Result<String, InjectError> {
        self.injector.lock().unwrap().flush_to_string()
    }

    /// Class names requested during the current or just-flushed buffered
    /// session.
    pub fn rendered_class_names(&self) -> Vec<String> {
        self.injector.lock().unwrap().rendered_class_names()
    }

    /// Prevents styles from reaching the live sink, for rendering
    /// components in tests without side effects. Pair with
    /// [`Styler::clear_buffer_and_resume_style_injection`].
    pub fn suppress_style_injection(&self) -> Result<(), InjectError> {
        self.reset();
        self.start_buffering()
    }

    /// Discards anything buffered by `suppress_style_injection` and
    /// resumes write-through injection.
    pub fn clear_buffer_and_resume_style_injection(&self) {
        self.reset();
    }
}

impl Default for Styler {
    fn default() -> Self {
        Self::new()
    }
}
