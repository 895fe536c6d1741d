//! Mordant turns declarative style trees into deduplicated,
//! content-addressed CSS.
//!
//! Core concepts:
//! - **StyleValue**: A declaration tree (properties, pseudo-classes,
//!   at-rules) with no inherent identity
//! - **Fingerprint**: A truncated Blake3 digest identifying a tree by
//!   content
//! - **Swatch**: A named style bound to a fingerprint-qualified class name
//! - **SelectorHandler**: A pluggable renderer for special declaration
//!   keys (pseudo-classes, media queries, ...)
//! - **Styler**: A configured instance that injects merged swatches
//!   exactly once, writes through a live sink or buffers for server-side
//!   rendering
//!
//! # Example
//!
//! ```
//! use mordant_core::{Styler, sheet};
//!
//! let styler = Styler::new();
//! let styles = sheet! {
//!     button: { "color": "red", ":hover": { "color": "blue" } },
//! };
//!
//! let render = styler
//!     .render_static(|| {
//!         let class = styler.css([Some(&styles["button"])]).unwrap();
//!         format!("<button class=\"{class}\">ok</button>")
//!     })
//!     .unwrap();
//!
//! assert!(render.html.contains(styles["button"].name()));
//! assert!(render.css.content.contains(":hover"));
//! ```
//!
//! # Content addressing
//!
//! Fingerprints are computed over a canonical CBOR encoding in which map
//! keys are sorted recursively, so structurally-equal definitions collapse
//! to one class name — and one emitted rule set — no matter where or in
//! what key order they were written.

mod fingerprint;
mod handler;
mod inject;
mod render;
mod sink;
mod styler;
mod swatch;
mod value;

pub use fingerprint::Fingerprint;
pub use handler::{MediaQueries, PseudoSelectors, SelectorHandler, default_selector_handlers};
pub use inject::InjectError;
pub use render::{RenderCtx, RenderError, generate_css};
pub use sink::{MemorySink, RuleSink, SharedSink, SinkError};
pub use styler::{RenderedCss, StaticRender, Styler};
pub use swatch::{Sheet, Swatch, create};
pub use value::{StyleMap, StyleValue};
