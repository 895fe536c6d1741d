use std::sync::Arc;

use crate::handler::SelectorHandler;
use crate::value::{StyleMap, StyleValue};

/// Error raised while rendering a declaration tree into CSS text.
///
/// Malformed keys fail loudly instead of emitting invalid CSS.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A handler claimed the key but its value was not a nested block.
    #[error("expected a declaration block under `{key}`")]
    ExpectedBlock { key: String },
    /// A nested block appeared under a key no registered handler claims.
    #[error("no selector handler claimed nested block `{key}`")]
    UnclaimedBlock { key: String },
}

/// Rendering context handed to selector handlers so they can recurse
/// through the full handler registry (a pseudo-class inside a media query
/// still renders through the pseudo handler).
pub struct RenderCtx<'a> {
    handlers: &'a [Arc<dyn SelectorHandler>],
    use_important: bool,
}

impl RenderCtx<'_> {
    /// Renders a nested declaration block scoped to `selector`.
    pub fn render_block(
        &self,
        selector: &str,
        declarations: &StyleMap,
    ) -> Result<String, RenderError> {
        generate_css(selector, declarations, self.handlers, self.use_important)
    }

    /// Whether declarations rendered in this pass carry `!important`.
    pub fn use_important(&self) -> bool {
        self.use_important
    }
}

/// Renders a merged declaration tree into concrete CSS rule text scoped to
/// `selector`.
///
/// Each key is offered to the handlers in registration order; unclaimed
/// keys fall through to plain `property:value;` rendering. The base
/// declaration block is emitted first, then handler-produced rules in key
/// order.
pub fn generate_css(
    selector: &str,
    declarations: &StyleMap,
    handlers: &[Arc<dyn SelectorHandler>],
    use_important: bool,
) -> Result<String, RenderError> {
    let ctx = RenderCtx {
        handlers,
        use_important,
    };
    let mut plain = String::new();
    let mut handled = String::new();

    'keys: for (key, value) in declarations {
        for handler in handlers {
            if let Some(rendered) = handler.handle(key, selector, value, &ctx) {
                handled.push_str(&rendered?);
                continue 'keys;
            }
        }
        render_declaration(&mut plain, key, value, use_important)?;
    }

    let mut out = if plain.is_empty() {
        String::new()
    } else {
        format!("{selector}{{{plain}}}")
    };
    out.push_str(&handled);
    Ok(out)
}

fn render_declaration(
    out: &mut String,
    property: &str,
    value: &StyleValue,
    important: bool,
) -> Result<(), RenderError> {
    match value {
        StyleValue::Str(text) => push_declaration(out, property, text, important),
        StyleValue::Num(number) => {
            push_declaration(out, property, &css_number(property, *number), important)
        }
        // Fallback chain: the same property declared once per element.
        StyleValue::List(items) => {
            for item in items {
                render_declaration(out, property, item, important)?;
            }
        }
        StyleValue::Map(_) => {
            return Err(RenderError::UnclaimedBlock {
                key: property.to_string(),
            });
        }
    }
    Ok(())
}

fn push_declaration(out: &mut String, property: &str, value: &str, important: bool) {
    out.push_str(property);
    out.push(':');
    out.push_str(value);
    if important {
        out.push_str(" !important");
    }
    out.push(';');
}

fn css_number(property: &str, number: f64) -> String {
    let text = if number.fract() == 0.0 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    };
    if UNITLESS_PROPERTIES.binary_search(&property).is_ok() {
        text
    } else {
        format!("{text}px")
    }
}

/// Properties whose numeric values render without a `px` suffix. Sorted.
const UNITLESS_PROPERTIES: &[&str] = &[
    "animation-iteration-count",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "box-flex",
    "box-flex-group",
    "box-ordinal-group",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-negative",
    "flex-order",
    "flex-positive",
    "flex-shrink",
    "flood-opacity",
    "font-weight",
    "grid-column",
    "grid-row",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "stop-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];
