use std::sync::Arc;

use crate::render::{RenderCtx, RenderError};
use crate::value::StyleValue;

/// A pluggable renderer for special declaration keys.
///
/// Handlers are tried in registration order; the first one to return
/// `Some` claims the key. `None` passes the key to the next handler and
/// ultimately to plain declaration rendering. A claimed key whose value
/// cannot be rendered is a [`RenderError`], never silent invalid CSS.
pub trait SelectorHandler: Send + Sync {
    /// Attempts to render `key` (e.g. `":hover"`, `"@media ..."`) scoped
    /// to `base_selector`. Nested blocks recurse through [`RenderCtx`] so
    /// handlers compose.
    fn handle(
        &self,
        key: &str,
        base_selector: &str,
        value: &StyleValue,
        ctx: &RenderCtx<'_>,
    ) -> Option<Result<String, RenderError>>;
}

/// Renders pseudo-class and pseudo-element keys (`":hover"`,
/// `"::placeholder"`) as `base_selector<key> { ... }`.
pub struct PseudoSelectors;

impl SelectorHandler for PseudoSelectors {
    fn handle(
        &self,
        key: &str,
        base_selector: &str,
        value: &StyleValue,
        ctx: &RenderCtx<'_>,
    ) -> Option<Result<String, RenderError>> {
        if !key.starts_with(':') {
            return None;
        }
        let StyleValue::Map(block) = value else {
            return Some(Err(RenderError::ExpectedBlock {
                key: key.to_string(),
            }));
        };
        Some(ctx.render_block(&format!("{base_selector}{key}"), block))
    }
}

/// Renders `"@media ..."` keys by re-scoping the nested block to the base
/// selector inside the at-rule.
pub struct MediaQueries;

impl SelectorHandler for MediaQueries {
    fn handle(
        &self,
        key: &str,
        base_selector: &str,
        value: &StyleValue,
        ctx: &RenderCtx<'_>,
    ) -> Option<Result<String, RenderError>> {
        if !key.starts_with("@media") {
            return None;
        }
        let StyleValue::Map(block) = value else {
            return Some(Err(RenderError::ExpectedBlock {
                key: key.to_string(),
            }));
        };
        Some(
            ctx.render_block(base_selector, block)
                .map(|inner| format!("{key}{{{inner}}}")),
        )
    }
}

/// The default handler registry: pseudo-selectors, then media queries.
pub fn default_selector_handlers() -> Vec<Arc<dyn SelectorHandler>> {
    vec![Arc::new(PseudoSelectors), Arc::new(MediaQueries)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decls;
    use crate::render::generate_css;

    #[test]
    fn pseudo_key_extends_the_base_selector() {
        let declarations = decls! { ":hover": { "color": "blue" } };
        let css = generate_css(".btn", &declarations, &default_selector_handlers(), false).unwrap();
        assert_eq!(css, ".btn:hover{color:blue;}");
    }

    #[test]
    fn media_key_wraps_a_rescoped_block() {
        let declarations = decls! {
            "@media (max-width: 600px)": { "display": "none" },
        };
        let css = generate_css(".btn", &declarations, &default_selector_handlers(), false).unwrap();
        assert_eq!(css, "@media (max-width: 600px){.btn{display:none;}}");
    }

    #[test]
    fn media_and_pseudo_compose() {
        let declarations = decls! {
            "@media print": { ":hover": { "color": "black" } },
        };
        let css = generate_css(".btn", &declarations, &default_selector_handlers(), false).unwrap();
        assert_eq!(css, "@media print{.btn:hover{color:black;}}");
    }

    #[test]
    fn pseudo_value_must_be_a_block() {
        let declarations = decls! { ":hover": "blue" };
        let err = generate_css(".btn", &declarations, &default_selector_handlers(), false)
            .unwrap_err();
        assert!(matches!(err, RenderError::ExpectedBlock { key } if key == ":hover"));
    }

    #[test]
    fn unrelated_keys_are_not_claimed() {
        let declarations = decls! { "color": "red" };
        let css = generate_css(".btn", &declarations, &default_selector_handlers(), false).unwrap();
        assert_eq!(css, ".btn{color:red;}");
    }

    #[test]
    fn important_propagates_into_handled_blocks() {
        let declarations = decls! { ":hover": { "color": "blue" } };
        let css = generate_css(".btn", &declarations, &default_selector_handlers(), true).unwrap();
        assert_eq!(css, ".btn:hover{color:blue !important;}");
    }
}
