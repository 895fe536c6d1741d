//! Integration tests driving the full pipeline: registration, merged
//! injection, buffered capture, and server/client rehydration.

use std::sync::Arc;

use mordant_core::{
    InjectError, MemorySink, RenderCtx, RenderError, SelectorHandler, StyleMap, StyleValue, Styler,
    Swatch, create, decls, sheet,
};

#[test]
fn server_render_captures_exactly_the_needed_css() {
    let styler = Styler::new().use_important(false);
    let styles = sheet! { red_text: { "color": "red" } };

    let render = styler
        .render_static(|| {
            let class = styler.css([Some(&styles["red_text"])]).unwrap();
            format!("<div class=\"{class}\">x</div>")
        })
        .unwrap();

    let name = styles["red_text"].name();
    assert!(render.html.contains(name));
    assert_eq!(render.css.content, format!(".{name}{{color:red;}}"));
    assert_eq!(render.css.class_names, [name.to_string()]);
}

#[test]
fn server_to_client_handoff_does_not_re_emit() {
    let styles = sheet! { red_text: { "color": "red" } };

    // Server pass.
    let server = Styler::new();
    let rendered = server
        .render_static(|| server.css([Some(&styles["red_text"])]).unwrap())
        .unwrap();
    assert!(!rendered.css.content.is_empty());

    // Client pass: seed the registry from the server payload.
    let sink = Arc::new(MemorySink::new());
    let client = Styler::with_sink(sink.clone());
    client.rehydrate(rendered.css.class_names.clone());

    let class = client.css([Some(&styles["red_text"])]).unwrap();
    assert_eq!(class, styles["red_text"].name());
    assert!(sink.is_empty());

    // A style the server did not send still writes through.
    let extra = sheet! { blue_text: { "color": "blue" } };
    client.css([Some(&extra["blue_text"])]).unwrap();
    assert_eq!(sink.len(), 1);
}

#[test]
fn dedup_spans_independently_created_sheets() {
    let sink = Arc::new(MemorySink::new());
    let styler = Styler::with_sink(sink.clone());

    let a = create([("box", decls! { "margin": 10, "color": "red" })]);
    let b = create([("box", decls! { "color": "red", "margin": 10 })]);

    let first = styler.css([Some(&a["box"])]).unwrap();
    let second = styler.css([Some(&b["box"])]).unwrap();

    assert_eq!(first, second);
    assert_eq!(sink.len(), 1);
}

#[test]
fn reset_isolates_sessions() {
    let styler = Styler::new().use_important(false);
    let styles = sheet! { red_text: { "color": "red" } };

    let first = styler
        .render_static(|| styler.css([Some(&styles["red_text"])]).unwrap())
        .unwrap();
    let second = styler
        .render_static(|| styler.css([Some(&styles["red_text"])]).unwrap())
        .unwrap();

    // Each pass resets, so the same style renders fresh both times.
    assert_eq!(first.css.content, second.css.content);
    assert!(!second.css.content.is_empty());
    assert_eq!(second.css.class_names.len(), 1);
}

#[test]
fn json_definitions_share_names_with_macro_definitions() {
    let parsed: StyleMap =
        serde_json::from_str(r#"{"color": "red", ":hover": {"color": "blue"}}"#).unwrap();
    let from_json = Swatch::new("button", parsed);

    let styles = sheet! {
        button: { "color": "red", ":hover": { "color": "blue" } },
    };

    assert_eq!(from_json.name(), styles["button"].name());
}

#[test]
fn merged_injection_renders_one_combined_rule() {
    let sink = Arc::new(MemorySink::new());
    let styler = Styler::with_sink(sink.clone()).use_important(false);
    let styles = sheet! {
        base: { "color": "red", "margin": 10 },
        accent: { "color": "blue" },
    };

    let class = styler
        .css([Some(&styles["base"]), Some(&styles["accent"])])
        .unwrap();

    assert_eq!(
        class,
        format!("{}-_-{}", styles["base"].name(), styles["accent"].name())
    );
    assert_eq!(
        sink.rules(),
        [format!(".{class}{{color:blue;margin:10px;}}")]
    );
}

/// Claims `"[...]"` attribute-selector keys.
struct AttributeSelectors;

impl SelectorHandler for AttributeSelectors {
    fn handle(
        &self,
        key: &str,
        base_selector: &str,
        value: &StyleValue,
        ctx: &RenderCtx<'_>,
    ) -> Option<Result<String, RenderError>> {
        if !key.starts_with('[') {
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

#[test]
fn extension_handlers_render_new_selector_syntax() {
    let styler = Styler::new()
        .use_important(false)
        .extend(vec![Arc::new(AttributeSelectors)]);
    let styles = sheet! {
        field: {
            "color": "black",
            "[disabled]": { "opacity": 0.4 },
        },
    };

    let render = styler
        .render_static(|| styler.css([Some(&styles["field"])]).unwrap())
        .unwrap();

    let name = styles["field"].name();
    assert_eq!(
        render.css.content,
        format!(".{name}{{color:black;}}.{name}[disabled]{{opacity:0.4;}}")
    );
}

#[test]
fn buffering_misuse_surfaces_errors() {
    let styler = Styler::new();

    assert!(matches!(
        styler.flush_to_string(),
        Err(InjectError::NotBuffering)
    ));

    styler.start_buffering().unwrap();
    assert!(matches!(
        styler.start_buffering(),
        Err(InjectError::AlreadyBuffering)
    ));

    // Recovery path after a failed render: explicit reset.
    styler.reset();
    styler.start_buffering().unwrap();
    styler.flush_to_string().unwrap();
}
