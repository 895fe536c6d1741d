//! DOM-backed rule sink for Mordant.
//!
//! [`DomSink`] appends injected rules to a `<style data-mordant>` element
//! in the document head, so a `Styler` built with it writes straight into
//! the live page. Only meaningful on `wasm32` targets; elsewhere this
//! crate is empty.

#[cfg(target_arch = "wasm32")]
mod dom {
    use mordant_core::{RuleSink, SinkError};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlStyleElement};

    fn js_error(context: &str) -> impl FnOnce(wasm_bindgen::JsValue) -> SinkError + '_ {
        move |err| SinkError::new(format!("{context}: {err:?}"))
    }

    /// A live sink writing each rule into a `<style>` element.
    pub struct DomSink {
        document: Document,
        style: HtmlStyleElement,
    }

    impl DomSink {
        /// Attaches to the current document, reusing an existing
        /// `<style data-mordant>` element or creating one in the head.
        pub fn attach() -> Result<Self, SinkError> {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| SinkError::new("no document to attach to"))?;

            let existing = document
                .query_selector("style[data-mordant]")
                .map_err(js_error("querying for style element"))?;
            let style = match existing {
                Some(element) => element
                    .dyn_into::<HtmlStyleElement>()
                    .map_err(|_| SinkError::new("data-mordant element is not a <style>"))?,
                None => {
                    let element = document
                        .create_element("style")
                        .map_err(js_error("creating style element"))?;
                    element
                        .set_attribute("data-mordant", "")
                        .map_err(js_error("marking style element"))?;
                    document
                        .head()
                        .ok_or_else(|| SinkError::new("document has no head"))?
                        .append_child(&element)
                        .map_err(js_error("appending style element"))?;
                    element
                        .dyn_into::<HtmlStyleElement>()
                        .map_err(|_| SinkError::new("created element is not a <style>"))?
                }
            };

            Ok(DomSink { document, style })
        }
    }

    impl RuleSink for DomSink {
        fn insert_rule(&self, rule: &str) -> Result<(), SinkError> {
            let text = self.document.create_text_node(rule);
            self.style
                .append_child(&text)
                .map_err(js_error("appending rule"))?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomSink;
