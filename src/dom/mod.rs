use crate::geometry::{GeometryProvider, LayoutSnapshot, RootMetrics};
use crate::tracker::Subscription;
use leptos::ev;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomErrorKind {
    NoWindow,
    NoDocument,
    NoBody,
}

#[derive(Clone, Debug)]
pub struct DomError {
    pub kind: DomErrorKind,
    pub message: String,
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomError {}

impl DomError {
    fn no_window() -> Self {
        Self {
            kind: DomErrorKind::NoWindow,
            message: "no global `window` (not running in a browser)".to_string(),
        }
    }

    fn no_document() -> Self {
        Self {
            kind: DomErrorKind::NoDocument,
            message: "window has no document".to_string(),
        }
    }

    fn no_body() -> Self {
        Self {
            kind: DomErrorKind::NoBody,
            message: "document has no body".to_string(),
        }
    }
}

pub type DomResult<T> = Result<T, DomError>;

/// Live geometry of `document.documentElement` and `document.body`.
#[derive(Clone, Debug)]
pub struct DocumentGeometry {
    document: web_sys::Document,
}

impl DocumentGeometry {
    pub fn from_window() -> DomResult<Self> {
        let window = web_sys::window().ok_or_else(DomError::no_window)?;
        let document = window.document().ok_or_else(DomError::no_document)?;
        if document.body().is_none() {
            return Err(DomError::no_body());
        }
        Ok(Self { document })
    }
}

// `Element::scroll_top` in web-sys returns i32; the DOM value is a double and
// can be fractional on zoomed or high-DPI pages.
fn read_f64(target: &JsValue, key: &str) -> f64 {
    js_sys::Reflect::get(target, &key.into())
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_default()
}

pub(crate) fn metrics(el: &JsValue) -> RootMetrics {
    RootMetrics::new(
        read_f64(el, "scrollTop"),
        read_f64(el, "scrollHeight"),
        read_f64(el, "clientHeight"),
    )
}

impl GeometryProvider for DocumentGeometry {
    fn snapshot(&self) -> LayoutSnapshot {
        // The body can be swapped out at runtime, so look both roots up each time.
        LayoutSnapshot {
            document_element: self
                .document
                .document_element()
                .map(|el| metrics(&el))
                .unwrap_or_default(),
            body: self
                .document
                .body()
                .map(|el| metrics(&el))
                .unwrap_or_default(),
        }
    }
}

/// Listen to `scroll` on the window until the returned subscription is
/// cancelled or dropped.
pub fn attach_window_scroll(on_scroll: impl Fn() + 'static) -> Subscription {
    let handle = window_event_listener(ev::scroll, move |_ev: web_sys::Event| on_scroll());
    Subscription::new(move || handle.remove())
}

/// Vertical page offset in pixels, if a window exists.
pub fn page_y_offset() -> Option<f64> {
    web_sys::window().and_then(|w| w.page_y_offset().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_error_kinds_and_messages() {
        let e = DomError::no_window();
        assert_eq!(e.kind, DomErrorKind::NoWindow);
        assert!(e.to_string().contains("window"));

        assert_eq!(DomError::no_document().kind, DomErrorKind::NoDocument);
        assert_eq!(DomError::no_body().kind, DomErrorKind::NoBody);
        assert_eq!(DomError::no_body().to_string(), "document has no body");
    }
}
