/// Scroll metrics of one layout root (`documentElement` or `body`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl RootMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }
}

/// Geometry of both candidate scroll roots, read at signal time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutSnapshot {
    pub document_element: RootMetrics,
    pub body: RootMetrics,
}

impl LayoutSnapshot {
    pub fn scroll_top(&self) -> f64 {
        first_non_zero(self.document_element.scroll_top, self.body.scroll_top)
    }

    pub fn scroll_height(&self) -> f64 {
        first_non_zero(self.document_element.scroll_height, self.body.scroll_height)
    }

    /// Viewport height; only the document element is consulted.
    pub fn client_height(&self) -> f64 {
        self.document_element.client_height
    }

    pub fn scroll_percent(&self) -> f64 {
        scroll_percent(self)
    }
}

// Zero and NaN both count as "unset", so the body value is used instead.
fn first_non_zero(primary: f64, fallback: f64) -> f64 {
    if primary != 0.0 && !primary.is_nan() {
        primary
    } else {
        fallback
    }
}

/// Percentage of the scrollable height that has been scrolled past.
///
/// Not clamped and not guarded: content that exactly fills the viewport
/// divides by zero and yields NaN (at the top) or infinity.
pub fn scroll_percent(layout: &LayoutSnapshot) -> f64 {
    let scrollable = layout.scroll_height() - layout.client_height();
    layout.scroll_top() / scrollable * 100.0
}

/// Anything that can report the current layout geometry.
pub trait GeometryProvider {
    fn snapshot(&self) -> LayoutSnapshot;
}

impl<F> GeometryProvider for F
where
    F: Fn() -> LayoutSnapshot,
{
    fn snapshot(&self) -> LayoutSnapshot {
        self()
    }
}
