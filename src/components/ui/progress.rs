use crate::tracker::TrackerPhase;
use crate::util::clamp_percent;
use leptos::prelude::*;
use tw_merge::*;

/// Horizontal bar filled to `value` percent (clamped to 0..=100).
#[component]
pub fn ScrollProgress(
    #[prop(into)] value: Signal<f64>,
    #[prop(into, optional)] phase: Signal<TrackerPhase>,
    #[prop(into, default = ProgressPlacement::default())] placement: ProgressPlacement,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let track = ProgressClass { placement };
    let merged_class = track.with_class(class);

    let indicator_style = move || format!("width: {}%", clamp_percent(value.get()));

    view! {
        <div
            data-name="ScrollProgress"
            data-state=move || phase.get().as_ref().to_string()
            class=merged_class
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow=move || clamp_percent(value.get()).round().to_string()
        >
            <div data-name="ScrollProgressIndicator" class="h-full bg-primary transition-[width] duration-150" style=indicator_style />
        </div>
    }
}

/* ========================================================== */
/*                       🧬 STRUCT 🧬                         */
/* ========================================================== */

#[derive(TwClass, Default)]
#[tw(class = "h-1 w-full overflow-hidden bg-primary/20 data-[state=terminal]:bg-success/20")]
pub struct ProgressClass {
    placement: ProgressPlacement,
}

#[derive(TwVariant)]
pub enum ProgressPlacement {
    #[tw(default, class = "fixed inset-x-0 top-0 z-50")]
    Fixed,
    #[tw(class = "relative rounded-full")]
    Inline,
}
