use icons::Check;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {MilestoneList, ul, "flex flex-wrap items-center gap-2"}
}

pub use components::*;

/// Badge for one scroll depth; shows a check once `reached`.
#[component]
pub fn MilestoneBadge(
    depth: f64,
    #[prop(into)] reached: Signal<bool>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "inline-flex items-center gap-1 rounded-full border px-2.5 py-0.5 text-xs font-medium transition-colors",
        "text-muted-foreground data-[reached=true]:border-success data-[reached=true]:text-success",
        class
    );

    view! {
        <li data-name="MilestoneBadge" data-reached=move || reached.get().to_string() class=merged_class>
            <Show when=move || reached.get() fallback=|| ()>
                <Check class="size-3" />
            </Show>
            {format!("{depth}%")}
        </li>
    }
}
