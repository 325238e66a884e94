use crate::components::hooks::{use_scroll_tracker, UseScrollTrackerOptions};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, MilestoneBadge, MilestoneList, ProgressPlacement,
    ScrollProgress,
};
use crate::config::{EnvConfig, TrackerConfig, DEFAULT_THROTTLE_MS};
use crate::tracker::{ScrollDepthEvent, TrackerPhase};
use crate::util::format_percent;
use leptos::prelude::*;
use leptos_router::components::A;

const SECTION_COUNT: usize = 24;
const MAX_LOG_LINES: usize = 50;

const FILLER: &str = "Scroll depth is measured against the scrollable height of the page, \
    i.e. the full document height minus the viewport. Keep scrolling to move the bar; \
    every milestone fires exactly once, even when a single fling skips past several.";

fn describe(event: &ScrollDepthEvent, label: &str) -> String {
    let remaining = event
        .remaining_depths
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[{label}] reached {} at {} (remaining: [{remaining}])",
        event.scroll_y,
        format_percent(event.scroll_percent)
    )
}

#[component]
fn PageNav() -> impl IntoView {
    view! {
        <nav class="sticky top-1 z-40 flex gap-4 border-b bg-background/90 px-6 py-3 text-sm backdrop-blur">
            <A href="/">"Progress"</A>
            <A href="/milestones">"Milestones"</A>
        </nav>
    }
}

#[component]
fn Article() -> impl IntoView {
    view! {
        <article class="mx-auto flex max-w-2xl flex-col gap-8 px-6 py-10">
            {(1..=SECTION_COUNT)
                .map(|i| {
                    view! {
                        <section class="flex flex-col gap-2">
                            <h2 class="text-lg font-semibold">{format!("Section {i}")}</h2>
                            <p class="text-muted-foreground leading-relaxed">{FILLER}</p>
                        </section>
                    }
                })
                .collect_view()}
        </article>
    }
}

/// Continuous mode: follows the raw percentage, throttled.
#[component]
pub fn ProgressPage() -> impl IntoView {
    let env = expect_context::<EnvConfig>();
    let config = env.progress_config();
    let throttle_ms = config.throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS);
    let tracker = use_scroll_tracker(
        UseScrollTrackerOptions::new(TrackerConfig::default()).throttle_ms(throttle_ms),
    );
    let scroll_y = tracker.scroll_y;

    view! {
        <ScrollProgress value=scroll_y phase=tracker.phase />
        <PageNav />
        <div class="fixed bottom-4 right-4 z-40 rounded-md border bg-background px-3 py-1 text-xs tabular-nums shadow-sm">
            {move || format_percent(scroll_y.get())}
        </div>
        <Article />
    }
}

/// Milestone mode: each depth fires once, then the listener goes away.
#[component]
pub fn MilestonesPage() -> impl IntoView {
    let env = expect_context::<EnvConfig>();
    let config = env.milestone_config();
    let depths = config.normalized_depths().unwrap_or_default();

    let log_lines = RwSignal::new(Vec::<String>::new());
    let push_line = move |line: String| {
        log::info!("{line}");
        log_lines.update(|lines| {
            lines.push(line);
            if lines.len() > MAX_LOG_LINES {
                lines.remove(0);
            }
        });
    };

    let tracker = use_scroll_tracker(
        UseScrollTrackerOptions::new(config).on_depth(move |e| push_line(describe(&e, "v1"))),
    );

    // Each swap installs a fresh closure; the scroll listener stays as is.
    let generation = RwSignal::new(1u32);
    let on_swap = move |_| {
        generation.update(|g| *g += 1);
        let label = format!("v{}", generation.get_untracked());
        tracker.set_callback(Some(Callback::new(move |e: ScrollDepthEvent| {
            push_line(describe(&e, &label))
        })));
    };
    let on_stop = move |_| tracker.stop();

    let remaining = tracker.remaining_depths;
    let is_active = move || tracker.phase.get() == TrackerPhase::Active;

    view! {
        <ScrollProgress value=tracker.scroll_y phase=tracker.phase />
        <PageNav />
        <header class="sticky top-14 z-30 mx-auto flex max-w-2xl flex-col gap-3 bg-background/95 px-6 py-4">
            <MilestoneList>
                {depths
                    .into_iter()
                    .map(|depth| {
                        let reached = Signal::derive(move || {
                            !remaining.with(|r| r.iter().any(|d| d.total_cmp(&depth).is_eq()))
                        });
                        view! { <MilestoneBadge depth=depth reached=reached /> }
                    })
                    .collect_view()}
            </MilestoneList>
            <div class="flex items-center gap-2">
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_swap>
                    "Swap callback"
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    on:click=on_stop
                    attr:disabled=move || !is_active()
                >
                    "Stop tracking"
                </Button>
                <span class="text-xs text-muted-foreground">
                    {move || format!("callback v{} / {}", generation.get(), tracker.phase.get())}
                </span>
            </div>
            <div class="w-full">
                <ScrollProgress value=tracker.scroll_y placement=ProgressPlacement::Inline />
            </div>
            <ol data-name="MilestoneLog" class="max-h-32 overflow-auto font-mono text-xs">
                <For each=move || log_lines.get().into_iter().enumerate() key=|(i, line)| (*i, line.clone()) let:item>
                    <li>{item.1}</li>
                </For>
            </ol>
        </header>
        <Article />
    }
}
