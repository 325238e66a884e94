use crate::config::EnvConfig;
use crate::pages::{MilestonesPage, ProgressPage};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(EnvConfig::new());

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("milestones") view=MilestonesPage />
                <Route path=path!("") view=ProgressPage />
            </Routes>
        </Router>
    }
}
