use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use graff_shared::bounds::Bounds;
use graff_shared::mode::{self, MapMode};
use graff_shared::search::{SearchParams, SearchTiming};
use graff_shared::sync::MarkerSynchronizer;
use graff_shared::viewport::Viewport;

use crate::api;
use crate::components::map_view::{container_size, MapView};
use crate::components::mode_selector::ModeSelector;
use crate::components::uploads_list::UploadsList;
use crate::geolocation;
use crate::storage;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub fn Home() -> Element {
    let mut mode = use_signal(storage::load_mode);
    let mut view = use_signal(|| mode::nearby_view(None));
    let mut sync = use_signal(MarkerSynchronizer::new);
    let mut selected = use_signal(|| None::<String>);
    let mut timing = use_signal(|| None::<SearchTiming>);
    let mut ready = use_signal(|| false);

    // Bumped on every mode change so a slow geolocation or recent-photos
    // lookup cannot override a newer choice.
    let mut mode_generation = use_signal(|| 0_u64);

    // Search the box and reconcile markers with whatever comes back.
    let mut refresh = move |bounds: Bounds| {
        let ticket = sync.write().begin_query(bounds);
        spawn(async move {
            let started = now_ms();
            let resp = match api::fetch_photos(&SearchParams::within(ticket.bounds())).await {
                Ok(resp) => resp,
                Err(e) => {
                    // Markers stay as they are until the next viewport change
                    warn!(error = %e, "photo search failed");
                    return;
                }
            };
            let fetched = now_ms();

            let Some(outcome) = sync.write().apply(ticket, &resp.photos) else {
                debug!("dropping stale search response");
                return;
            };

            let gone = selected
                .peek()
                .as_deref()
                .is_some_and(|id| outcome.removed.iter().any(|r| r == id));
            if gone {
                selected.set(None);
            }

            if cfg!(debug_assertions) {
                timing.set(Some(SearchTiming {
                    server_ms: resp.time_ms,
                    roundtrip_ms: fetched - started,
                    total_ms: now_ms() - started,
                }));
            }
        });
    };

    // Position the map for the current mode, then load its markers.
    use_effect(move || {
        let current = *mode.read();
        let generation = *mode_generation.peek() + 1;
        mode_generation.set(generation);

        sync.write().reset();
        selected.set(None);

        spawn(async move {
            let size = container_size();
            let target: Viewport = match current {
                MapMode::Recent => match api::fetch_photos(&SearchParams::recent()).await {
                    Ok(resp) => mode::recent_view(&resp.photos, size),
                    Err(e) => {
                        warn!(error = %e, "recent photos unavailable");
                        mode::nearby_view(None)
                    }
                },
                MapMode::Nearby => mode::nearby_view(geolocation::current_position().await),
            };

            if *mode_generation.peek() != generation {
                return;
            }
            debug!(mode = %current, center = %target.center, zoom = target.zoom, "positioning map");
            view.set(target);
            ready.set(true);
            refresh(target.bounds(size));
        });
    });

    let on_mode_select = move |label: String| match label.parse::<MapMode>() {
        Ok(m) => {
            storage::save_mode(m);
            mode.set(m);
        }
        Err(e) => alert(&e.to_string()),
    };

    let current_mode = *mode.read();
    let marker_count = sync.read().len();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Graffiti Map" }
                ModeSelector { current: current_mode, on_select: on_mode_select }
            }

            div { class: "sidebar",
                UploadsList { sync, selected }
                if cfg!(debug_assertions) {
                    if let Some(t) = *timing.read() {
                        div { id: "time_elapsed", class: "timing", "{t}" }
                    }
                }
            }

            div { class: "map-area",
                MapView {
                    view,
                    sync,
                    selected,
                    on_viewport_change: move |bounds: Bounds| refresh(bounds),
                }
                if !*ready.read() {
                    div { class: "map-loading", "Loading map…" }
                }
                div { class: "map-status", "{marker_count} photos in view" }
            }
        }
    }
}
