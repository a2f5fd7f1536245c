use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use graff_shared::bounds::Bounds;
use graff_shared::info::InfoWindowContent;
use graff_shared::sync::MarkerSynchronizer;
use graff_shared::viewport::{ScreenSize, TileCoord, Viewport, MAX_ZOOM, MIN_ZOOM, TILE_SIZE};

use crate::components::info_window::InfoWindow;

const MAP_CONTAINER_ID: &str = "map-canvas";

/// Used until the container has been laid out.
const DEFAULT_SIZE: ScreenSize = ScreenSize::new(960.0, 600.0);

/// Drag threshold in pixels; movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Accumulated wheel delta that makes one zoom level.
const WHEEL_STEP: f64 = 100.0;

/// Quiet period after the last pan, zoom or resize before the owner is told.
const SETTLE_MS: u32 = 250;

/// Markers this far outside the container are not rendered.
const MARKER_MARGIN: f64 = 32.0;

const TILE_SERVER: &str = "https://tile.openstreetmap.org";

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Current size of the map container.
pub fn container_size() -> ScreenSize {
    match container_rect() {
        Some(rect) if rect.width() > 0.0 && rect.height() > 0.0 => {
            ScreenSize::new(rect.width(), rect.height())
        }
        _ => DEFAULT_SIZE,
    }
}

/// Client coordinates to container-relative coordinates.
fn to_container(client_x: f64, client_y: f64) -> Option<(f64, f64)> {
    let rect = container_rect()?;
    Some((client_x - rect.left(), client_y - rect.top()))
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Split an accumulated wheel delta into whole zoom steps and the leftover.
///
/// Scrolling up (negative delta) zooms in.
fn wheel_zoom_steps(accumulated: f64) -> (i32, f64) {
    let steps = (accumulated / WHEEL_STEP).trunc();
    (-(steps as i32), accumulated - steps * WHEEL_STEP)
}

fn step_zoom(zoom: u8, steps: i32) -> u8 {
    (zoom as i32 + steps).clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
}

fn tile_url(tile: &TileCoord) -> String {
    format!("{}/{}/{}/{}.png", TILE_SERVER, tile.z, tile.x, tile.y)
}

fn tile_style(tile: &TileCoord) -> String {
    format!(
        "left:{}px;top:{}px;width:{TILE_SIZE}px;height:{TILE_SIZE}px;",
        tile.screen_x, tile.screen_y
    )
}

fn point_style(x: f64, y: f64) -> String {
    format!("left:{:.1}px;top:{:.1}px;", x, y)
}

fn on_screen(x: f64, y: f64, size: ScreenSize) -> bool {
    x >= -MARKER_MARGIN
        && y >= -MARKER_MARGIN
        && x <= size.width + MARKER_MARGIN
        && y <= size.height + MARKER_MARGIN
}

/// Whether a container change is large enough to alter the visible area.
fn size_changed(old: ScreenSize, new: ScreenSize) -> bool {
    (old.width - new.width).abs() >= 1.0 || (old.height - new.height).abs() >= 1.0
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

struct RenderedMarker {
    id: String,
    style: String,
    selected: bool,
}

#[component]
pub fn MapView(
    view: Signal<Viewport>,
    sync: Signal<MarkerSynchronizer>,
    selected: Signal<Option<String>>,
    on_viewport_change: EventHandler<Bounds>,
) -> Element {
    // Signal is Copy; rebind so handlers can write through it
    let mut view = view;
    let mut selected = selected;

    let mut size = use_signal(|| DEFAULT_SIZE);

    // Mouse drag state
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_view = use_signal(|| *view.peek());

    // Touch state (single finger pan only)
    let mut touch_start = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);

    let mut wheel_accum = use_signal(|| 0.0_f64);

    // Bumped on every pan, zoom or resize; a pending settle only fires if it is
    // still the newest.
    let mut settle_generation = use_signal(|| 0_u64);

    let mut schedule_settle = move || {
        let generation = *settle_generation.peek() + 1;
        settle_generation.set(generation);
        spawn(async move {
            TimeoutFuture::new(SETTLE_MS).await;
            if *settle_generation.peek() != generation {
                return;
            }
            let bounds = view.peek().bounds(*size.peek());
            on_viewport_change.call(bounds);
        });
    };

    let cur_view = *view.read();
    let cur_size = *size.read();
    let dragging = *is_dragging.read();
    let cur_selected = selected.read().clone();

    let tiles: Vec<(String, String)> = cur_view
        .visible_tiles(cur_size)
        .iter()
        .map(|t| (tile_url(t), tile_style(t)))
        .collect();

    let (rendered, popup) = {
        let sync = sync.read();
        let rendered: Vec<RenderedMarker> = sync
            .markers()
            .iter()
            .filter_map(|m| {
                let (x, y) = cur_view.screen_position(m.position, cur_size);
                on_screen(x, y, cur_size).then(|| RenderedMarker {
                    id: m.photo_id().to_string(),
                    style: point_style(x, y),
                    selected: cur_selected.as_deref() == Some(m.photo_id()),
                })
            })
            .collect();
        let popup = cur_selected
            .as_deref()
            .and_then(|id| sync.marker(id))
            .map(|m| {
                let (x, y) = cur_view.screen_position(m.position, cur_size);
                (InfoWindowContent::for_photo(&m.photo), point_style(x, y))
            });
        (rendered, popup)
    };

    let container_class = if dragging {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                size.set(container_size());
            },

            onresize: move |_| {
                let new_size = container_size();
                if size_changed(*size.peek(), new_size) {
                    size.set(new_size);
                    schedule_settle();
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();

                let total = *wheel_accum.peek() + wheel_delta_y(evt.data().delta());
                let (steps, rest) = wheel_zoom_steps(total);
                wheel_accum.set(rest);
                if steps == 0 {
                    return;
                }

                let old = *view.peek();
                let new_zoom = step_zoom(old.zoom, steps);
                if new_zoom == old.zoom {
                    return;
                }
                let client = evt.data().client_coordinates();
                let Some(cursor) = to_container(client.x, client.y) else { return };
                view.set(old.zoom_at(cursor, *size.peek(), new_zoom));
                schedule_settle();
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_view.set(*view.peek());
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    view.set(drag_start_view.peek().pan_by(dx, dy));
                }
            },

            onmouseup: move |_| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                if was_dragging && was_drag {
                    schedule_settle();
                } else if was_dragging {
                    // A click on the map background closes the popup
                    selected.set(None);
                }
            },

            onmouseleave: move |_| {
                if *is_dragging.peek() && *did_drag.peek() {
                    schedule_settle();
                }
                is_dragging.set(false);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                let client = evt.client_coordinates();
                let Some(cursor) = to_container(client.x, client.y) else { return };
                let old = *view.peek();
                let new_zoom = step_zoom(old.zoom, 1);
                if new_zoom != old.zoom {
                    view.set(old.zoom_at(cursor, *size.peek(), new_zoom));
                    schedule_settle();
                }
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                if let [t] = touches.as_slice() {
                    let p = t.client_coordinates();
                    touch_start.set(Some((p.x, p.y)));
                    touch_did_pan.set(false);
                    drag_start_view.set(*view.peek());
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                let Some(start) = *touch_start.read() else { return };
                let touches = evt.data().touches();
                let [t] = touches.as_slice() else { return };
                evt.prevent_default();
                let p = t.client_coordinates();
                let cur = (p.x, p.y);
                if !*touch_did_pan.read() && point_distance(start, cur) > TOUCH_DRAG_THRESHOLD {
                    touch_did_pan.set(true);
                }
                if *touch_did_pan.read() {
                    view.set(drag_start_view.peek().pan_by(cur.0 - start.0, cur.1 - start.1));
                }
            },

            ontouchend: move |_| {
                if *touch_did_pan.peek() {
                    schedule_settle();
                }
                touch_start.set(None);
                touch_did_pan.set(false);
            },

            ontouchcancel: move |_| {
                touch_start.set(None);
                touch_did_pan.set(false);
            },

            div { class: "map-tiles",
                for (src, style) in tiles {
                    img {
                        key: "{src}@{style}",
                        class: "map-tile",
                        src: "{src}",
                        style: "{style}",
                        draggable: "false",
                        alt: "",
                    }
                }
            }

            div { class: "map-markers",
                for marker in rendered {
                    div {
                        key: "{marker.id}",
                        class: if marker.selected { "map-marker selected" } else { "map-marker" },
                        style: "{marker.style}",
                        title: "{marker.id}",
                        onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                        onclick: {
                            let id = marker.id.clone();
                            move |evt: Event<MouseData>| {
                                evt.stop_propagation();
                                selected.set(Some(id.clone()));
                            }
                        },
                    }
                }
            }

            if let Some((content, style)) = popup {
                InfoWindow { content, style }
            }

            div { class: "map-attribution",
                "© "
                a { href: "https://www.openstreetmap.org/copyright", target: "_blank", "OpenStreetMap" }
                " contributors"
            }
        }
    }
}
