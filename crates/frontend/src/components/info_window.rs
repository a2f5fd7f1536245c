use dioxus::prelude::*;
use graff_shared::info::InfoWindowContent;

fn navigate(href: &str) {
    let Some(window) = web_sys::window() else { return };
    if window.location().set_href(href).is_err() {
        dioxus::logger::tracing::warn!(href, "navigation failed");
    }
}

/// Popup anchored at a marker. Clicking anywhere on it opens the photo page.
#[component]
pub fn InfoWindow(content: InfoWindowContent, style: String) -> Element {
    let detail_url = content.detail_url.clone();

    rsx! {
        div {
            class: "info-window",
            style: "{style}",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                navigate(&detail_url);
            },
            img {
                class: "info-thumb",
                src: "{content.thumbnail_url}",
                alt: "photo {content.photo_id}",
                draggable: "false",
            }
            div { class: "info-meta",
                span { class: "info-date", "{content.uploaded}" }
                if let Some(user) = &content.user {
                    a {
                        class: "info-user",
                        href: "{user.href}",
                        // Let the user link win over the popup click-through
                        onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                        "{user.name}"
                    }
                }
            }
        }
    }
}
