use dioxus::prelude::*;
use graff_shared::info::UploadEntry;
use graff_shared::sync::MarkerSynchronizer;

/// Sidebar mirroring the marker set, newest first.
#[component]
pub fn UploadsList(sync: Signal<MarkerSynchronizer>, selected: Signal<Option<String>>) -> Element {
    let entries: Vec<UploadEntry> = sync
        .read()
        .markers()
        .iter()
        .rev()
        .map(|m| UploadEntry::for_photo(&m.photo))
        .collect();
    let cur_selected = selected.read().clone();

    rsx! {
        div { class: "panel uploads",
            h3 { "Uploads" }
            if entries.is_empty() {
                p { class: "hint", "No photos in this area yet." }
            }
            ul { id: "uploads",
                for entry in entries {
                    li {
                        key: "{entry.photo_id}",
                        id: "li_{entry.photo_id}",
                        class: if cur_selected.as_deref() == Some(entry.photo_id.as_str()) { "mapLi selected" } else { "mapLi" },
                        a { href: "{entry.detail_url}",
                            img { src: "{entry.thumbnail_url}", alt: "" }
                        }
                        span { class: "time-ago", "{entry.time_ago}" }
                        if let Some(user) = &entry.user {
                            a { class: "user", href: "{user.href}", "{user.name}" }
                        }
                    }
                }
            }
        }
    }
}
