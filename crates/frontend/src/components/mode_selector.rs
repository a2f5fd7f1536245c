use dioxus::prelude::*;
use graff_shared::mode::MapMode;

/// One button per map mode. Reports the clicked label; parsing happens upstream.
#[component]
pub fn ModeSelector(current: MapMode, on_select: EventHandler<String>) -> Element {
    rsx! {
        div { class: "panel mode-selector",
            for mode in MapMode::ALL {
                button {
                    class: if mode == current { "map_mode selected_mode" } else { "map_mode" },
                    onclick: move |_| on_select.call(mode.label().to_string()),
                    {mode.label()}
                }
            }
        }
    }
}
