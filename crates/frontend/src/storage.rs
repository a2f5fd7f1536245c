use graff_shared::mode::{MapMode, MODE_STORAGE_KEY};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Last selected map mode, `Recent` if none was stored.
pub fn load_mode() -> MapMode {
    let flag = local_storage().and_then(|s| s.get_item(MODE_STORAGE_KEY).ok().flatten());
    MapMode::from_flag(flag.as_deref())
}

pub fn save_mode(mode: MapMode) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(MODE_STORAGE_KEY, mode.flag()).is_err() {
        dioxus::logger::tracing::warn!(%mode, "could not persist map mode");
    }
}
