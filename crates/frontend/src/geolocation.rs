use graff_shared::models::LatLng;
use js_sys::{Promise, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

fn read_number(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

/// Ask the browser for the visitor's position.
///
/// Returns `None` when geolocation is unsupported, denied, or fails.
pub async fn current_position() -> Option<LatLng> {
    let geolocation = web_sys::window()?.navigator().geolocation().ok()?;

    let promise = Promise::new(&mut |resolve, reject| {
        if let Err(err) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject)) {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });

    let position = match JsFuture::from(promise).await {
        Ok(position) => position,
        Err(err) => {
            let reason = read_number(&err, "code")
                .map(|code| format!("error code {}", code))
                .unwrap_or_else(|| "unknown error".to_string());
            dioxus::logger::tracing::info!(%reason, "geolocation unavailable, using fallback");
            return None;
        }
    };

    let coords = Reflect::get(&position, &JsValue::from_str("coords")).ok()?;
    let lat = read_number(&coords, "latitude")?;
    let lng = read_number(&coords, "longitude")?;
    Some(LatLng::new(lat, lng))
}
