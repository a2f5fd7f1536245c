use graff_shared::models::PhotosResponse;
use graff_shared::search::{photos_url, SearchParams};

fn origin() -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    window
        .location()
        .origin()
        .map_err(|_| "page origin unavailable".to_string())
}

/// Describe a non-success search response.
pub fn status_error(status: u16) -> String {
    format!("photo search returned HTTP {}", status)
}

/// Query the photo search endpoint.
pub async fn fetch_photos(params: &SearchParams) -> Result<PhotosResponse, String> {
    let url = photos_url(&origin()?, params).map_err(|e| e.to_string())?;

    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    if !status.is_success() {
        return Err(status_error(status.as_u16()));
    }

    resp.json::<PhotosResponse>()
        .await
        .map_err(|e| e.to_string())
}
