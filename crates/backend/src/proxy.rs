use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Url;

/// Forwards photo searches to the upstream search service.
#[derive(Clone)]
pub struct PhotosProxy {
    client: reqwest::Client,
    upstream: Url,
}

impl PhotosProxy {
    pub fn new(upstream: Url) -> Self {
        PhotosProxy {
            client: reqwest::Client::new(),
            upstream,
        }
    }

    /// Upstream URL for a request with the given raw query string.
    pub fn target(&self, query: Option<&str>) -> Url {
        let mut url = self.upstream.clone();
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }
}

fn bad_gateway(message: String) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// `GET /photos?n=..&s=..&e=..&w=..`, passed through verbatim.
pub async fn search_photos(
    State(proxy): State<PhotosProxy>,
    RawQuery(query): RawQuery,
) -> Response {
    let url = proxy.target(query.as_deref());
    let started = Instant::now();

    let upstream = match proxy.client.get(url.clone()).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(%url, error = %e, "photo search upstream unreachable");
            return bad_gateway(format!("photo search unavailable: {}", e));
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let body: Bytes = match upstream.bytes().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(%url, error = %e, "photo search response truncated");
            return bad_gateway(format!("photo search failed: {}", e));
        }
    };

    tracing::info!(
        %url,
        status = status.as_u16(),
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "photo search"
    );

    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}
