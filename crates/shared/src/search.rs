use thiserror::Error;
use url::Url;

use crate::bounds::Bounds;

/// Path of the photo search endpoint.
pub const PHOTOS_PATH: &str = "/photos";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid origin {origin:?}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
}

/// Parameters of one photo search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    /// Restrict results to this box; `None` asks for the most recent uploads.
    pub bounds: Option<Bounds>,
    /// Extra filter parameters passed through untouched.
    pub filters: Vec<(String, String)>,
}

impl SearchParams {
    pub fn recent() -> Self {
        Self::default()
    }

    pub fn within(bounds: Bounds) -> Self {
        SearchParams {
            bounds: Some(bounds),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

/// Absolute search URL for `origin` (e.g. `https://example.com`).
pub fn photos_url(origin: &str, params: &SearchParams) -> Result<Url, SearchError> {
    let mut url = Url::parse(origin)
        .and_then(|base| base.join(PHOTOS_PATH))
        .map_err(|source| SearchError::InvalidOrigin {
            origin: origin.to_string(),
            source,
        })?;

    if params.bounds.is_some() || !params.filters.is_empty() {
        let mut query = url.query_pairs_mut();
        if let Some(bounds) = params.bounds {
            for (key, value) in bounds.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        for (key, value) in &params.filters {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Timings shown after a search in debug builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTiming {
    /// Reported by the server.
    pub server_ms: Option<f64>,
    /// Request sent to response decoded.
    pub roundtrip_ms: f64,
    /// Request sent to markers reconciled.
    pub total_ms: f64,
}

impl std::fmt::Display for SearchTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let server = match self.server_ms {
            Some(ms) => format!("{}", ms as i64),
            None => "?".to_string(),
        };
        write!(
            f,
            "search completed in {} / {} / {} ms",
            server, self.roundtrip_ms as i64, self.total_ms as i64
        )
    }
}
