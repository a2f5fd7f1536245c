use std::path::PathBuf;

use reqwest::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:8000/photos";

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Built frontend bundle (`index.html`, wasm, js).
    pub dist_dir: PathBuf,
    /// Files served under `/static`.
    pub assets_dir: PathBuf,
    /// Photo search service that `/photos` is forwarded to.
    pub photos_upstream: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("Invalid PORT {:?}: {}", raw, e))?,
            None => DEFAULT_PORT,
        };
        let upstream = lookup("PHOTOS_UPSTREAM").unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());
        let photos_upstream = Url::parse(&upstream)
            .map_err(|e| format!("Invalid PHOTOS_UPSTREAM {:?}: {}", upstream, e))?;

        Ok(Config {
            port,
            dist_dir: PathBuf::from(lookup("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
            assets_dir: PathBuf::from(lookup("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
            photos_upstream,
        })
    }
}
