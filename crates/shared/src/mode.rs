use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::Bounds;
use crate::models::{LatLng, Photo};
use crate::viewport::{ScreenSize, Viewport};

/// Used when geolocation is unavailable or denied (Union Station, Los Angeles).
pub const FALLBACK_CENTER: LatLng = LatLng::new(34.056177, -118.236778);

/// Zoom for a nearby map.
pub const NEARBY_ZOOM: u8 = 10;

/// Fitting to recent photos never zooms in further than this; a single photo
/// would otherwise end up at street level.
pub const FIT_MAX_ZOOM: u8 = 12;

/// Storage key of the persisted mode flag.
pub const MODE_STORAGE_KEY: &str = "mm";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("unknown map mode: {0:?}")]
    UnknownLabel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapMode {
    /// Fit to the most recent uploads.
    #[default]
    Recent,
    /// Center on the visitor's location.
    Nearby,
}

impl MapMode {
    pub const ALL: [MapMode; 2] = [MapMode::Recent, MapMode::Nearby];

    pub fn label(self) -> &'static str {
        match self {
            MapMode::Recent => "recent",
            MapMode::Nearby => "nearby",
        }
    }

    /// Persisted representation: `0` for recent, `1` for nearby.
    pub fn flag(self) -> &'static str {
        match self {
            MapMode::Recent => "0",
            MapMode::Nearby => "1",
        }
    }

    /// Read a persisted flag. Missing or unreadable flags mean `Recent`.
    pub fn from_flag(flag: Option<&str>) -> MapMode {
        let Some(raw) = flag else {
            return MapMode::Recent;
        };
        match raw.trim().parse::<i64>() {
            Ok(0) => MapMode::Recent,
            Ok(_) => MapMode::Nearby,
            Err(_) => {
                tracing::warn!(flag = raw, "ignoring unreadable map mode flag");
                MapMode::Recent
            }
        }
    }
}

impl std::fmt::Display for MapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MapMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recent" => Ok(MapMode::Recent),
            "nearby" => Ok(MapMode::Nearby),
            other => Err(ModeError::UnknownLabel(other.to_string())),
        }
    }
}

/// Geolocation result, or the fallback when there is none.
pub fn nearby_center(located: Option<LatLng>) -> LatLng {
    located.unwrap_or(FALLBACK_CENTER)
}

pub fn nearby_view(located: Option<LatLng>) -> Viewport {
    Viewport::new(nearby_center(located), NEARBY_ZOOM)
}

/// Box around every recent photo that has coordinates.
pub fn recent_photo_bounds(photos: &[Photo]) -> Option<Bounds> {
    Bounds::from_points(photos.iter().filter_map(Photo::position))
}

/// Initial view for recent mode: fit to the photos, or the nearby fallback
/// when none of them can be placed.
pub fn recent_view(photos: &[Photo], size: ScreenSize) -> Viewport {
    match recent_photo_bounds(photos) {
        Some(bounds) => Viewport::fit_bounds(&bounds, size, FIT_MAX_ZOOM),
        None => nearby_view(None),
    }
}
