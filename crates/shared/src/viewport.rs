//! Web Mercator viewport math for the slippy map.
//!
//! World pixel space at zoom `z` is a square of `TILE_SIZE * 2^z` pixels with
//! the origin at the north-west corner (lng -180, lat ~85.05). Screen space is
//! relative to the top-left corner of the map container.
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::bounds::{wrap_lng, Bounds};
use crate::models::LatLng;

pub const TILE_SIZE: f64 = 256.0;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Latitude limit of the square Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Padding kept around fitted bounds, in screen pixels per side.
const FIT_PADDING: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub const fn new(width: f64, height: f64) -> Self {
        ScreenSize { width, height }
    }
}

/// One map tile and where its top-left corner lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
    pub screen_x: i64,
    pub screen_y: i64,
}

/// Side length of the world square at `zoom`, in pixels. Zooms past
/// [`MAX_ZOOM`] are treated as `MAX_ZOOM`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(MAX_ZOOM))
}

/// Project a point to world pixels at `zoom`.
pub fn project(p: LatLng, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let x = (p.lng + 180.0) / 360.0 * size;
    let siny = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();
    let y = (0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// Inverse of [`project`]. The longitude is wrapped into [-180, 180].
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = wrap_lng(x / size * 360.0 - 180.0);
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lng)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Viewport {
            center: LatLng::new(
                center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
                wrap_lng(center.lng),
            ),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    fn center_px(&self) -> (f64, f64) {
        project(self.center, self.zoom)
    }

    /// The visible area for a container of `size`.
    pub fn bounds(&self, size: ScreenSize) -> Bounds {
        let (cx, cy) = self.center_px();
        let world = world_size(self.zoom);
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;

        let north = unproject(cx, (cy - half_h).max(0.0), self.zoom).lat;
        let south = unproject(cx, (cy + half_h).min(world), self.zoom).lat;

        let (west, east) = if size.width >= world {
            (-180.0, 180.0)
        } else {
            (
                unproject(cx - half_w, cy, self.zoom).lng,
                unproject(cx + half_w, cy, self.zoom).lng,
            )
        };
        Bounds::new(north, south, east, west)
    }

    /// Screen position of `p`, choosing the world copy nearest the center.
    pub fn screen_position(&self, p: LatLng, size: ScreenSize) -> (f64, f64) {
        let (cx, cy) = self.center_px();
        let (px, py) = project(p, self.zoom);
        let world = world_size(self.zoom);
        let mut dx = px - cx;
        if dx > world / 2.0 {
            dx -= world;
        } else if dx < -world / 2.0 {
            dx += world;
        }
        (size.width / 2.0 + dx, size.height / 2.0 + (py - cy))
    }

    /// Move the map content by `(dx, dy)` screen pixels, as a drag does.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Viewport {
        let (cx, cy) = self.center_px();
        let world = world_size(self.zoom);
        let y = (cy - dy).clamp(0.0, world);
        Viewport::new(unproject(cx - dx, y, self.zoom), self.zoom)
    }

    /// Change zoom while keeping the point under `cursor` fixed on screen.
    pub fn zoom_at(&self, cursor: (f64, f64), size: ScreenSize, zoom: u8) -> Viewport {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return *self;
        }
        let off_x = cursor.0 - size.width / 2.0;
        let off_y = cursor.1 - size.height / 2.0;
        let (cx, cy) = self.center_px();
        let anchor = unproject(cx + off_x, cy + off_y, self.zoom);

        let (ax, ay) = project(anchor, zoom);
        let world = world_size(zoom);
        let new_center = unproject(ax - off_x, (ay - off_y).clamp(0.0, world), zoom);
        Viewport::new(new_center, zoom)
    }

    /// Largest zoom (at most `max_zoom`) at which `bounds` fits in `size`.
    pub fn fit_bounds(bounds: &Bounds, size: ScreenSize, max_zoom: u8) -> Viewport {
        let max_zoom = max_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let avail_w = (size.width - 2.0 * FIT_PADDING).max(1.0);
        let avail_h = (size.height - 2.0 * FIT_PADDING).max(1.0);

        let mut zoom = max_zoom;
        while zoom > MIN_ZOOM {
            let (x0, y0) = project(bounds.south_west(), zoom);
            let (x1, y1) = project(bounds.north_east(), zoom);
            let mut span_x = x1 - x0;
            if span_x < 0.0 {
                span_x += world_size(zoom);
            }
            let span_y = (y0 - y1).abs();
            if span_x <= avail_w && span_y <= avail_h {
                break;
            }
            zoom -= 1;
        }

        // Center in projected space so the box sits in the middle on screen.
        let (x0, y0) = project(bounds.south_west(), zoom);
        let (x1, y1) = project(bounds.north_east(), zoom);
        let mut x1 = x1;
        if x1 < x0 {
            x1 += world_size(zoom);
        }
        let center = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0, zoom);
        Viewport::new(center, zoom)
    }

    /// Tiles covering a container of `size`, with their screen offsets.
    pub fn visible_tiles(&self, size: ScreenSize) -> Vec<TileCoord> {
        let (cx, cy) = self.center_px();
        let left = cx - size.width / 2.0;
        let top = cy - size.height / 2.0;
        let zoom = self.zoom.min(MAX_ZOOM);
        let tiles_per_side = 1i64 << zoom;

        let first_x = (left / TILE_SIZE).floor() as i64;
        let last_x = ((left + size.width) / TILE_SIZE).floor() as i64;
        let first_y = ((top / TILE_SIZE).floor() as i64).max(0);
        let last_y = (((top + size.height) / TILE_SIZE).floor() as i64).min(tiles_per_side - 1);

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                tiles.push(TileCoord {
                    x: tx.rem_euclid(tiles_per_side) as u32,
                    y: ty as u32,
                    z: zoom,
                    screen_x: (tx as f64 * TILE_SIZE - left).round() as i64,
                    screen_y: (ty as f64 * TILE_SIZE - top).round() as i64,
                });
            }
        }
        tiles
    }
}
