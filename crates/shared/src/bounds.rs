use serde::{Deserialize, Serialize};

use crate::models::LatLng;

/// A lat/lng rectangle.
///
/// When `west > east` the box crosses the antimeridian and longitude
/// containment wraps around ±180.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Bounds {
            north,
            south,
            east,
            west,
        }
    }

    /// Build from the south-west and north-east corners.
    pub fn from_corners(sw: LatLng, ne: LatLng) -> Self {
        Bounds::new(ne.lat, sw.lat, ne.lng, sw.lng)
    }

    /// Degenerate box around a single point.
    pub fn from_point(p: LatLng) -> Self {
        Bounds::new(p.lat, p.lat, p.lng, p.lng)
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Bounds::from_point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: LatLng) -> bool {
        if p.lat < self.south || p.lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            p.lng >= self.west || p.lng <= self.east
        } else {
            p.lng >= self.west && p.lng <= self.east
        }
    }

    /// Grow the box to include `p`. Longitudes are extended without wrapping.
    pub fn extend(&mut self, p: LatLng) {
        self.north = self.north.max(p.lat);
        self.south = self.south.min(p.lat);
        self.east = self.east.max(p.lng);
        self.west = self.west.min(p.lng);
    }

    pub fn center(&self) -> LatLng {
        let lat = (self.north + self.south) / 2.0;
        let lng = if self.crosses_antimeridian() {
            wrap_lng((self.west + self.east + 360.0) / 2.0)
        } else {
            (self.west + self.east) / 2.0
        };
        LatLng::new(lat, lng)
    }

    /// Query parameters understood by the photo search endpoint.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("n", self.north.to_string()),
            ("s", self.south.to_string()),
            ("e", self.east.to_string()),
            ("w", self.west.to_string()),
        ]
    }
}

/// Normalize a longitude into [-180, 180].
pub fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn la_box() -> Bounds {
        Bounds::new(35.0, 34.0, -118.0, -119.0)
    }

    #[test]
    fn test_contains_inside() {
        assert!(la_box().contains(LatLng::new(34.5, -118.5)));
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let b = la_box();
        assert!(b.contains(LatLng::new(35.0, -118.0)));
        assert!(b.contains(LatLng::new(34.0, -119.0)));
    }

    #[test]
    fn test_contains_outside() {
        let b = la_box();
        assert!(!b.contains(LatLng::new(35.1, -118.5)));
        assert!(!b.contains(LatLng::new(34.5, -117.9)));
        assert!(!b.contains(LatLng::new(33.9, -119.5)));
    }

    #[test]
    fn test_contains_across_antimeridian() {
        let b = Bounds::new(10.0, -10.0, -170.0, 170.0);
        assert!(b.crosses_antimeridian());
        assert!(b.contains(LatLng::new(0.0, 175.0)));
        assert!(b.contains(LatLng::new(0.0, -175.0)));
        assert!(!b.contains(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Bounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_from_points_spans_all() {
        let b = Bounds::from_points(vec![
            LatLng::new(34.0, -118.0),
            LatLng::new(35.5, -119.2),
            LatLng::new(34.7, -117.5),
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(35.5, 34.0, -117.5, -119.2));
    }

    #[test]
    fn test_from_corners() {
        let b = Bounds::from_corners(LatLng::new(34.0, -119.0), LatLng::new(35.0, -118.0));
        assert_eq!(b, la_box());
        assert_eq!(b.south_west(), LatLng::new(34.0, -119.0));
        assert_eq!(b.north_east(), LatLng::new(35.0, -118.0));
    }

    #[test]
    fn test_center() {
        let c = la_box().center();
        assert!((c.lat - 34.5).abs() < 1e-9);
        assert!((c.lng + 118.5).abs() < 1e-9);
    }

    #[test]
    fn test_center_across_antimeridian() {
        let c = Bounds::new(10.0, -10.0, -170.0, 170.0).center();
        assert!((c.lng.abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_pairs_order() {
        let pairs = la_box().query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["n", "s", "e", "w"]);
        assert_eq!(pairs[0].1, "35");
        assert_eq!(pairs[3].1, "-119");
    }

    #[test]
    fn test_wrap_lng() {
        assert!((wrap_lng(190.0) + 170.0).abs() < 1e-9);
        assert!((wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_lng(45.0) - 45.0).abs() < 1e-9);
        assert!((wrap_lng(180.0) - 180.0).abs() < 1e-9);
        assert!((wrap_lng(-180.0) + 180.0).abs() < 1e-9);
    }
}
