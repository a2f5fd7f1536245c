use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A photo record as returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Upload time, unix seconds.
    pub time_created: i64,
    #[serde(default)]
    pub user: Option<String>,
    /// Server-formatted relative age ("3 hours ago").
    #[serde(default)]
    pub time_ago: Option<String>,
}

impl Photo {
    /// The photo's location, if it carries both coordinates.
    pub fn position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(LatLng::new(lat, lng))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotosResponse {
    pub photos: Vec<Photo>,
    /// Time the server spent on the search, in milliseconds.
    #[serde(default)]
    pub time_ms: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photos_response_deserializes() {
        let json = r#"{"photos":[{"id":"aB3x","latitude":34.5,"longitude":-118.5,"time_created":1304380800,"user":"evan","time_ago":"2 days ago"}],"time_ms":4.2}"#;
        let resp: PhotosResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.photos.len(), 1);
        assert_eq!(resp.photos[0].id, "aB3x");
        assert_eq!(resp.photos[0].user.as_deref(), Some("evan"));
        assert_eq!(resp.time_ms, Some(4.2));
    }

    #[test]
    fn test_photo_optional_fields_default() {
        let json = r#"{"photos":[{"id":"q","time_created":0}]}"#;
        let resp: PhotosResponse = serde_json::from_str(json).unwrap();
        let photo = &resp.photos[0];
        assert!(photo.user.is_none());
        assert!(photo.time_ago.is_none());
        assert!(photo.position().is_none());
        assert!(resp.time_ms.is_none());
    }

    #[test]
    fn test_photo_null_coordinates() {
        let json = r#"{"id":"q","latitude":null,"longitude":-118.0,"time_created":0}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert!(photo.position().is_none());
    }

    #[test]
    fn test_photo_position() {
        let photo = Photo {
            id: "1".to_string(),
            latitude: Some(34.5),
            longitude: Some(-118.5),
            time_created: 0,
            user: None,
            time_ago: None,
        };
        assert_eq!(photo.position(), Some(LatLng::new(34.5, -118.5)));
    }

    #[test]
    fn test_latlng_display() {
        assert_eq!(
            LatLng::new(34.056177, -118.236778).to_string(),
            "34.0562, -118.2368"
        );
    }
}
