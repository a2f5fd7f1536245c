use chrono::DateTime;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::models::Photo;

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Upload date as `YYYY-MM-DD` (UTC).
pub fn format_date(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

pub fn photo_page_url(photo_id: &str) -> String {
    format!("/photo/{}", encode_segment(photo_id))
}

/// Medium-size thumbnail used in the popup.
pub fn medium_thumbnail_url(photo_id: &str) -> String {
    format!("/p/{}.m", encode_segment(photo_id))
}

/// Tiny thumbnail used in the uploads list.
pub fn tiny_thumbnail_url(photo_id: &str) -> String {
    format!("/p/{}.t", encode_segment(photo_id))
}

pub fn user_page_url(user: &str) -> String {
    format!("/user/{}", encode_segment(user))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLink {
    pub name: String,
    pub href: String,
}

impl UserLink {
    pub fn new(name: &str) -> Self {
        UserLink {
            name: name.to_string(),
            href: user_page_url(name),
        }
    }
}

/// Everything the marker popup shows for one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoWindowContent {
    pub photo_id: String,
    pub thumbnail_url: String,
    pub uploaded: String,
    pub user: Option<UserLink>,
    /// Where a click on the popup leads.
    pub detail_url: String,
}

impl InfoWindowContent {
    pub fn for_photo(photo: &Photo) -> Self {
        InfoWindowContent {
            photo_id: photo.id.clone(),
            thumbnail_url: medium_thumbnail_url(&photo.id),
            uploaded: format!("Uploaded {}", format_date(photo.time_created)),
            user: photo.user.as_deref().map(UserLink::new),
            detail_url: photo_page_url(&photo.id),
        }
    }
}

/// One row of the uploads list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    pub photo_id: String,
    pub thumbnail_url: String,
    pub detail_url: String,
    pub time_ago: String,
    pub user: Option<UserLink>,
}

impl UploadEntry {
    pub fn for_photo(photo: &Photo) -> Self {
        UploadEntry {
            photo_id: photo.id.clone(),
            thumbnail_url: tiny_thumbnail_url(&photo.id),
            detail_url: photo_page_url(&photo.id),
            time_ago: photo
                .time_ago
                .clone()
                .unwrap_or_else(|| format_date(photo.time_created)),
            user: photo.user.as_deref().map(UserLink::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(user: Option<&str>) -> Photo {
        Photo {
            id: "xY9".to_string(),
            latitude: Some(34.5),
            longitude: Some(-118.5),
            // 2011-05-03 00:00:00 UTC
            time_created: 1_304_380_800,
            user: user.map(str::to_string),
            time_ago: None,
        }
    }

    #[test]
    fn test_format_date_zero_pads() {
        assert_eq!(format_date(1_304_380_800), "2011-05-03");
        assert_eq!(format_date(0), "1970-01-01");
    }

    #[test]
    fn test_format_date_out_of_range() {
        assert_eq!(format_date(i64::MAX), "unknown");
    }

    #[test]
    fn test_info_window_with_user() {
        let info = InfoWindowContent::for_photo(&photo(Some("evan")));
        assert_eq!(info.thumbnail_url, "/p/xY9.m");
        assert_eq!(info.uploaded, "Uploaded 2011-05-03");
        assert_eq!(info.detail_url, "/photo/xY9");
        assert_eq!(
            info.user,
            Some(UserLink {
                name: "evan".to_string(),
                href: "/user/evan".to_string()
            })
        );
    }

    #[test]
    fn test_info_window_anonymous() {
        let info = InfoWindowContent::for_photo(&photo(None));
        assert!(info.user.is_none());
    }

    #[test]
    fn test_user_link_is_percent_encoded() {
        let link = UserLink::new("da vinci/<3>");
        assert_eq!(link.href, "/user/da%20vinci%2F%3C3%3E");
        assert_eq!(link.name, "da vinci/<3>");
    }

    #[test]
    fn test_upload_entry_prefers_server_time_ago() {
        let mut p = photo(None);
        assert_eq!(UploadEntry::for_photo(&p).time_ago, "2011-05-03");
        p.time_ago = Some("5 minutes ago".to_string());
        let entry = UploadEntry::for_photo(&p);
        assert_eq!(entry.time_ago, "5 minutes ago");
        assert_eq!(entry.thumbnail_url, "/p/xY9.t");
    }
}
