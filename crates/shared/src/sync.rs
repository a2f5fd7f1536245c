//! Keeps the on-screen marker set in step with a sliding bounding box.
//!
//! Each viewport change takes a [`QueryTicket`] before the search request is
//! sent. Only the response for the newest ticket is reconciled; anything that
//! arrives for a superseded ticket is dropped.
use std::collections::HashSet;

use crate::bounds::Bounds;
use crate::models::{LatLng, Photo};

/// A displayed marker, bound to one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub photo: Photo,
    pub position: LatLng,
}

impl Marker {
    pub fn photo_id(&self) -> &str {
        &self.photo.id
    }
}

/// Handle for one in-flight search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryTicket {
    seq: u64,
    bounds: Bounds,
}

impl QueryTicket {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// What one reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Returned photos that were outside the box or had no coordinates.
    pub discarded: usize,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkerSynchronizer {
    /// In insertion order; the newest marker is last.
    markers: Vec<Marker>,
    previous_bounds: Option<Bounds>,
    latest_seq: u64,
}

impl MarkerSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Box of the last reconciled query.
    pub fn previous_bounds(&self) -> Option<Bounds> {
        self.previous_bounds
    }

    pub fn marker(&self, photo_id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.photo.id == photo_id)
    }

    /// Register a new search for `bounds`, superseding all earlier ones.
    pub fn begin_query(&mut self, bounds: Bounds) -> QueryTicket {
        self.latest_seq += 1;
        QueryTicket {
            seq: self.latest_seq,
            bounds,
        }
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Reconcile the response for `ticket`, or return `None` if a newer
    /// query has been issued since.
    pub fn apply(&mut self, ticket: QueryTicket, photos: &[Photo]) -> Option<Reconciliation> {
        if !self.is_current(&ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "dropping response for superseded query"
            );
            return None;
        }
        Some(self.reconcile(ticket.bounds, photos))
    }

    /// Make the marker set equal to the photos in `photos` that lie inside
    /// `bounds`, touching only markers that actually change.
    pub fn reconcile(&mut self, bounds: Bounds, photos: &[Photo]) -> Reconciliation {
        let mut result = Reconciliation::default();

        let mut in_box: Vec<(&Photo, LatLng)> = Vec::with_capacity(photos.len());
        let mut returned: HashSet<&str> = HashSet::with_capacity(photos.len());
        for photo in photos {
            match photo.position() {
                Some(pos) if bounds.contains(pos) => {
                    if returned.insert(photo.id.as_str()) {
                        in_box.push((photo, pos));
                    }
                }
                Some(pos) => {
                    tracing::warn!(photo = %photo.id, position = %pos, "search returned a photo outside the requested box");
                    result.discarded += 1;
                }
                None => {
                    tracing::warn!(photo = %photo.id, "search returned a photo without coordinates");
                    result.discarded += 1;
                }
            }
        }

        // Drop markers that left the box or are no longer in the results.
        let mut removed = Vec::new();
        self.markers.retain(|m| {
            let keep = bounds.contains(m.position) && returned.contains(m.photo.id.as_str());
            if !keep {
                tracing::debug!(photo = %m.photo.id, "removing photo");
                removed.push(m.photo.id.clone());
            }
            keep
        });
        result.removed = removed;

        let shown: HashSet<String> = self.markers.iter().map(|m| m.photo.id.clone()).collect();
        for (photo, position) in in_box {
            if shown.contains(&photo.id) {
                continue;
            }
            tracing::debug!(photo = %photo.id, "adding photo");
            result.added.push(photo.id.clone());
            self.markers.push(Marker {
                photo: photo.clone(),
                position,
            });
        }

        self.previous_bounds = Some(bounds);

        if !result.is_noop() || result.discarded > 0 {
            tracing::info!(
                added = result.added.len(),
                removed = result.removed.len(),
                discarded = result.discarded,
                shown = self.markers.len(),
                "reconciled markers"
            );
        }
        result
    }

    /// Remove every marker and invalidate in-flight queries.
    pub fn reset(&mut self) -> Vec<String> {
        self.latest_seq += 1;
        self.previous_bounds = None;
        self.markers.drain(..).map(|m| m.photo.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, lat: f64, lng: f64) -> Photo {
        Photo {
            id: id.to_string(),
            latitude: Some(lat),
            longitude: Some(lng),
            time_created: 1_304_380_800,
            user: None,
            time_ago: None,
        }
    }

    fn shown_ids(sync: &MarkerSynchronizer) -> Vec<&str> {
        sync.markers().iter().map(|m| m.photo_id()).collect()
    }

    const LA: Bounds = Bounds::new(35.0, 34.0, -118.0, -119.0);

    #[test]
    fn test_first_query_adds_marker() {
        let mut sync = MarkerSynchronizer::new();
        let rec = sync.reconcile(LA, &[photo("1", 34.5, -118.5)]);
        assert_eq!(rec.added, vec!["1"]);
        assert!(rec.removed.is_empty());
        assert_eq!(shown_ids(&sync), vec!["1"]);
        assert_eq!(sync.previous_bounds(), Some(LA));
    }

    #[test]
    fn test_shrunk_box_with_no_results_removes_marker() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5)]);

        let next = Bounds::new(35.0, 34.4, -118.0, -119.0);
        let rec = sync.reconcile(next, &[]);
        assert_eq!(rec.removed, vec!["1"]);
        assert!(rec.added.is_empty());
        assert!(sync.is_empty());
        assert_eq!(sync.previous_bounds(), Some(next));
    }

    #[test]
    fn test_marker_outside_new_box_removed_even_if_returned() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5)]);

        let next = Bounds::new(35.0, 34.6, -118.0, -119.0);
        let rec = sync.reconcile(next, &[photo("1", 34.5, -118.5)]);
        assert_eq!(rec.removed, vec!["1"]);
        assert_eq!(rec.discarded, 1);
        assert!(sync.is_empty());
    }

    #[test]
    fn test_unchanged_query_is_idempotent() {
        let mut sync = MarkerSynchronizer::new();
        let photos = vec![photo("1", 34.5, -118.5), photo("2", 34.2, -118.9)];
        sync.reconcile(LA, &photos);

        let rec = sync.reconcile(LA, &photos);
        assert!(rec.is_noop());
        assert_eq!(shown_ids(&sync), vec!["1", "2"]);
    }

    #[test]
    fn test_pan_keeps_overlapping_markers_in_place() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5), photo("2", 34.1, -118.9)]);

        // Pan east by half a degree: photo 2 leaves, photo 3 enters.
        let east = Bounds::new(35.0, 34.0, -117.5, -118.5);
        let rec = sync.reconcile(east, &[photo("1", 34.5, -118.5), photo("3", 34.3, -117.7)]);
        assert_eq!(rec.removed, vec!["2"]);
        assert_eq!(rec.added, vec!["3"]);
        assert_eq!(shown_ids(&sync), vec!["1", "3"]);
    }

    #[test]
    fn test_backfills_photo_in_previous_box_not_yet_shown() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5)]);

        // A newer upload inside the old box shows up on the next query.
        let rec = sync.reconcile(LA, &[photo("1", 34.5, -118.5), photo("9", 34.6, -118.4)]);
        assert_eq!(rec.added, vec!["9"]);
        assert!(rec.removed.is_empty());
    }

    #[test]
    fn test_out_of_box_and_coordinate_less_photos_discarded() {
        let mut sync = MarkerSynchronizer::new();
        let mut no_coords = photo("3", 0.0, 0.0);
        no_coords.latitude = None;
        let rec = sync.reconcile(LA, &[photo("1", 34.5, -118.5), photo("2", 40.0, -74.0), no_coords]);
        assert_eq!(rec.added, vec!["1"]);
        assert_eq!(rec.discarded, 2);
        assert_eq!(sync.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_in_response_add_one_marker() {
        let mut sync = MarkerSynchronizer::new();
        let rec = sync.reconcile(LA, &[photo("1", 34.5, -118.5), photo("1", 34.5, -118.5)]);
        assert_eq!(rec.added, vec!["1"]);
        assert_eq!(sync.len(), 1);
    }

    #[test]
    fn test_displayed_set_equals_in_box_results_for_box_sequences() {
        let photos = vec![
            photo("a", 34.1, -118.9),
            photo("b", 34.5, -118.5),
            photo("c", 34.9, -118.1),
            photo("d", 35.4, -117.6),
            photo("e", 33.8, -119.2),
        ];
        let boxes = [
            LA,
            Bounds::new(35.5, 34.4, -117.5, -118.6),
            Bounds::new(34.6, 33.5, -118.4, -119.5),
            Bounds::new(36.0, 33.0, -117.0, -120.0),
            LA,
        ];
        let mut sync = MarkerSynchronizer::new();
        for b in boxes {
            // The service returns everything in the box plus one stray photo.
            let mut returned: Vec<Photo> = photos
                .iter()
                .filter(|p| b.contains(p.position().unwrap()))
                .cloned()
                .collect();
            returned.push(photo("stray", 10.0, 10.0));
            sync.reconcile(b, &returned);

            let mut expected: Vec<&str> = photos
                .iter()
                .filter(|p| b.contains(p.position().unwrap()))
                .map(|p| p.id.as_str())
                .collect();
            let mut shown = shown_ids(&sync);
            expected.sort();
            shown.sort();
            assert_eq!(shown, expected);
            assert!(sync.markers().iter().all(|m| b.contains(m.position)));
        }
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut sync = MarkerSynchronizer::new();
        let first = sync.begin_query(LA);
        let second = sync.begin_query(Bounds::new(35.0, 34.4, -118.0, -119.0));

        assert!(!sync.is_current(&first));
        assert!(sync.apply(first, &[photo("1", 34.5, -118.5)]).is_none());
        assert!(sync.is_empty());
        assert!(sync.previous_bounds().is_none());

        let rec = sync.apply(second, &[photo("2", 34.8, -118.2)]).unwrap();
        assert_eq!(rec.added, vec!["2"]);
        assert_eq!(sync.previous_bounds(), Some(second.bounds()));
    }

    #[test]
    fn test_late_response_after_newer_one_applied_is_dropped() {
        let mut sync = MarkerSynchronizer::new();
        let first = sync.begin_query(LA);
        let second = sync.begin_query(LA);
        sync.apply(second, &[photo("2", 34.8, -118.2)]);

        assert!(sync.apply(first, &[photo("1", 34.5, -118.5)]).is_none());
        assert_eq!(shown_ids(&sync), vec!["2"]);
    }

    #[test]
    fn test_reset_clears_and_invalidates_in_flight() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5), photo("2", 34.2, -118.9)]);
        let pending = sync.begin_query(LA);

        let removed = sync.reset();
        assert_eq!(removed, vec!["1", "2"]);
        assert!(sync.is_empty());
        assert!(sync.previous_bounds().is_none());
        assert!(sync.apply(pending, &[photo("1", 34.5, -118.5)]).is_none());
    }

    #[test]
    fn test_marker_lookup() {
        let mut sync = MarkerSynchronizer::new();
        sync.reconcile(LA, &[photo("1", 34.5, -118.5)]);
        assert_eq!(sync.marker("1").unwrap().position, LatLng::new(34.5, -118.5));
        assert!(sync.marker("2").is_none());
    }
}
