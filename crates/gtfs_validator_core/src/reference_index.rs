use std::collections::{HashMap, HashSet};

use gtfs_model::RouteType;

use crate::feed::GtfsFeed;

/// The canonical per-trip lookup: route, service and block linkage, the
/// three foreign keys every trip-scoped rule ends up needing together.
#[derive(Debug, Clone)]
pub struct TripIndexEntry {
    pub route_id: String,
    pub service_id: String,
    pub block_id: Option<String>,
}

/// Cross-table lookups built once after a feed loads, so rules that need
/// them (foreign-key checks, trip-overlap checks, shape lookups) don't
/// each recompute the same scan. Every identifier here is trimmed the
/// same way individual rules trim their own CSV fields, so a rule reading
/// from the index sees exactly what a rule that re-scanned the feed
/// would see.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub stop_ids: HashSet<String>,
    pub agency_ids: HashSet<String>,
    pub route_types: HashMap<String, RouteType>,
    pub service_ids: HashSet<String>,
    pub used_service_ids: HashSet<String>,
    pub trips: HashMap<String, TripIndexEntry>,
    /// Row indices into `feed.stop_times.rows`, grouped by trip_id and
    /// sorted by `stop_sequence` ascending so timing validators can
    /// assume order without re-sorting.
    pub stop_times_by_trip: HashMap<String, Vec<usize>>,
    pub shape_ids: HashSet<String>,
}

fn trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ReferenceIndex {
    pub fn build(feed: &GtfsFeed) -> Self {
        let mut stop_ids = HashSet::new();
        for stop in &feed.stops.rows {
            if let Some(id) = trimmed(&stop.stop_id) {
                stop_ids.insert(id);
            }
        }

        let mut agency_ids = HashSet::new();
        for agency in &feed.agency.rows {
            if let Some(id) = agency.agency_id.as_deref().and_then(trimmed) {
                agency_ids.insert(id);
            }
        }

        let mut route_types = HashMap::new();
        for route in &feed.routes.rows {
            if let Some(id) = trimmed(&route.route_id) {
                route_types.insert(id, route.route_type);
            }
        }

        let mut service_ids = HashSet::new();
        if let Some(calendar) = &feed.calendar {
            for row in &calendar.rows {
                if let Some(id) = trimmed(&row.service_id) {
                    service_ids.insert(id);
                }
            }
        }
        if let Some(calendar_dates) = &feed.calendar_dates {
            for row in &calendar_dates.rows {
                if let Some(id) = trimmed(&row.service_id) {
                    service_ids.insert(id);
                }
            }
        }

        let mut used_service_ids = HashSet::new();
        let mut trips = HashMap::new();
        for trip in &feed.trips.rows {
            if let Some(service_id) = trimmed(&trip.service_id) {
                used_service_ids.insert(service_id.clone());
                if let Some(trip_id) = trimmed(&trip.trip_id) {
                    trips.insert(
                        trip_id,
                        TripIndexEntry {
                            route_id: trimmed(&trip.route_id).unwrap_or_default(),
                            service_id,
                            block_id: trip.block_id.as_deref().and_then(trimmed),
                        },
                    );
                }
            }
        }

        let mut stop_times_by_trip: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, stop_time) in feed.stop_times.rows.iter().enumerate() {
            if let Some(trip_id) = trimmed(&stop_time.trip_id) {
                stop_times_by_trip.entry(trip_id).or_default().push(index);
            }
        }
        for indices in stop_times_by_trip.values_mut() {
            indices.sort_by_key(|&index| feed.stop_times.rows[index].stop_sequence);
        }

        let mut shape_ids = HashSet::new();
        if let Some(shapes) = &feed.shapes {
            for shape in &shapes.rows {
                if let Some(id) = trimmed(&shape.shape_id) {
                    shape_ids.insert(id);
                }
            }
        }

        Self {
            stop_ids,
            agency_ids,
            route_types,
            service_ids,
            used_service_ids,
            trips,
            stop_times_by_trip,
            shape_ids,
        }
    }
}
