use std::collections::HashMap;

use gtfs_model::{RouteType, Stop, StopTime};

use crate::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice, Validator};

const CODE_FAST_TRAVEL_CONSECUTIVE: &str = "fast_travel_between_consecutive_stops";
const CODE_FAST_TRAVEL_FAR: &str = "fast_travel_between_far_stops";

/// Trips cover more distance per unit of scheduled time than is physically
/// plausible for the route's mode.
#[derive(Debug, Default)]
pub struct StopTimeTravelSpeedValidator;

impl Validator for StopTimeTravelSpeedValidator {
    fn name(&self) -> &'static str {
        "stop_time_travel_speed"
    }

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        let stops_by_id: HashMap<&str, &Stop> = feed
            .stops
            .rows
            .iter()
            .map(|stop| (stop.stop_id.trim(), stop))
            .collect();

        for (trip_id, row_indices) in &feed.index.stop_times_by_trip {
            if row_indices.len() < 2 {
                continue;
            }
            let stop_times: Vec<(&StopTime, u64)> = row_indices
                .iter()
                .map(|&index| (&feed.stop_times.rows[index], feed.stop_times.row_number(index)))
                .collect();

            let max_speed_kph = feed
                .index
                .trips
                .get(trip_id.as_str())
                .and_then(|entry| feed.index.route_types.get(&entry.route_id))
                .map(|route_type| max_speed_kph(*route_type))
                .unwrap_or(200.0);

            for window in stop_times.windows(2) {
                let (current, current_row) = window[0];
                let (next, next_row) = window[1];
                check_pair(
                    trip_id,
                    current,
                    current_row,
                    next,
                    next_row,
                    &stops_by_id,
                    max_speed_kph,
                    CODE_FAST_TRAVEL_CONSECUTIVE,
                    notices,
                );
            }

            for i in 0..stop_times.len() {
                for j in (i + 2)..stop_times.len() {
                    let (current, current_row) = stop_times[i];
                    let (far, far_row) = stop_times[j];
                    check_pair(
                        trip_id,
                        current,
                        current_row,
                        far,
                        far_row,
                        &stops_by_id,
                        max_speed_kph,
                        CODE_FAST_TRAVEL_FAR,
                        notices,
                    );
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn check_pair(
    trip_id: &str,
    from: &StopTime,
    from_row: u64,
    to: &StopTime,
    to_row: u64,
    stops_by_id: &HashMap<&str, &Stop>,
    max_speed_kph: f64,
    code: &str,
    notices: &mut NoticeContainer,
) {
    let Some(from_coords) = stop_coords(from.stop_id.trim(), stops_by_id) else {
        return;
    };
    let Some(to_coords) = stop_coords(to.stop_id.trim(), stops_by_id) else {
        return;
    };

    let Some(minutes) = time_between_stops(from, to) else {
        return;
    };
    if minutes <= 0.0 {
        return;
    }

    let distance_km = haversine_km(from_coords, to_coords);
    let hours = minutes / 60.0;
    let speed_kph = distance_km / hours;

    if speed_kph <= max_speed_kph {
        return;
    }

    let mut notice = ValidationNotice::new(
        code,
        NoticeSeverity::Warning,
        "trip travels faster than is plausible for its route type",
    );
    notice.insert_context_field("tripId", trip_id);
    notice.insert_context_field("csvRowNumber1", from_row);
    notice.insert_context_field("csvRowNumber2", to_row);
    notice.insert_context_field("speedKph", speed_kph);
    notice.insert_context_field("distanceKm", distance_km);
    notice.field_order = vec![
        "tripId".into(),
        "csvRowNumber1".into(),
        "csvRowNumber2".into(),
        "speedKph".into(),
        "distanceKm".into(),
    ];
    notices.push(notice);
}

fn stop_coords(stop_id: &str, stops_by_id: &HashMap<&str, &Stop>) -> Option<(f64, f64)> {
    let mut current = stops_by_id.get(stop_id).copied()?;
    for _ in 0..3 {
        if let (Some(lat), Some(lon)) = (current.stop_lat, current.stop_lon) {
            return Some((lat, lon));
        }
        let parent_id = current.parent_station.as_deref()?.trim();
        current = stops_by_id.get(parent_id).copied()?;
    }
    None
}

fn time_between_stops(from: &StopTime, to: &StopTime) -> Option<f64> {
    let departure = from.departure_time.or(from.arrival_time)?;
    let arrival = to.arrival_time.or(to.departure_time)?;
    let seconds = arrival.total_seconds() - departure.total_seconds();
    if seconds <= 0 {
        return None;
    }
    // Scheduled times round to the minute; treat sub-minute gaps between
    // adjacent stops as one minute rather than a division-by-zero risk.
    Some((seconds as f64 / 60.0).max(1.0))
}

fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

fn max_speed_kph(route_type: RouteType) -> f64 {
    match route_type {
        RouteType::Tram => 100.0,
        RouteType::Rail => 500.0,
        RouteType::Subway | RouteType::Monorail | RouteType::Bus | RouteType::Trolleybus => 150.0,
        RouteType::Ferry => 80.0,
        RouteType::CableCar => 30.0,
        RouteType::Gondola | RouteType::Funicular => 50.0,
        RouteType::Extended(_) | RouteType::Unknown => 200.0,
    }
}
