use std::collections::HashSet;

use gtfs_model::{BikesAllowed, RouteType};

use crate::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice, Validator};

const CODE_MISSING_BIKES_ALLOWED_FOR_FERRY: &str = "missing_bikes_allowed_for_ferry";

/// Ferry trips are far more likely to carry bikes than other modes; flag
/// them specifically when `bikes_allowed` is absent, separately from the
/// generic warning `bikes_allowance` raises for any mode.
#[derive(Debug, Default)]
pub struct MissingBikesAllowedForFerryValidator;

impl Validator for MissingBikesAllowedForFerryValidator {
    fn name(&self) -> &'static str {
        "missing_bikes_allowed_for_ferry"
    }

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        let ferry_routes: HashSet<&str> = feed
            .routes
            .rows
            .iter()
            .filter(|route| route.route_type == RouteType::Ferry)
            .map(|route| route.route_id.trim())
            .filter(|value| !value.is_empty())
            .collect();

        if ferry_routes.is_empty() {
            return;
        }

        for (index, trip) in feed.trips.rows.iter().enumerate() {
            let route_id = trip.route_id.trim();
            if !ferry_routes.contains(route_id) {
                continue;
            }
            if trip.bikes_allowed.is_some() {
                continue;
            }

            let row_number = feed.trips.row_number(index);
            let trip_id = trip.trip_id.trim();
            let mut notice = ValidationNotice::new(
                CODE_MISSING_BIKES_ALLOWED_FOR_FERRY,
                NoticeSeverity::Warning,
                "ferry trip does not specify bikes_allowed",
            );
            notice.insert_context_field("csvRowNumber", row_number);
            notice.insert_context_field("routeId", route_id);
            notice.insert_context_field("tripId", trip_id);
            notice.field_order = vec![
                "csvRowNumber".to_string(),
                "routeId".to_string(),
                "tripId".to_string(),
            ];
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvTable;
    use gtfs_model::{Route, Trip};

    fn feed_with(route_type: RouteType, bikes_allowed: Option<BikesAllowed>) -> GtfsFeed {
        GtfsFeed {
            routes: CsvTable {
                headers: vec!["route_id".into()],
                rows: vec![Route {
                    route_id: "R1".to_string(),
                    route_type,
                    ..Default::default()
                }],
                row_numbers: vec![2],
            },
            trips: CsvTable {
                headers: vec!["trip_id".into()],
                rows: vec![Trip {
                    route_id: "R1".to_string(),
                    service_id: "S1".to_string(),
                    trip_id: "T1".to_string(),
                    bikes_allowed,
                    ..Default::default()
                }],
                row_numbers: vec![2],
            },
            ..Default::default()
        }
    }

    #[test]
    fn flags_ferry_trip_without_bikes_allowed() {
        let feed = feed_with(RouteType::Ferry, None);

        let mut notices = NoticeContainer::new();
        MissingBikesAllowedForFerryValidator.validate(&feed, &mut notices);

        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices.iter().next().unwrap().code,
            CODE_MISSING_BIKES_ALLOWED_FOR_FERRY
        );
    }

    #[test]
    fn passes_when_ferry_trip_specifies_bikes_allowed() {
        let feed = feed_with(RouteType::Ferry, Some(BikesAllowed::NotAllowed));

        let mut notices = NoticeContainer::new();
        MissingBikesAllowedForFerryValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }

    #[test]
    fn ignores_non_ferry_trips() {
        let feed = feed_with(RouteType::Bus, None);

        let mut notices = NoticeContainer::new();
        MissingBikesAllowedForFerryValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }
}
