use std::collections::HashMap;

use gtfs_model::RouteType;

use crate::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice, Validator};

const CODE_DUPLICATE_ROUTE_LONG_NAME: &str = "duplicate_route_long_name";

/// Flags routes sharing a case-folded `route_long_name` within the same
/// agency and route_type. Unlike `duplicate_route_name`, the short name is
/// not part of the key and the comparison ignores case.
#[derive(Debug, Default)]
pub struct DuplicateRouteLongNameValidator;

impl Validator for DuplicateRouteLongNameValidator {
    fn name(&self) -> &'static str {
        "duplicate_route_long_name"
    }

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        let mut seen: HashMap<RouteLongNameKey, RouteLongNameEntry> = HashMap::new();
        for (index, route) in feed.routes.rows.iter().enumerate() {
            let row_number = feed.routes.row_number(index);
            let long_name = route
                .route_long_name
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_string();
            if long_name.is_empty() {
                continue;
            }

            let agency_id = route.agency_id.as_deref().unwrap_or("").trim().to_string();
            let key = RouteLongNameKey {
                folded_long_name: long_name.to_lowercase(),
                route_type: route_type_value(route.route_type),
                agency_id: agency_id.clone(),
            };
            let entry = RouteLongNameEntry {
                row_number,
                route_id: route.route_id.clone(),
                route_long_name: long_name,
                agency_id,
            };

            if let Some(prev) = seen.get(&key) {
                let mut notice = ValidationNotice::new(
                    CODE_DUPLICATE_ROUTE_LONG_NAME,
                    NoticeSeverity::Warning,
                    "duplicate route_long_name (case-insensitive) for same agency and route_type",
                );
                notice.insert_context_field("agencyId", prev.agency_id.as_str());
                notice.insert_context_field("csvRowNumber1", prev.row_number);
                notice.insert_context_field("csvRowNumber2", entry.row_number);
                notice.insert_context_field("routeId1", prev.route_id.as_str());
                notice.insert_context_field("routeId2", entry.route_id.as_str());
                notice.insert_context_field("routeLongName", prev.route_long_name.as_str());
                notice.field_order = vec![
                    "agencyId".to_string(),
                    "csvRowNumber1".to_string(),
                    "csvRowNumber2".to_string(),
                    "routeId1".to_string(),
                    "routeId2".to_string(),
                    "routeLongName".to_string(),
                ];
                notices.push(notice);
            } else {
                seen.insert(key, entry);
            }
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq)]
struct RouteLongNameKey {
    folded_long_name: String,
    route_type: i32,
    agency_id: String,
}

#[derive(Debug)]
struct RouteLongNameEntry {
    row_number: u64,
    route_id: String,
    route_long_name: String,
    agency_id: String,
}

fn route_type_value(route_type: RouteType) -> i32 {
    match route_type {
        RouteType::Tram => 0,
        RouteType::Subway => 1,
        RouteType::Rail => 2,
        RouteType::Bus => 3,
        RouteType::Ferry => 4,
        RouteType::CableCar => 5,
        RouteType::Gondola => 6,
        RouteType::Funicular => 7,
        RouteType::Trolleybus => 11,
        RouteType::Monorail => 12,
        RouteType::Extended(value) => value as i32,
        RouteType::Unknown => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvTable;
    use gtfs_model::Route;

    fn route(id: &str, long_name: &str, route_type: RouteType) -> Route {
        Route {
            route_id: id.to_string(),
            route_long_name: Some(long_name.to_string()),
            route_type,
            ..Default::default()
        }
    }

    fn feed_with_routes(routes: Vec<Route>) -> GtfsFeed {
        let row_numbers = (2..2 + routes.len() as u64).collect();
        GtfsFeed {
            routes: CsvTable {
                headers: vec!["route_id".into()],
                row_numbers,
                rows: routes,
            },
            ..Default::default()
        }
    }

    #[test]
    fn detects_case_insensitive_duplicate_long_names() {
        let feed = feed_with_routes(vec![
            route("R1", "Downtown Express", RouteType::Bus),
            route("R2", "DOWNTOWN EXPRESS", RouteType::Bus),
        ]);

        let mut notices = NoticeContainer::new();
        DuplicateRouteLongNameValidator.validate(&feed, &mut notices);

        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices.iter().next().unwrap().code,
            CODE_DUPLICATE_ROUTE_LONG_NAME
        );
    }

    #[test]
    fn distinguishes_routes_with_different_route_type() {
        let feed = feed_with_routes(vec![
            route("R1", "Downtown Express", RouteType::Bus),
            route("R2", "Downtown Express", RouteType::Rail),
        ]);

        let mut notices = NoticeContainer::new();
        DuplicateRouteLongNameValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }

    #[test]
    fn ignores_routes_with_blank_long_name() {
        let feed = feed_with_routes(vec![
            route("R1", "", RouteType::Bus),
            route("R2", "", RouteType::Bus),
        ]);

        let mut notices = NoticeContainer::new();
        DuplicateRouteLongNameValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }

    #[test]
    fn caps_notices_per_code_while_still_counting_emitted() {
        let mut routes = Vec::new();
        for i in 0..250 {
            routes.push(route(&format!("R{i}"), "Shared Name", RouteType::Bus));
        }
        let feed = feed_with_routes(routes);

        let mut notices = NoticeContainer::with_max_notices_per_type(100);
        DuplicateRouteLongNameValidator.validate(&feed, &mut notices);

        assert_eq!(notices.stored_count(CODE_DUPLICATE_ROUTE_LONG_NAME), 100);
        assert_eq!(notices.emitted_count(CODE_DUPLICATE_ROUTE_LONG_NAME), 249);
    }
}
