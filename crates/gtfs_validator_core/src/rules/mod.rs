pub mod agency_consistency;
pub mod bikes_allowance;
pub mod block_trips_with_overlapping_stop_times;
pub mod calendar;
pub mod calendar_presence;
pub mod continuous_pickup_drop_off;
pub mod duplicate_fare_media;
pub mod duplicate_key;
pub mod duplicate_route_long_name;
pub mod duplicate_route_name;
pub mod duplicate_stop_sequence;
pub mod expired_calendar;
pub mod fare_attribute_agency_id;
pub mod fare_attributes;
pub mod fare_leg_join_rule;
pub mod fare_leg_rule_network_id_foreign_key;
pub mod fare_media_name;
pub mod fare_product_default_rider_categories;
pub mod fare_rules;
pub mod fare_transfer_rule_transfer_count;
pub mod feed_expiration_date;
pub mod feed_info;
pub mod feed_service_date;
pub mod location_has_stop_times;
pub mod location_id_foreign_key;
pub mod location_type;
pub mod locations_geojson_notices;
pub mod locations_geojson_presence;
pub mod matching_feed_and_agency_lang;
pub mod missing_bikes_allowed_for_ferry;
pub mod missing_level_id;
pub mod missing_stops_file;
pub mod missing_trip_edge;
pub mod network_id_consistency;
pub mod overlapping_frequency;
pub mod overlapping_pickup_drop_off_zone;
pub mod pathway_dangling_generic_node;
pub mod pathway_endpoint_type;
pub mod pathway_loop;
pub mod pathways;
pub mod pickup_booking_rule_id;
pub mod pickup_drop_off_type;
pub mod pickup_drop_off_window;
pub mod referential_integrity;
pub mod required_non_empty;
pub mod route_color_contrast;
pub mod routes;
pub mod service_never_active;
pub mod shape_to_stop_matching;
pub mod shape_usage;
pub mod single_shape_point;
pub mod stop_time_increasing_distance;
pub mod stop_time_travel_speed;
pub mod stop_times;
pub mod stop_times_geography_id_presence;
pub mod stop_times_record;
pub mod stop_times_shape_dist_presence;
pub mod stop_times_time;
pub mod stop_zone_id;
pub mod stops;
pub mod timeframe_overlap;
pub mod timeframe_service_id_foreign_key;
pub mod timeframe_start_and_end_time;
pub mod transfers_in_seat_transfer_type;
pub mod transfers_stop_type;
pub mod transfers_trip_reference;
pub mod trip_service_id_foreign_key;
pub mod trip_shape_distance;
pub mod trips;
pub mod unique_geography_id;
pub mod unused_agency;
pub mod unused_route;
pub mod unused_stop;
pub mod url_consistency;
pub mod url_syntax;

use crate::ValidatorRunner;

/// Builds a runner with every rule registered. Call sites that only need a
/// handful of validators (CLI `--include`/`--exclude` flags, tests) should
/// register selectively instead of filtering this list after the fact.
pub fn default_runner() -> ValidatorRunner {
    let mut runner = ValidatorRunner::new();

    runner.register(agency_consistency::AgencyConsistencyValidator);
    runner.register(bikes_allowance::BikesAllowanceValidator);
    runner.register(block_trips_with_overlapping_stop_times::BlockTripsWithOverlappingStopTimesValidator);
    runner.register(calendar::CalendarValidator);
    runner.register(calendar_presence::CalendarPresenceValidator);
    runner.register(continuous_pickup_drop_off::ContinuousPickupDropOffValidator);
    runner.register(duplicate_fare_media::DuplicateFareMediaValidator);
    runner.register(duplicate_key::DuplicateKeyValidator);
    runner.register(duplicate_route_long_name::DuplicateRouteLongNameValidator);
    runner.register(duplicate_route_name::DuplicateRouteNameValidator);
    runner.register(duplicate_stop_sequence::DuplicateStopSequenceValidator);
    runner.register(expired_calendar::ExpiredCalendarValidator);
    runner.register(fare_attribute_agency_id::FareAttributeAgencyIdValidator);
    runner.register(fare_attributes::FareAttributesValidator);
    runner.register(fare_leg_join_rule::FareLegJoinRuleValidator);
    runner.register(fare_leg_rule_network_id_foreign_key::FareLegRuleNetworkIdForeignKeyValidator);
    runner.register(fare_media_name::FareMediaNameValidator);
    runner.register(fare_product_default_rider_categories::FareProductDefaultRiderCategoriesValidator);
    runner.register(fare_rules::FareRulesValidator);
    runner.register(fare_transfer_rule_transfer_count::FareTransferRuleTransferCountValidator);
    runner.register(feed_expiration_date::FeedExpirationDateValidator);
    runner.register(feed_info::MissingFeedInfoValidator);
    runner.register(feed_service_date::FeedServiceDateValidator);
    runner.register(location_has_stop_times::LocationHasStopTimesValidator);
    runner.register(location_id_foreign_key::LocationIdForeignKeyValidator);
    runner.register(location_type::LocationTypeValidator);
    runner.register(locations_geojson_notices::LocationsGeoJsonNoticesValidator);
    runner.register(locations_geojson_presence::LocationsGeoJsonPresenceValidator);
    runner.register(matching_feed_and_agency_lang::MatchingFeedAndAgencyLangValidator);
    runner.register(missing_bikes_allowed_for_ferry::MissingBikesAllowedForFerryValidator);
    runner.register(missing_level_id::MissingLevelIdValidator);
    runner.register(missing_stops_file::MissingStopsFileValidator);
    runner.register(missing_trip_edge::MissingTripEdgeValidator);
    runner.register(network_id_consistency::NetworkIdConsistencyValidator);
    runner.register(overlapping_frequency::OverlappingFrequencyValidator);
    runner.register(overlapping_pickup_drop_off_zone::OverlappingPickupDropOffZoneValidator);
    runner.register(pathway_dangling_generic_node::PathwayDanglingGenericNodeValidator);
    runner.register(pathway_endpoint_type::PathwayEndpointTypeValidator);
    runner.register(pathway_loop::PathwayLoopValidator);
    runner.register(pathways::PathwaysValidator);
    runner.register(pickup_booking_rule_id::PickupBookingRuleIdValidator);
    runner.register(pickup_drop_off_type::PickupDropOffTypeValidator);
    runner.register(pickup_drop_off_window::PickupDropOffWindowValidator);
    runner.register(referential_integrity::ReferentialIntegrityValidator);
    runner.register(required_non_empty::RequiredTablesNotEmptyValidator);
    runner.register(route_color_contrast::RouteColorContrastValidator);
    runner.register(routes::RoutesValidator);
    runner.register(service_never_active::ServiceNeverActiveValidator);
    runner.register(shape_to_stop_matching::ShapeToStopMatchingValidator);
    runner.register(shape_usage::ShapeUsageValidator);
    runner.register(single_shape_point::SingleShapePointValidator);
    runner.register(stop_time_increasing_distance::StopTimeIncreasingDistanceValidator);
    runner.register(stop_time_travel_speed::StopTimeTravelSpeedValidator);
    runner.register(stop_times::TripUsageValidator);
    runner.register(stop_times_geography_id_presence::StopTimesGeographyIdPresenceValidator);
    runner.register(stop_times_record::StopTimesRecordValidator);
    runner.register(stop_times_shape_dist_presence::StopTimesShapeDistTraveledPresenceValidator);
    runner.register(stop_times_time::StopTimeArrivalAndDepartureTimeValidator);
    runner.register(stop_zone_id::StopZoneIdValidator);
    runner.register(stops::StopsValidator);
    runner.register(timeframe_overlap::TimeframeOverlapValidator);
    runner.register(timeframe_service_id_foreign_key::TimeframeServiceIdForeignKeyValidator);
    runner.register(timeframe_start_and_end_time::TimeframeStartAndEndTimeValidator);
    runner.register(transfers_in_seat_transfer_type::TransfersInSeatTransferTypeValidator);
    runner.register(transfers_stop_type::TransfersStopTypeValidator);
    runner.register(transfers_trip_reference::TransfersTripReferenceValidator);
    runner.register(trip_service_id_foreign_key::TripServiceIdForeignKeyValidator);
    runner.register(trip_shape_distance::TripAndShapeDistanceValidator);
    runner.register(trips::TripUsabilityValidator);
    runner.register(unique_geography_id::UniqueGeographyIdValidator);
    runner.register(unused_agency::UnusedAgencyValidator);
    runner.register(unused_route::UnusedRouteValidator);
    runner.register(unused_stop::UnusedStopValidator);
    runner.register(url_consistency::UrlConsistencyValidator);
    runner.register(url_syntax::UrlSyntaxValidator);

    runner
}
