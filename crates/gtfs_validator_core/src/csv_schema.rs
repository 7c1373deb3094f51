//! Static column schemas for each GTFS file, used by `csv_validation` to flag
//! unknown columns and missing required/recommended ones.

pub struct FileSchema {
    pub fields: &'static [&'static str],
    pub required_fields: &'static [&'static str],
    pub recommended_fields: &'static [&'static str],
}

macro_rules! schema {
    ($fields:expr, $required:expr, $recommended:expr) => {
        FileSchema {
            fields: $fields,
            required_fields: $required,
            recommended_fields: $recommended,
        }
    };
}

static AGENCY: FileSchema = schema!(
    &[
        "agency_id",
        "agency_name",
        "agency_url",
        "agency_timezone",
        "agency_lang",
        "agency_phone",
        "agency_fare_url",
        "agency_email",
    ],
    &["agency_name", "agency_url", "agency_timezone"],
    &[]
);

static STOPS: FileSchema = schema!(
    &[
        "stop_id",
        "stop_code",
        "stop_name",
        "tts_stop_name",
        "stop_desc",
        "stop_lat",
        "stop_lon",
        "zone_id",
        "stop_url",
        "location_type",
        "parent_station",
        "stop_timezone",
        "wheelchair_boarding",
        "level_id",
        "platform_code",
    ],
    &["stop_id"],
    &["stop_name", "stop_lat", "stop_lon"]
);

static ROUTES: FileSchema = schema!(
    &[
        "route_id",
        "agency_id",
        "route_short_name",
        "route_long_name",
        "route_desc",
        "route_type",
        "route_url",
        "route_color",
        "route_text_color",
        "route_sort_order",
        "continuous_pickup",
        "continuous_drop_off",
        "network_id",
    ],
    &["route_id", "route_type"],
    &["route_short_name", "route_long_name"]
);

static TRIPS: FileSchema = schema!(
    &[
        "route_id",
        "service_id",
        "trip_id",
        "trip_headsign",
        "trip_short_name",
        "direction_id",
        "block_id",
        "shape_id",
        "wheelchair_accessible",
        "bikes_allowed",
    ],
    &["route_id", "service_id", "trip_id"],
    &[]
);

static STOP_TIMES: FileSchema = schema!(
    &[
        "trip_id",
        "arrival_time",
        "departure_time",
        "stop_id",
        "location_group_id",
        "location_id",
        "stop_sequence",
        "stop_headsign",
        "start_pickup_drop_off_window",
        "end_pickup_drop_off_window",
        "pickup_type",
        "drop_off_type",
        "continuous_pickup",
        "continuous_drop_off",
        "shape_dist_traveled",
        "timepoint",
        "pickup_booking_rule_id",
        "drop_off_booking_rule_id",
    ],
    &["trip_id", "stop_sequence"],
    &["arrival_time", "departure_time"]
);

static CALENDAR: FileSchema = schema!(
    &[
        "service_id",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
        "start_date",
        "end_date",
    ],
    &[
        "service_id",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
        "start_date",
        "end_date",
    ],
    &[]
);

static CALENDAR_DATES: FileSchema = schema!(
    &["service_id", "date", "exception_type"],
    &["service_id", "date", "exception_type"],
    &[]
);

static FARE_ATTRIBUTES: FileSchema = schema!(
    &[
        "fare_id",
        "price",
        "currency_type",
        "payment_method",
        "transfers",
        "agency_id",
        "transfer_duration",
    ],
    &["fare_id", "price", "currency_type", "payment_method", "transfers"],
    &[]
);

static FARE_RULES: FileSchema = schema!(
    &[
        "fare_id",
        "route_id",
        "origin_id",
        "destination_id",
        "contains_id",
    ],
    &["fare_id"],
    &[]
);

static FARE_MEDIA: FileSchema = schema!(
    &["fare_media_id", "fare_media_name", "fare_media_type"],
    &["fare_media_id", "fare_media_type"],
    &[]
);

static FARE_PRODUCTS: FileSchema = schema!(
    &[
        "fare_product_id",
        "fare_product_name",
        "fare_media_id",
        "amount",
        "currency",
    ],
    &["fare_product_id", "amount", "currency"],
    &[]
);

static FARE_LEG_RULES: FileSchema = schema!(
    &[
        "leg_group_id",
        "network_id",
        "from_area_id",
        "to_area_id",
        "from_timeframe_group_id",
        "to_timeframe_group_id",
        "fare_product_id",
        "rule_priority",
    ],
    &["fare_product_id"],
    &[]
);

static FARE_TRANSFER_RULES: FileSchema = schema!(
    &[
        "from_leg_group_id",
        "to_leg_group_id",
        "transfer_count",
        "duration_limit",
        "duration_limit_type",
        "fare_transfer_type",
        "fare_product_id",
    ],
    &["fare_transfer_type"],
    &[]
);

static FARE_LEG_JOIN_RULES: FileSchema = schema!(
    &[
        "from_network_id",
        "to_network_id",
        "from_stop_id",
        "to_stop_id",
    ],
    &["from_network_id", "to_network_id"],
    &[]
);

static AREAS: FileSchema = schema!(&["area_id", "area_name"], &["area_id"], &[]);

static STOP_AREAS: FileSchema =
    schema!(&["area_id", "stop_id"], &["area_id", "stop_id"], &[]);

static TIMEFRAMES: FileSchema = schema!(
    &["timeframe_group_id", "start_time", "end_time", "service_id"],
    &["timeframe_group_id", "service_id"],
    &[]
);

static RIDER_CATEGORIES: FileSchema = schema!(
    &[
        "rider_category_id",
        "rider_category_name",
        "is_default_fare_category",
        "eligibility_url",
    ],
    &["rider_category_id", "rider_category_name"],
    &[]
);

static SHAPES: FileSchema = schema!(
    &[
        "shape_id",
        "shape_pt_lat",
        "shape_pt_lon",
        "shape_pt_sequence",
        "shape_dist_traveled",
    ],
    &["shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence"],
    &[]
);

static FREQUENCIES: FileSchema = schema!(
    &[
        "trip_id",
        "start_time",
        "end_time",
        "headway_secs",
        "exact_times",
    ],
    &["trip_id", "start_time", "end_time", "headway_secs"],
    &[]
);

static TRANSFERS: FileSchema = schema!(
    &[
        "from_stop_id",
        "to_stop_id",
        "from_route_id",
        "to_route_id",
        "from_trip_id",
        "to_trip_id",
        "transfer_type",
        "min_transfer_time",
    ],
    &["transfer_type"],
    &[]
);

static LOCATION_GROUPS: FileSchema = schema!(
    &["location_group_id", "location_group_name"],
    &["location_group_id"],
    &[]
);

static LOCATION_GROUP_STOPS: FileSchema = schema!(
    &["location_group_id", "stop_id"],
    &["location_group_id", "stop_id"],
    &[]
);

static BOOKING_RULES: FileSchema = schema!(
    &[
        "booking_rule_id",
        "booking_type",
        "prior_notice_duration_min",
        "prior_notice_duration_max",
        "prior_notice_last_day",
        "prior_notice_last_time",
        "prior_notice_start_day",
        "prior_notice_start_time",
        "prior_notice_service_id",
        "message",
        "pickup_message",
        "drop_off_message",
        "phone_number",
        "info_url",
        "booking_url",
    ],
    &["booking_rule_id", "booking_type"],
    &[]
);

static NETWORKS: FileSchema = schema!(&["network_id", "network_name"], &["network_id"], &[]);

static ROUTE_NETWORKS: FileSchema =
    schema!(&["network_id", "route_id"], &["network_id", "route_id"], &[]);

static FEED_INFO: FileSchema = schema!(
    &[
        "feed_publisher_name",
        "feed_publisher_url",
        "feed_lang",
        "default_lang",
        "feed_start_date",
        "feed_end_date",
        "feed_version",
        "feed_contact_email",
        "feed_contact_url",
    ],
    &["feed_publisher_name", "feed_publisher_url", "feed_lang"],
    &[]
);

static ATTRIBUTIONS: FileSchema = schema!(
    &[
        "attribution_id",
        "agency_id",
        "route_id",
        "trip_id",
        "organization_name",
        "is_producer",
        "is_operator",
        "is_authority",
        "attribution_url",
        "attribution_email",
        "attribution_phone",
    ],
    &["organization_name"],
    &[]
);

static LEVELS: FileSchema = schema!(
    &["level_id", "level_index", "level_name"],
    &["level_id", "level_index"],
    &[]
);

static PATHWAYS: FileSchema = schema!(
    &[
        "pathway_id",
        "from_stop_id",
        "to_stop_id",
        "pathway_mode",
        "is_bidirectional",
        "length",
        "traversal_time",
        "stair_count",
        "max_slope",
        "min_width",
        "signposted_as",
        "reversed_signposted_as",
    ],
    &[
        "pathway_id",
        "from_stop_id",
        "to_stop_id",
        "pathway_mode",
        "is_bidirectional",
    ],
    &[]
);

static TRANSLATIONS: FileSchema = schema!(
    &[
        "table_name",
        "field_name",
        "language",
        "translation",
        "record_id",
        "record_sub_id",
        "field_value",
    ],
    &["table_name", "field_name", "language", "translation"],
    &[]
);

pub fn schema_for_file(file_name: &str) -> Option<&'static FileSchema> {
    Some(match file_name {
        "agency.txt" => &AGENCY,
        "stops.txt" => &STOPS,
        "routes.txt" => &ROUTES,
        "trips.txt" => &TRIPS,
        "stop_times.txt" => &STOP_TIMES,
        "calendar.txt" => &CALENDAR,
        "calendar_dates.txt" => &CALENDAR_DATES,
        "fare_attributes.txt" => &FARE_ATTRIBUTES,
        "fare_rules.txt" => &FARE_RULES,
        "fare_media.txt" => &FARE_MEDIA,
        "fare_products.txt" => &FARE_PRODUCTS,
        "fare_leg_rules.txt" => &FARE_LEG_RULES,
        "fare_transfer_rules.txt" => &FARE_TRANSFER_RULES,
        "fare_leg_join_rules.txt" => &FARE_LEG_JOIN_RULES,
        "areas.txt" => &AREAS,
        "stop_areas.txt" => &STOP_AREAS,
        "timeframes.txt" => &TIMEFRAMES,
        "rider_categories.txt" => &RIDER_CATEGORIES,
        "shapes.txt" => &SHAPES,
        "frequencies.txt" => &FREQUENCIES,
        "transfers.txt" => &TRANSFERS,
        "location_groups.txt" => &LOCATION_GROUPS,
        "location_group_stops.txt" => &LOCATION_GROUP_STOPS,
        "booking_rules.txt" => &BOOKING_RULES,
        "networks.txt" => &NETWORKS,
        "route_networks.txt" => &ROUTE_NETWORKS,
        "feed_info.txt" => &FEED_INFO,
        "attributions.txt" => &ATTRIBUTIONS,
        "levels.txt" => &LEVELS,
        "pathways.txt" => &PATHWAYS,
        "translations.txt" => &TRANSLATIONS,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_file_has_no_schema() {
        assert!(schema_for_file("not_a_gtfs_file.txt").is_none());
    }

    #[test]
    fn stops_requires_stop_id() {
        let schema = schema_for_file("stops.txt").expect("schema");
        assert!(schema.required_fields.contains(&"stop_id"));
        assert!(schema.fields.contains(&"wheelchair_boarding"));
    }
}
