//! End-to-end runs of the full validator registry against small synthetic
//! feeds written to a temp directory, one per notable scenario.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use gtfs_validation_core::{rules::default_runner, set_validation_date, GtfsInput, NoticeSeverity};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos))
}

fn write_feed(dir: &std::path::Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).expect("create feed dir");
    for (name, contents) in files {
        fs::write(dir.join(name), contents).expect("write feed file");
    }
}

const AGENCY_TXT: &str = "agency_name,agency_url,agency_timezone\nAcme Transit,https://example.com,America/Los_Angeles\n";
const STOPS_TXT: &str =
    "stop_id,stop_name,stop_lat,stop_lon\nS1,First St,45.0,-122.0\nS2,Second St,45.01,-122.0\n";

#[test]
fn clean_feed_with_calendar_produces_no_errors() {
    let dir = temp_dir("gtfs_clean_feed");
    write_feed(
        &dir,
        &[
            ("agency.txt", AGENCY_TXT),
            ("stops.txt", STOPS_TXT),
            ("routes.txt", "route_id,route_type\nR1,3\n"),
            (
                "trips.txt",
                "route_id,service_id,trip_id\nR1,WEEKDAY,T1\n",
            ),
            (
                "stop_times.txt",
                "trip_id,stop_id,stop_sequence,arrival_time,departure_time\n\
                 T1,S1,1,08:00:00,08:00:00\n\
                 T1,S2,2,08:10:00,08:10:00\n",
            ),
            (
                "calendar.txt",
                "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                 WEEKDAY,1,1,1,1,1,0,0,20240101,20241231\n",
            ),
        ],
    );

    let _date_guard = set_validation_date(Some(
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    ));
    let input = GtfsInput::from_path(&dir).expect("load input");
    let runner = default_runner();
    let outcome = gtfs_validation_core::validate_input(&input, &runner);

    let errors: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.severity == NoticeSeverity::Error)
        .collect();
    assert!(errors.is_empty(), "unexpected errors: {:#?}", errors);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_calendar_and_calendar_dates_is_flagged() {
    let dir = temp_dir("gtfs_missing_calendar");
    write_feed(
        &dir,
        &[
            ("agency.txt", AGENCY_TXT),
            ("stops.txt", STOPS_TXT),
            ("routes.txt", "route_id,route_type\nR1,3\n"),
            (
                "trips.txt",
                "route_id,service_id,trip_id\nR1,WEEKDAY,T1\n",
            ),
            (
                "stop_times.txt",
                "trip_id,stop_id,stop_sequence,arrival_time,departure_time\n\
                 T1,S1,1,08:00:00,08:00:00\n\
                 T1,S2,2,08:10:00,08:10:00\n",
            ),
        ],
    );

    let input = GtfsInput::from_path(&dir).expect("load input");
    let runner = default_runner();
    let outcome = gtfs_validation_core::validate_input(&input, &runner);

    assert!(outcome
        .notices
        .iter()
        .any(|notice| notice.code == "missing_calendar_and_calendar_date_files"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn duplicate_route_long_names_are_flagged_and_capped() {
    let dir = temp_dir("gtfs_duplicate_route_names");
    let mut routes = String::from("route_id,route_long_name,route_type\n");
    for index in 0..10 {
        routes.push_str(&format!("R{},Downtown Express,3\n", index));
    }
    write_feed(
        &dir,
        &[
            ("agency.txt", AGENCY_TXT),
            ("stops.txt", STOPS_TXT),
            ("routes.txt", &routes),
            ("trips.txt", "route_id,service_id,trip_id\nR0,WEEKDAY,T1\n"),
            (
                "stop_times.txt",
                "trip_id,stop_id,stop_sequence,arrival_time,departure_time\n\
                 T1,S1,1,08:00:00,08:00:00\n\
                 T1,S2,2,08:10:00,08:10:00\n",
            ),
        ],
    );

    let input = GtfsInput::from_path(&dir).expect("load input");
    let runner = default_runner();
    let outcome = gtfs_validation_core::validate_input(&input, &runner);

    let count = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "duplicate_route_long_name")
        .count();
    assert_eq!(count, 9, "one notice per route beyond the first match");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn ferry_trip_without_bikes_allowed_is_flagged() {
    let dir = temp_dir("gtfs_ferry_bikes");
    write_feed(
        &dir,
        &[
            ("agency.txt", AGENCY_TXT),
            ("stops.txt", STOPS_TXT),
            ("routes.txt", "route_id,route_type\nR1,4\n"),
            (
                "trips.txt",
                "route_id,service_id,trip_id\nR1,WEEKDAY,T1\n",
            ),
            (
                "stop_times.txt",
                "trip_id,stop_id,stop_sequence,arrival_time,departure_time\n\
                 T1,S1,1,08:00:00,08:00:00\n\
                 T1,S2,2,08:40:00,08:40:00\n",
            ),
        ],
    );

    let input = GtfsInput::from_path(&dir).expect("load input");
    let runner = default_runner();
    let outcome = gtfs_validation_core::validate_input(&input, &runner);

    assert!(outcome
        .notices
        .iter()
        .any(|notice| notice.code == "missing_bikes_allowed_for_ferry"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn notice_cap_reports_stored_and_emitted_counts_separately() {
    let dir = temp_dir("gtfs_notice_cap");
    let mut routes = String::from("route_id,route_long_name,route_type\n");
    for index in 0..250 {
        routes.push_str(&format!("R{},Capped Name,3\n", index));
    }
    write_feed(
        &dir,
        &[
            ("agency.txt", AGENCY_TXT),
            ("stops.txt", STOPS_TXT),
            ("routes.txt", &routes),
            ("trips.txt", "route_id,service_id,trip_id\nR0,WEEKDAY,T1\n"),
            (
                "stop_times.txt",
                "trip_id,stop_id,stop_sequence,arrival_time,departure_time\n\
                 T1,S1,1,08:00:00,08:00:00\n\
                 T1,S2,2,08:10:00,08:10:00\n",
            ),
        ],
    );

    let input = GtfsInput::from_path(&dir).expect("load input");
    let runner = default_runner();
    let mut notices = gtfs_validation_core::NoticeContainer::with_max_notices_per_type(100);
    gtfs_validation_core::validate_input_into(&input, &runner, &mut notices);

    assert_eq!(notices.stored_count("duplicate_route_long_name"), 100);
    assert_eq!(notices.emitted_count("duplicate_route_long_name"), 249);

    fs::remove_dir_all(&dir).ok();
}
