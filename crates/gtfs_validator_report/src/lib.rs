//! Report structures built on top of a finished validation run: the
//! `report.json` summary (feed metadata, notice counts, the notices
//! themselves) and the `report.html` renderer in [`html`].

pub mod html;

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gtfs_model::RouteType;
use gtfs_validator_core::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice};

pub use html::{write_html_report, HtmlReportContext};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportAgency {
    pub name: String,
    pub url: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportFeedInfo {
    pub publisher_name: Option<String>,
    pub publisher_url: Option<String>,
    pub feed_email: Option<String>,
    pub feed_language: Option<String>,
    pub feed_start_date: Option<String>,
    pub feed_end_date: Option<String>,
    pub feed_service_window_start: Option<String>,
    pub feed_service_window_end: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportCounts {
    pub shapes: usize,
    pub stops: usize,
    pub routes: usize,
    pub trips: usize,
    pub agencies: usize,
    pub blocks: usize,
}

/// Notice tally by severity, the `summary.counts` the caller checks to
/// decide whether a run should be rejected (any `error` at all).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ReportSeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ReportSeverityCounts {
    fn from_container(notices: &NoticeContainer) -> Self {
        let by_severity = notices.count_by_severity();
        Self {
            error: by_severity.get(&NoticeSeverity::Error).copied().unwrap_or(0),
            warning: by_severity
                .get(&NoticeSeverity::Warning)
                .copied()
                .unwrap_or(0),
            info: by_severity.get(&NoticeSeverity::Info).copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportSummary {
    pub validator_version: Option<String>,
    pub validated_at: Option<String>,
    pub date_for_validation: Option<String>,
    pub country_code: Option<String>,
    /// Wall-clock time the validation run itself took, in seconds.
    pub duration_seconds: Option<f64>,
    pub agencies: Option<Vec<ReportAgency>>,
    pub feed_info: Option<ReportFeedInfo>,
    pub files: Option<Vec<String>>,
    pub counts: Option<ReportCounts>,
    pub notice_counts: Option<ReportSeverityCounts>,
    pub gtfs_features: Option<Vec<String>>,
}

/// A single notice code's occurrences, aggregated for the report: the
/// stored sample contexts plus the true total (which may exceed the
/// sample window once the per-code cap is reached).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportNoticeGroup {
    pub code: String,
    pub severity: NoticeSeverity,
    pub total_notices: usize,
    pub sample_contexts: Vec<BTreeMap<String, serde_json::Value>>,
}

/// The JSON-serializable shape written to `report.json`: feed-level
/// metadata plus every notice group recorded during the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub notices: Vec<ReportNoticeGroup>,
}

/// Builds a [`ReportSummary`] from a loaded feed; separate from
/// [`ValidationReport`] so callers can attach it to either a batch or a
/// streaming run.
pub struct ReportSummaryContext {
    pub validator_version: Option<String>,
    pub validated_at: Option<String>,
    pub date_for_validation: Option<String>,
    pub country_code: Option<String>,
    pub duration_seconds: Option<f64>,
}

impl Default for ReportSummaryContext {
    fn default() -> Self {
        Self {
            validator_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            validated_at: None,
            date_for_validation: None,
            country_code: None,
            duration_seconds: None,
        }
    }
}

impl ReportSummaryContext {
    pub fn build(self, feed: &GtfsFeed) -> ReportSummary {
        ReportSummary {
            validator_version: self.validator_version,
            validated_at: self.validated_at,
            date_for_validation: self.date_for_validation,
            country_code: self.country_code,
            duration_seconds: self.duration_seconds,
            agencies: Some(build_agencies(feed)),
            feed_info: Some(build_feed_info(feed)),
            files: Some(build_file_list(feed)),
            counts: Some(build_counts(feed)),
            notice_counts: None,
            gtfs_features: Some(build_feature_list(feed)),
        }
    }
}

fn build_agencies(feed: &GtfsFeed) -> Vec<ReportAgency> {
    feed.agency
        .rows
        .iter()
        .map(|agency| ReportAgency {
            name: agency.agency_name.clone(),
            url: agency.agency_url.clone(),
            phone: agency.agency_phone.clone().unwrap_or_default(),
            email: agency.agency_email.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_feed_info(feed: &GtfsFeed) -> ReportFeedInfo {
    let (window_start, window_end) = service_window(feed);
    match feed.feed_info.as_ref().and_then(|table| table.rows.first()) {
        Some(info) => ReportFeedInfo {
            publisher_name: Some(info.feed_publisher_name.clone()),
            publisher_url: Some(info.feed_publisher_url.clone()),
            feed_email: info.feed_contact_email.clone(),
            feed_language: Some(info.feed_lang.clone()),
            feed_start_date: info.feed_start_date.map(|date| date.to_string()),
            feed_end_date: info.feed_end_date.map(|date| date.to_string()),
            feed_service_window_start: window_start,
            feed_service_window_end: window_end,
        },
        None => ReportFeedInfo {
            feed_service_window_start: window_start,
            feed_service_window_end: window_end,
            ..ReportFeedInfo::default()
        },
    }
}

/// Earliest/latest service date across calendar.txt and calendar_dates.txt,
/// formatted `%Y-%m-%d` for direct display.
fn service_window(feed: &GtfsFeed) -> (Option<String>, Option<String>) {
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    let mut observe = |year: i32, month: u32, day: u32| {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            earliest = Some(earliest.map_or(date, |current| current.min(date)));
            latest = Some(latest.map_or(date, |current| current.max(date)));
        }
    };

    if let Some(calendar) = &feed.calendar {
        for row in &calendar.rows {
            observe(
                row.start_date.year(),
                row.start_date.month() as u32,
                row.start_date.day() as u32,
            );
            observe(
                row.end_date.year(),
                row.end_date.month() as u32,
                row.end_date.day() as u32,
            );
        }
    }
    if let Some(calendar_dates) = &feed.calendar_dates {
        for row in &calendar_dates.rows {
            observe(
                row.date.year(),
                row.date.month() as u32,
                row.date.day() as u32,
            );
        }
    }

    (
        earliest.map(|date| date.format("%Y-%m-%d").to_string()),
        latest.map(|date| date.format("%Y-%m-%d").to_string()),
    )
}

fn build_file_list(feed: &GtfsFeed) -> Vec<String> {
    let mut files = vec![
        "agency.txt".to_string(),
        "stops.txt".to_string(),
        "routes.txt".to_string(),
        "trips.txt".to_string(),
        "stop_times.txt".to_string(),
    ];
    if feed.calendar.is_some() {
        files.push("calendar.txt".to_string());
    }
    if feed.calendar_dates.is_some() {
        files.push("calendar_dates.txt".to_string());
    }
    if feed.fare_attributes.is_some() {
        files.push("fare_attributes.txt".to_string());
    }
    if feed.fare_rules.is_some() {
        files.push("fare_rules.txt".to_string());
    }
    if feed.fare_media.is_some() {
        files.push("fare_media.txt".to_string());
    }
    if feed.fare_products.is_some() {
        files.push("fare_products.txt".to_string());
    }
    if feed.shapes.is_some() {
        files.push("shapes.txt".to_string());
    }
    if feed.frequencies.is_some() {
        files.push("frequencies.txt".to_string());
    }
    if feed.transfers.is_some() {
        files.push("transfers.txt".to_string());
    }
    if feed.feed_info.is_some() {
        files.push("feed_info.txt".to_string());
    }
    if feed.attributions.is_some() {
        files.push("attributions.txt".to_string());
    }
    if feed.levels.is_some() {
        files.push("levels.txt".to_string());
    }
    if feed.pathways.is_some() {
        files.push("pathways.txt".to_string());
    }
    if feed.translations.is_some() {
        files.push("translations.txt".to_string());
    }
    if feed.locations.is_some() {
        files.push("locations.geojson".to_string());
    }
    files
}

fn build_counts(feed: &GtfsFeed) -> ReportCounts {
    let blocks = feed
        .trips
        .rows
        .iter()
        .filter_map(|trip| trip.block_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect::<HashSet<_>>()
        .len();

    ReportCounts {
        shapes: feed
            .shapes
            .as_ref()
            .map(|table| feed.index.shape_ids.len().max(table.rows.len()))
            .unwrap_or(0),
        stops: feed.stops.rows.len(),
        routes: feed.routes.rows.len(),
        trips: feed.trips.rows.len(),
        agencies: feed.agency.rows.len(),
        blocks,
    }
}

const FEATURE_PATHWAYS: &str = "Pathway Connections";
const FEATURE_LEVELS: &str = "Levels";
const FEATURE_FARE_PRODUCTS: &str = "Fare Products";
const FEATURE_FARE_MEDIA: &str = "Fare Media";
const FEATURE_ZONE_FARES: &str = "Zone-Based Fares";
const FEATURE_RIDER_CATEGORIES: &str = "Rider Categories";
const FEATURE_BOOKING_RULES: &str = "Booking Rules";
const FEATURE_CONTINUOUS_STOPS: &str = "Continuous Stops";
const FEATURE_TTS: &str = "Text-to-Speech";

fn build_feature_list(feed: &GtfsFeed) -> Vec<String> {
    let mut features = Vec::new();
    if feed.pathways.is_some() {
        features.push(FEATURE_PATHWAYS.to_string());
    }
    if feed.levels.is_some() {
        features.push(FEATURE_LEVELS.to_string());
    }
    if feed.fare_products.is_some() {
        features.push(FEATURE_FARE_PRODUCTS.to_string());
    }
    if feed.fare_media.is_some() {
        features.push(FEATURE_FARE_MEDIA.to_string());
    }
    if feed.fare_rules.is_some() {
        features.push(FEATURE_ZONE_FARES.to_string());
    }
    if feed.rider_categories.is_some() {
        features.push(FEATURE_RIDER_CATEGORIES.to_string());
    }
    if feed.booking_rules.is_some() {
        features.push(FEATURE_BOOKING_RULES.to_string());
    }
    if feed
        .routes
        .rows
        .iter()
        .any(|route| route.continuous_pickup.is_some() || route.continuous_drop_off.is_some())
    {
        features.push(FEATURE_CONTINUOUS_STOPS.to_string());
    }
    if feed
        .stops
        .rows
        .iter()
        .any(|stop| stop.tts_stop_name.is_some())
    {
        features.push(FEATURE_TTS.to_string());
    }
    features
}

/// Batch report: runs after validation has fully finished, wrapping the
/// accumulated [`NoticeContainer`] and a freshly built summary.
pub fn build_report(
    feed: &GtfsFeed,
    notices: &NoticeContainer,
    context: ReportSummaryContext,
) -> ValidationReport {
    let mut summary = context.build(feed);
    summary.notice_counts = Some(ReportSeverityCounts::from_container(notices));

    let notice_groups = notices
        .groups()
        .into_iter()
        .map(|(code, samples)| ReportNoticeGroup {
            code: code.to_string(),
            severity: samples
                .first()
                .map(|notice| notice.severity)
                .unwrap_or(NoticeSeverity::Info),
            total_notices: notices.emitted_count(code),
            sample_contexts: samples
                .iter()
                .map(|notice| notice.context.clone())
                .collect(),
        })
        .collect();

    ValidationReport {
        summary,
        notices: notice_groups,
    }
}

/// A group of notices sharing a code, as delivered to a streaming listener.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeGroup {
    pub code: String,
    pub severity: NoticeSeverity,
    pub count: usize,
}

/// Prepares a [`NoticeContainer`] to call `on_group` every time a code is
/// first seen or reaches its cap, so a long-running CLI invocation can
/// stream progress rather than wait for the whole run to print a report.
pub fn install_streaming_listener<F>(container: &mut NoticeContainer, mut on_group: F)
where
    F: FnMut(NoticeGroup) + Send + Sync + 'static,
{
    let counts = std::sync::Mutex::new(BTreeMap::<String, usize>::new());
    container.set_listener(std::sync::Arc::new(move |notice: &ValidationNotice| {
        let mut counts = counts.lock().unwrap_or_else(|err| err.into_inner());
        let count = counts.entry(notice.code.clone()).or_insert(0);
        *count += 1;
        on_group(NoticeGroup {
            code: notice.code.clone(),
            severity: notice.severity,
            count: *count,
        });
    }));
}

#[allow(dead_code)]
fn route_type_is_known(route_type: RouteType) -> bool {
    !matches!(route_type, RouteType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtfs_validator_core::CsvTable;

    fn sample_feed() -> GtfsFeed {
        GtfsFeed {
            agency: CsvTable {
                headers: vec!["agency_name".into()],
                rows: vec![gtfs_model::Agency {
                    agency_id: None,
                    agency_name: "Test Agency".to_string(),
                    agency_url: "https://example.com".to_string(),
                    agency_timezone: "UTC".to_string(),
                    agency_lang: None,
                    agency_phone: Some("555-1234".to_string()),
                    agency_fare_url: None,
                    agency_email: None,
                }],
                row_numbers: vec![2],
            },
            ..Default::default()
        }
    }

    #[test]
    fn builds_summary_with_agency_metadata() {
        let feed = sample_feed();
        let summary = ReportSummaryContext::default().build(&feed);

        let agencies = summary.agencies.expect("agencies present");
        assert_eq!(agencies.len(), 1);
        assert_eq!(agencies[0].name, "Test Agency");
        assert_eq!(agencies[0].phone, "555-1234");
    }

    #[test]
    fn build_report_carries_notices_through() {
        let feed = sample_feed();
        let mut notices = NoticeContainer::new();
        notices.push(ValidationNotice::new(
            "TEST_NOTICE",
            NoticeSeverity::Info,
            "test",
        ));

        let report = build_report(&feed, &notices, ReportSummaryContext::default());
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].code, "TEST_NOTICE");
        assert_eq!(report.notices[0].total_notices, 1);
        assert_eq!(report.notices[0].sample_contexts.len(), 1);
    }

    #[test]
    fn build_report_groups_notices_and_preserves_true_totals_past_the_cap() {
        let feed = sample_feed();
        let mut notices = NoticeContainer::with_max_notices_per_type(2);
        for index in 0..5 {
            notices.push(ValidationNotice::new(
                "duplicate_route_long_name",
                NoticeSeverity::Warning,
                format!("m{index}"),
            ));
        }

        let report = build_report(&feed, &notices, ReportSummaryContext::default());
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].code, "duplicate_route_long_name");
        assert_eq!(report.notices[0].severity, NoticeSeverity::Warning);
        assert_eq!(report.notices[0].total_notices, 5);
        assert_eq!(report.notices[0].sample_contexts.len(), 2);
    }

    #[test]
    fn build_report_tallies_notices_by_severity() {
        let feed = sample_feed();
        let mut notices = NoticeContainer::new();
        notices.push(ValidationNotice::new("a", NoticeSeverity::Error, "a"));
        notices.push(ValidationNotice::new("b", NoticeSeverity::Warning, "b"));
        notices.push(ValidationNotice::new("c", NoticeSeverity::Warning, "c"));
        notices.push(ValidationNotice::new("d", NoticeSeverity::Info, "d"));

        let report = build_report(&feed, &notices, ReportSummaryContext::default());
        let counts = report.summary.notice_counts.expect("notice counts present");
        assert_eq!(counts.error, 1);
        assert_eq!(counts.warning, 2);
        assert_eq!(counts.info, 1);
    }

    #[test]
    fn streaming_listener_reports_group_counts() {
        let mut notices = NoticeContainer::new();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        install_streaming_listener(&mut notices, move |group| {
            seen_clone.lock().unwrap().push(group.count);
        });

        notices.push(ValidationNotice::new("A", NoticeSeverity::Warning, "a"));
        notices.push(ValidationNotice::new("A", NoticeSeverity::Warning, "a"));

        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }
}
