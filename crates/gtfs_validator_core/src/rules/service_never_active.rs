use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use gtfs_model::{Calendar, ExceptionType, GtfsDate, ServiceAvailability};

use crate::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice, Validator};

const CODE_SERVICE_NEVER_ACTIVE: &str = "service_never_active";

/// A service_id referenced by calendar.txt or calendar_dates.txt that has no
/// day on which it is actually scheduled: every weekday flag is `false` in
/// calendar.txt and calendar_dates.txt never adds it back, or its calendar
/// date range contains no added exception at all.
#[derive(Debug, Default)]
pub struct ServiceNeverActiveValidator;

impl Validator for ServiceNeverActiveValidator {
    fn name(&self) -> &'static str {
        "service_never_active"
    }

    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        let mut added_dates: HashSet<&str> = HashSet::new();
        let mut removed_dates: HashSet<&str> = HashSet::new();
        if let Some(calendar_dates) = &feed.calendar_dates {
            for row in &calendar_dates.rows {
                let service_id = row.service_id.trim();
                if service_id.is_empty() {
                    continue;
                }
                match row.exception_type {
                    ExceptionType::Added => {
                        added_dates.insert(service_id);
                    }
                    ExceptionType::Removed => {
                        removed_dates.insert(service_id);
                    }
                    _ => {}
                }
            }
        }

        if let Some(calendar) = &feed.calendar {
            for (index, row) in calendar.rows.iter().enumerate() {
                let row_number = calendar.row_number(index);
                let service_id = row.service_id.trim();
                if service_id.is_empty() {
                    continue;
                }
                if added_dates.contains(service_id) {
                    continue;
                }
                if has_weekly_service(row) && calendar_range_has_a_day(row) {
                    continue;
                }

                let mut notice = ValidationNotice::new(
                    CODE_SERVICE_NEVER_ACTIVE,
                    NoticeSeverity::Warning,
                    "service_id is never scheduled on any calendar date",
                );
                notice.insert_context_field("csvRowNumber", row_number);
                notice.insert_context_field("serviceId", service_id);
                notice.field_order = vec!["csvRowNumber".to_string(), "serviceId".to_string()];
                notices.push(notice);
            }
        }
    }
}

fn has_weekly_service(calendar: &Calendar) -> bool {
    [
        calendar.monday,
        calendar.tuesday,
        calendar.wednesday,
        calendar.thursday,
        calendar.friday,
        calendar.saturday,
        calendar.sunday,
    ]
    .iter()
    .any(|day| matches!(day, ServiceAvailability::Available))
}

fn calendar_range_has_a_day(calendar: &Calendar) -> bool {
    let (Some(start), Some(end)) = (
        gtfs_date_to_naive(calendar.start_date),
        gtfs_date_to_naive(calendar.end_date),
    ) else {
        return false;
    };

    let mut current = start;
    while current <= end {
        if service_available_on_date(calendar, current) {
            return true;
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    false
}

fn gtfs_date_to_naive(date: GtfsDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32)
}

fn service_available_on_date(calendar: &Calendar, date: NaiveDate) -> bool {
    match date.weekday() {
        Weekday::Mon => matches!(calendar.monday, ServiceAvailability::Available),
        Weekday::Tue => matches!(calendar.tuesday, ServiceAvailability::Available),
        Weekday::Wed => matches!(calendar.wednesday, ServiceAvailability::Available),
        Weekday::Thu => matches!(calendar.thursday, ServiceAvailability::Available),
        Weekday::Fri => matches!(calendar.friday, ServiceAvailability::Available),
        Weekday::Sat => matches!(calendar.saturday, ServiceAvailability::Available),
        Weekday::Sun => matches!(calendar.sunday, ServiceAvailability::Available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvTable;
    use gtfs_model::{CalendarDate, GtfsDate};

    fn calendar_row(service_id: &str, available: ServiceAvailability) -> Calendar {
        Calendar {
            service_id: service_id.to_string(),
            monday: available,
            tuesday: available,
            wednesday: available,
            thursday: available,
            friday: available,
            saturday: available,
            sunday: available,
            start_date: GtfsDate::parse("20240101").unwrap(),
            end_date: GtfsDate::parse("20240131").unwrap(),
        }
    }

    #[test]
    fn detects_service_with_every_day_unavailable_and_no_exceptions() {
        let feed = GtfsFeed {
            calendar: Some(CsvTable {
                headers: vec!["service_id".into()],
                rows: vec![calendar_row("S1", ServiceAvailability::Unavailable)],
                row_numbers: vec![2],
            }),
            ..Default::default()
        };

        let mut notices = NoticeContainer::new();
        ServiceNeverActiveValidator.validate(&feed, &mut notices);

        assert_eq!(notices.len(), 1);
        assert_eq!(notices.iter().next().unwrap().code, CODE_SERVICE_NEVER_ACTIVE);
    }

    #[test]
    fn passes_when_a_weekday_is_available() {
        let feed = GtfsFeed {
            calendar: Some(CsvTable {
                headers: vec!["service_id".into()],
                rows: vec![calendar_row("S1", ServiceAvailability::Available)],
                row_numbers: vec![2],
            }),
            ..Default::default()
        };

        let mut notices = NoticeContainer::new();
        ServiceNeverActiveValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }

    #[test]
    fn passes_when_calendar_dates_adds_the_service_back() {
        let feed = GtfsFeed {
            calendar: Some(CsvTable {
                headers: vec!["service_id".into()],
                rows: vec![calendar_row("S1", ServiceAvailability::Unavailable)],
                row_numbers: vec![2],
            }),
            calendar_dates: Some(CsvTable {
                headers: vec!["service_id".into()],
                rows: vec![CalendarDate {
                    service_id: "S1".to_string(),
                    date: GtfsDate::parse("20240115").unwrap(),
                    exception_type: ExceptionType::Added,
                }],
                row_numbers: vec![2],
            }),
            ..Default::default()
        };

        let mut notices = NoticeContainer::new();
        ServiceNeverActiveValidator.validate(&feed, &mut notices);

        assert!(notices.is_empty());
    }
}
