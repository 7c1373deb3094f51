use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::csv_reader::CsvParseError;

/// Default cap on how many notices of a single code are kept in memory.
/// Feeds with a systemic problem (a column missing from every row, say)
/// would otherwise produce one notice per row.
pub const DEFAULT_MAX_NOTICES_PER_TYPE: usize = 100;

pub const NOTICE_CODE_CSV_PARSE_ERROR: &str = "csv_parsing_failed";
pub const NOTICE_CODE_MISSING_FILE: &str = "missing_required_file";
pub const NOTICE_CODE_MISSING_RECOMMENDED_FILE: &str = "missing_recommended_file";
pub const NOTICE_CODE_EMPTY_TABLE: &str = "empty_file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationNotice {
    pub code: String,
    pub severity: NoticeSeverity,
    pub message: String,
    pub file: Option<String>,
    pub row: Option<u64>,
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_order: Vec<String>,
}

impl ValidationNotice {
    pub fn new(
        code: impl Into<String>,
        severity: NoticeSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            file: None,
            row: None,
            field: None,
            context: BTreeMap::new(),
            field_order: Vec::new(),
        }
    }

    pub fn from_csv_error(error: &CsvParseError) -> Self {
        let mut notice = ValidationNotice::new(
            NOTICE_CODE_CSV_PARSE_ERROR,
            NoticeSeverity::Error,
            error.message.clone(),
        );
        notice.insert_context_field("charIndex", error.char_index.unwrap_or_default());
        notice.insert_context_field("columnIndex", error.column_index.unwrap_or_default());
        notice.insert_context_field("filename", error.file.clone());
        notice.insert_context_field("lineIndex", error.line_index.unwrap_or_default());
        notice.insert_context_field("message", error.message.clone());
        notice.insert_context_field(
            "parsedContent",
            error.parsed_content.clone().unwrap_or_default(),
        );
        notice.field_order = vec![
            "charIndex".to_string(),
            "columnIndex".to_string(),
            "filename".to_string(),
            "lineIndex".to_string(),
            "message".to_string(),
            "parsedContent".to_string(),
        ];
        return notice;
    }

    pub fn missing_file(file: impl Into<String>) -> Self {
        let file = file.into();
        let mut notice = ValidationNotice::new(
            NOTICE_CODE_MISSING_FILE,
            NoticeSeverity::Error,
            "missing required GTFS file",
        );
        notice.file = Some(file.clone());
        notice.insert_context_field("filename", file);
        return notice;
    }

    pub fn empty_table(file: impl Into<String>) -> Self {
        let file = file.into();
        let mut notice = ValidationNotice::new(
            NOTICE_CODE_EMPTY_TABLE,
            NoticeSeverity::Error,
            "GTFS table has no rows",
        );
        notice.file = Some(file.clone());
        notice.insert_context_field("filename", file);
        return notice;
    }

    pub fn missing_recommended_file(file: impl Into<String>) -> Self {
        let file = file.into();
        let mut notice = ValidationNotice::new(
            NOTICE_CODE_MISSING_RECOMMENDED_FILE,
            NoticeSeverity::Warning,
            "missing recommended GTFS file",
        );
        notice.file = Some(file.clone());
        notice.insert_context_field("filename", file);
        return notice;
    }

    pub fn insert_context_field<V: Serialize>(&mut self, name: impl Into<String>, value: V) {
        let key = name.into();
        let serialized = serde_json::to_value(value).unwrap_or_else(|_| Value::Null);
        if !self.field_order.iter().any(|item| item == &key) {
            self.field_order.push(key.clone());
        }
        self.context.insert(key, serialized);
    }

    pub fn with_context_field<V: Serialize>(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert_context_field(name, value);
        self
    }

    pub fn set_location(&mut self, file: impl Into<String>, field: impl Into<String>, row: u64) {
        self.file = Some(file.into());
        self.field = Some(field.into());
        self.row = Some(row);
        self.field_order = vec![
            "filename".to_string(),
            "csvRowNumber".to_string(),
            "fieldName".to_string(),
        ];
    }

    pub fn with_location(
        mut self,
        file: impl Into<String>,
        field: impl Into<String>,
        row: u64,
    ) -> Self {
        self.set_location(file, field, row);
        self
    }
}

type NoticeListener = Arc<dyn Fn(&ValidationNotice) + Send + Sync>;

/// Holds accumulated notices, enforcing a per-code cap so a single
/// systemic issue can't balloon memory use. A cap of `0` means
/// unbounded: every notice of every code is stored. `emitted_by_code`
/// keeps counting past the cap so callers can still report how many
/// notices of a type actually occurred, even though only the first
/// `max_per_code` are retained.
#[derive(Clone)]
pub struct NoticeContainer {
    notices: Vec<ValidationNotice>,
    max_per_code: usize,
    stored_by_code: BTreeMap<String, usize>,
    emitted_by_code: BTreeMap<String, usize>,
    listener: Option<NoticeListener>,
}

impl std::fmt::Debug for NoticeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeContainer")
            .field("notices", &self.notices)
            .field("max_per_code", &self.max_per_code)
            .finish()
    }
}

impl Default for NoticeContainer {
    fn default() -> Self {
        Self::with_max_notices_per_type(DEFAULT_MAX_NOTICES_PER_TYPE)
    }
}

impl NoticeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_notices_per_type(max_per_code: usize) -> Self {
        Self {
            notices: Vec::new(),
            max_per_code,
            stored_by_code: BTreeMap::new(),
            emitted_by_code: BTreeMap::new(),
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: NoticeListener) {
        self.listener = Some(listener);
    }

    pub fn push(&mut self, notice: ValidationNotice) {
        let emitted = self.emitted_by_code.entry(notice.code.clone()).or_insert(0);
        *emitted += 1;
        let stored = self.stored_by_code.entry(notice.code.clone()).or_insert(0);
        let was_first = *stored == 0;
        let unbounded = self.max_per_code == 0;
        let cap_just_reached = !unbounded && *stored == self.max_per_code.saturating_sub(1);
        if !unbounded && *stored >= self.max_per_code {
            return;
        }
        *stored += 1;
        if let Some(listener) = &self.listener {
            if was_first || cap_just_reached {
                listener(&notice);
            }
        }
        self.notices.push(notice);
    }

    pub fn push_csv_error(&mut self, error: &CsvParseError) {
        self.push(ValidationNotice::from_csv_error(error));
    }

    pub fn push_missing_file(&mut self, file: impl Into<String>) {
        self.push(ValidationNotice::missing_file(file));
    }

    pub fn push_empty_table(&mut self, file: impl Into<String>) {
        self.push(ValidationNotice::empty_table(file));
    }

    pub fn push_missing_recommended_file(&mut self, file: impl Into<String>) {
        self.push(ValidationNotice::missing_recommended_file(file));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationNotice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn into_notices(self) -> Vec<ValidationNotice> {
        self.notices
    }

    /// Number of notices stored for `code` (after cap enforcement).
    pub fn stored_count(&self, code: &str) -> usize {
        self.stored_by_code.get(code).copied().unwrap_or(0)
    }

    /// Number of notices of `code` actually produced, including ones
    /// dropped once the cap was hit.
    pub fn emitted_count(&self, code: &str) -> usize {
        self.emitted_by_code.get(code).copied().unwrap_or(0)
    }

    /// Notices grouped by code, in the order each code was first seen.
    pub fn groups(&self) -> Vec<(&str, Vec<&ValidationNotice>)> {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: BTreeMap<&str, Vec<&ValidationNotice>> = BTreeMap::new();
        for notice in &self.notices {
            if !grouped.contains_key(notice.code.as_str()) {
                order.push(notice.code.as_str());
            }
            grouped.entry(notice.code.as_str()).or_default().push(notice);
        }
        order
            .into_iter()
            .map(|code| (code, grouped.remove(code).unwrap_or_default()))
            .collect()
    }

    pub fn count_by_severity(&self) -> BTreeMap<NoticeSeverity, usize> {
        let mut counts = BTreeMap::new();
        for notice in &self.notices {
            *counts.entry(notice.severity).or_insert(0) += 1;
        }
        counts
    }

    pub fn merge(&mut self, other: NoticeContainer) {
        for notice in other.notices {
            self.push(notice);
        }
    }
}

/// Thread-safe handle to a [`NoticeContainer`], used by validators that run
/// concurrently and need to push notices from worker threads.
#[derive(Clone)]
pub struct SharedNoticeContainer {
    inner: Arc<Mutex<NoticeContainer>>,
}

impl SharedNoticeContainer {
    pub fn new(container: NoticeContainer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(container)),
        }
    }

    pub fn push(&self, notice: ValidationNotice) {
        self.inner.lock().expect("notice container lock poisoned").push(notice);
    }

    pub fn merge(&self, other: NoticeContainer) {
        self.inner.lock().expect("notice container lock poisoned").merge(other);
    }

    pub fn into_inner(self) -> NoticeContainer {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner().expect("notice container lock poisoned"))
            .unwrap_or_else(|arc| arc.lock().expect("notice container lock poisoned").clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_stored_notices_per_code_but_keeps_counting_emitted() {
        let mut container = NoticeContainer::with_max_notices_per_type(100);
        for index in 0..250 {
            container.push(ValidationNotice::new(
                "duplicate_route_long_name",
                NoticeSeverity::Warning,
                format!("duplicate #{index}"),
            ));
        }
        assert_eq!(container.stored_count("duplicate_route_long_name"), 100);
        assert_eq!(container.emitted_count("duplicate_route_long_name"), 250);
        assert_eq!(container.len(), 100);
    }

    #[test]
    fn zero_max_notices_per_type_means_unbounded() {
        let mut container = NoticeContainer::with_max_notices_per_type(0);
        for index in 0..250 {
            container.push(ValidationNotice::new(
                "duplicate_route_long_name",
                NoticeSeverity::Warning,
                format!("duplicate #{index}"),
            ));
        }
        assert_eq!(container.stored_count("duplicate_route_long_name"), 250);
        assert_eq!(container.emitted_count("duplicate_route_long_name"), 250);
        assert_eq!(container.len(), 250);
    }

    #[test]
    fn groups_notices_by_code_in_first_seen_order() {
        let mut container = NoticeContainer::new();
        container.push(ValidationNotice::new("a", NoticeSeverity::Error, "first"));
        container.push(ValidationNotice::new("b", NoticeSeverity::Warning, "second"));
        container.push(ValidationNotice::new("a", NoticeSeverity::Error, "third"));

        let groups = container.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "a");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "b");
    }

    #[test]
    fn listener_fires_on_first_insertion_and_cap_reached() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let mut container = NoticeContainer::with_max_notices_per_type(2);
        container.set_listener(Arc::new(move |notice: &ValidationNotice| {
            events_clone.lock().unwrap().push(notice.message.clone());
        }));

        for index in 0..5 {
            container.push(ValidationNotice::new(
                "dup",
                NoticeSeverity::Warning,
                format!("m{index}"),
            ));
        }

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.as_slice(), &["m0".to_string(), "m1".to_string()]);
    }
}
