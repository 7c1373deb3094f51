//! Validation engine for GTFS static feeds: feed loading, CSV parsing and
//! schema enforcement, the notice/severity model, and the registry of rule
//! validators that `gtfs_validator_cli` and `gtfs_validator_report` build on.

pub mod csv_reader;
pub mod csv_schema;
pub mod csv_table;
pub mod csv_validation;
pub mod engine;
pub mod feed;
pub mod geojson;
pub mod input;
pub mod notice;
pub mod reference_index;
pub mod rules;
pub mod validation_context;
pub mod validator;

pub use csv_reader::{CsvParseError, CsvRow};
pub use csv_table::CsvTable;
pub use engine::{validate_input, validate_input_into, ValidationOutcome};
pub use feed::GtfsFeed;
pub use geojson::{GeoJsonBounds, GeoJsonFeatureCollection, LocationsGeoJson};
pub use input::{collect_input_notices, GtfsInput, GtfsInputError, GtfsInputReader};
pub use notice::{
    NoticeContainer, NoticeSeverity, SharedNoticeContainer, ValidationNotice,
    DEFAULT_MAX_NOTICES_PER_TYPE,
};
pub use reference_index::ReferenceIndex;
pub use rules::default_runner;
pub use validation_context::{
    google_rules_enabled, set_google_rules_enabled, set_thorough_mode_enabled,
    set_validation_country_code, set_validation_date, thorough_mode_enabled,
    validation_country_code, validation_date, ValidationConfig, ValidationConfigGuard,
};
pub use validator::{CancellationToken, Validator, ValidatorRunner};
