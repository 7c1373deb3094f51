use std::cell::{Cell, RefCell};

use chrono::{NaiveDate, Utc};

thread_local! {
    static VALIDATION_DATE: Cell<Option<NaiveDate>> = const { Cell::new(None) };
    static VALIDATION_COUNTRY_CODE: RefCell<Option<String>> = const { RefCell::new(None) };
    static GOOGLE_RULES_ENABLED: Cell<bool> = const { Cell::new(false) };
    static THOROUGH_MODE: Cell<bool> = const { Cell::new(false) };
}

pub struct ValidationDateGuard {
    previous: Option<NaiveDate>,
}

impl Drop for ValidationDateGuard {
    fn drop(&mut self) {
        VALIDATION_DATE.with(|cell| cell.set(self.previous));
    }
}

pub fn set_validation_date(date: Option<NaiveDate>) -> ValidationDateGuard {
    let previous = VALIDATION_DATE.with(|cell| {
        let previous = cell.get();
        cell.set(date);
        previous
    });
    ValidationDateGuard { previous }
}

pub fn validation_date() -> NaiveDate {
    VALIDATION_DATE.with(|cell| cell.get().unwrap_or_else(|| Utc::now().date_naive()))
}

pub struct ValidationCountryCodeGuard {
    previous: Option<String>,
}

impl Drop for ValidationCountryCodeGuard {
    fn drop(&mut self) {
        VALIDATION_COUNTRY_CODE.with(|cell| {
            *cell.borrow_mut() = self.previous.take();
        });
    }
}

pub fn set_validation_country_code(code: Option<String>) -> ValidationCountryCodeGuard {
    let previous = VALIDATION_COUNTRY_CODE.with(|cell| {
        let previous = cell.borrow().clone();
        *cell.borrow_mut() = code;
        previous
    });
    ValidationCountryCodeGuard { previous }
}

pub fn validation_country_code() -> Option<String> {
    VALIDATION_COUNTRY_CODE.with(|cell| cell.borrow().clone())
}

pub struct ValidationGoogleRulesGuard {
    previous: bool,
}

impl Drop for ValidationGoogleRulesGuard {
    fn drop(&mut self) {
        GOOGLE_RULES_ENABLED.with(|cell| cell.set(self.previous));
    }
}

pub fn set_google_rules_enabled(enabled: bool) -> ValidationGoogleRulesGuard {
    let previous = GOOGLE_RULES_ENABLED.with(|cell| {
        let previous = cell.get();
        cell.set(enabled);
        previous
    });
    ValidationGoogleRulesGuard { previous }
}

pub fn google_rules_enabled() -> bool {
    GOOGLE_RULES_ENABLED.with(|cell| cell.get())
}

pub struct ThoroughModeGuard {
    previous: bool,
}

impl Drop for ThoroughModeGuard {
    fn drop(&mut self) {
        THOROUGH_MODE.with(|cell| cell.set(self.previous));
    }
}

pub fn set_thorough_mode_enabled(enabled: bool) -> ThoroughModeGuard {
    let previous = THOROUGH_MODE.with(|cell| {
        let previous = cell.get();
        cell.set(enabled);
        previous
    });
    ThoroughModeGuard { previous }
}

pub fn thorough_mode_enabled() -> bool {
    THOROUGH_MODE.with(|cell| cell.get())
}

/// How validators should treat GTFS fields that reference calendar dates,
/// absent the thread-local guards: the values to publish, and the knobs
/// that control the run itself rather than per-field interpretation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub current_date: Option<NaiveDate>,
    pub country_code: Option<String>,
    pub google_rules_enabled: bool,
    pub thorough_mode: bool,
    pub max_notices_per_type: usize,
    pub num_threads: Option<usize>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            current_date: None,
            country_code: None,
            google_rules_enabled: false,
            thorough_mode: false,
            max_notices_per_type: crate::notice::DEFAULT_MAX_NOTICES_PER_TYPE,
            num_threads: None,
        }
    }
}

/// Guards for every thread-local a [`ValidationConfig`] touches, held for
/// the duration of a validation run.
pub struct ValidationConfigGuard {
    _date: ValidationDateGuard,
    _country: ValidationCountryCodeGuard,
    _google_rules: ValidationGoogleRulesGuard,
    _thorough: ThoroughModeGuard,
}

impl ValidationConfig {
    pub fn apply(&self) -> ValidationConfigGuard {
        ValidationConfigGuard {
            _date: set_validation_date(self.current_date),
            _country: set_validation_country_code(self.country_code.clone()),
            _google_rules: set_google_rules_enabled(self.google_rules_enabled),
            _thorough: set_thorough_mode_enabled(self.thorough_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_config_sets_and_restores_thread_locals() {
        assert!(validation_country_code().is_none());
        let config = ValidationConfig {
            country_code: Some("US".to_string()),
            ..ValidationConfig::default()
        };
        {
            let _guard = config.apply();
            assert_eq!(validation_country_code(), Some("US".to_string()));
        }
        assert!(validation_country_code().is_none());
    }
}
