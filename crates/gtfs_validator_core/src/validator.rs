use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::{GtfsFeed, NoticeContainer, NoticeSeverity, ValidationNotice};

pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer);
}

/// Shared flag checked between validator dispatches so a long-running
/// validation can be aborted without waiting for every validator to finish.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct ValidatorRunner {
    validators: Vec<Box<dyn Validator>>,
    num_threads: Option<usize>,
}

impl ValidatorRunner {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            num_threads: None,
        }
    }

    pub fn with_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn register<V>(&mut self, validator: V)
    where
        V: Validator + 'static,
    {
        self.validators.push(Box::new(validator));
    }

    pub fn run(&self, feed: &GtfsFeed) -> NoticeContainer {
        let mut notices = NoticeContainer::new();
        self.run_with(feed, &mut notices);
        notices
    }

    pub fn run_with(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
        self.run_with_cancellation(feed, notices, &CancellationToken::new());
    }

    /// Runs every registered validator, honoring `num_threads` (if set) via a
    /// bounded rayon thread pool, and stopping early if `cancellation` is
    /// tripped mid-run.
    pub fn run_with_cancellation(
        &self,
        feed: &GtfsFeed,
        notices: &mut NoticeContainer,
        cancellation: &CancellationToken,
    ) {
        // Capture thread-local context before parallel execution
        let captured_date = crate::validation_date();
        let captured_country = crate::validation_country_code();
        let captured_google_rules = crate::google_rules_enabled();

        let run_all = || {
            self.validators
                .par_iter()
                .map(|validator| {
                    if cancellation.is_cancelled() {
                        return NoticeContainer::new();
                    }
                    // Propagate thread-local context to worker thread
                    let _date_guard = crate::set_validation_date(Some(captured_date));
                    let _country_guard =
                        crate::set_validation_country_code(captured_country.clone());
                    let _google_rules_guard =
                        crate::set_google_rules_enabled(captured_google_rules);

                    let mut local_notices = NoticeContainer::new();
                    let result = catch_unwind(AssertUnwindSafe(|| {
                        validator.validate(feed, &mut local_notices)
                    }));

                    if let Err(panic) = result {
                        local_notices.push(runtime_exception_in_validator_error_notice(
                            validator.name(),
                            panic_payload_message(&*panic),
                        ));
                    }
                    local_notices
                })
                .reduce(NoticeContainer::new, |mut a, b| {
                    a.merge(b);
                    a
                })
        };

        let new_notices = match self.num_threads {
            Some(num_threads) if num_threads > 0 => rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map(|pool| pool.install(run_all))
                .unwrap_or_else(|_| run_all()),
            _ => run_all(),
        };

        notices.merge(new_notices);
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

fn runtime_exception_in_validator_error_notice(
    validator: &str,
    message: String,
) -> ValidationNotice {
    let mut notice = ValidationNotice::new(
        "runtime_exception_in_validator_error",
        NoticeSeverity::Error,
        "runtime exception while validating gtfs",
    );
    notice.insert_context_field("exception", "panic");
    notice.insert_context_field("message", message);
    notice.insert_context_field("validator", validator);
    notice.field_order = vec![
        "exception".to_string(),
        "message".to_string(),
        "validator".to_string(),
    ];
    notice
}

#[allow(dead_code)]
fn thread_execution_error_notice(message: &str) -> ValidationNotice {
    let mut notice = ValidationNotice::new(
        "thread_execution_error",
        NoticeSeverity::Error,
        "thread execution error",
    );
    notice.insert_context_field("exception", "thread_execution_error");
    notice.insert_context_field("message", message);
    notice.field_order = vec!["exception".to_string(), "message".to_string()];
    notice
}

fn panic_payload_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
