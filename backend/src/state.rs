use crate::db::DbStatusCell;
use std::time::Instant;

/// Shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub started: Instant,
    pub db: DbStatusCell,
    /// 5xx responses go to Sentry when set.
    pub report_errors: bool,
}

impl AppState {
    #[must_use]
    pub fn new(db: DbStatusCell, report_errors: bool) -> Self {
        Self {
            started: Instant::now(),
            db,
            report_errors,
        }
    }
}
