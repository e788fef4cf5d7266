//! Application state shared across handlers.

use database::Database;
use lifecycle::SwapLifecycle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection, for plain reads.
    pub db: Database,
    /// Lifecycle service, for the invariant-bearing writes.
    pub lifecycle: SwapLifecycle,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database) -> Self {
        let lifecycle = SwapLifecycle::new(db.clone());
        Self { db, lifecycle }
    }
}
