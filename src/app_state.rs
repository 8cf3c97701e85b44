//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::repository::RecordRepository;

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// Where records and alerts are loaded from.
    pub repository: Arc<dyn RecordRepository>,

    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    pub fn new(repository: impl RecordRepository + 'static, local_timezone: &str) -> Self {
        Self {
            repository: Arc::new(repository),
            local_timezone: local_timezone.to_owned(),
        }
    }
}
