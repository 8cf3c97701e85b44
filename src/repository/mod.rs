//! Where the dashboard gets its records and alerts from.
//!
//! Handlers only see the [RecordRepository] trait, so the demo data and
//! exported datastore rows can be swapped without touching the dashboard.

mod export;
mod fixtures;

pub use export::ExportRepository;
pub use fixtures::FixtureRepository;

use crate::{Error, ai_alert::AiAlert, owner::OwnerId, record::TransactionRecord};

/// A read-only source of transaction records and AI alerts.
pub trait RecordRepository: Send + Sync {
    /// The records belonging to `owner_id`, or every record if no owner is given.
    ///
    /// # Errors
    /// Returns an error if the underlying data source could not be read.
    fn list(&self, owner_id: Option<OwnerId>) -> Result<Vec<TransactionRecord>, Error>;

    /// The alerts for `owner_id`, or every alert if no owner is given.
    ///
    /// # Errors
    /// Returns an error if the underlying data source could not be read.
    fn list_alerts(&self, owner_id: Option<OwnerId>) -> Result<Vec<AiAlert>, Error>;
}
