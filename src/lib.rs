//! Octopus Finance is a dashboard for keeping track of personal and client
//! finances.
//!
//! The library filters transaction records by date range and client, reduces
//! them into KPI summaries and serves an HTML dashboard with charts built from
//! the same aggregations.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod ai_alert;
mod alert;
mod app_state;
mod dashboard;
mod endpoints;
mod filter;
mod grouping;
mod html;
mod internal_server_error;
mod kpi;
mod logging;
mod not_found;
mod owner;
mod record;
mod repository;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use ai_alert::{AiAlert, AlertPriority};
pub use app_state::AppState;
pub use filter::{DateFilter, DateFilterKind, DateRange, filter_records};
pub use grouping::{GroupedTotals, day_key, group_sum, month_key, percent_of, top_n};
pub use kpi::{CategoryTotal, KpiSummary, summarize};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use owner::{ClientOption, OwnerId, client_label, unique_clients};
pub use record::{
    EXPENSE_CATEGORIES, INCOME_CATEGORIES, RecordId, RecordKind, TransactionRecord,
    TransactionRecordBuilder,
};
pub use repository::{ExportRepository, FixtureRepository, RecordRepository};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction record was created with an amount that is zero, negative
    /// or not a finite number.
    ///
    /// The direction of money movement is carried by [RecordKind], so amounts
    /// are always positive magnitudes.
    #[error("{0} is not a valid amount, amounts must be positive")]
    NonPositiveAmount(f64),

    /// A custom date filter where the start date comes after the end date.
    #[error("the start date {start} is after the end date {end}")]
    InvalidDateRange {
        /// The first day of the requested range.
        start: Date,
        /// The last day of the requested range.
        end: Date,
    },

    /// A date in a query string that is not formatted as `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A client ID in a query string that is not an integer.
    #[error("\"{0}\" is not a valid client ID")]
    InvalidClientId(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A row from a data source that could not be converted into a
    /// [TransactionRecord].
    ///
    /// Callers should pass in the ID of the offending row (or an empty string
    /// if it has none) and a short description of what is wrong with it.
    #[error("malformed record \"{id}\": {reason}")]
    MalformedRecord {
        /// The ID of the row as it appears in the data source.
        id: String,
        /// What is wrong with the row.
        reason: String,
    },

    /// The records file could not be read.
    #[error("could not read records file \"{path}\": {reason}")]
    DataSourceRead {
        /// The path to the file.
        path: String,
        /// The underlying I/O error.
        reason: String,
    },

    /// The records file was read but its contents could not be parsed.
    #[error("could not parse records file \"{path}\": {reason}")]
    DataSourceParse {
        /// The path to the file.
        path: String,
        /// The underlying JSON or CSV error.
        reason: String,
    },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDateRange { .. } | Error::InvalidDate(_) | Error::InvalidClientId(_) => {
                InternalServerError {
                    status: StatusCode::BAD_REQUEST,
                    header: "400",
                    description: "Invalid Filter",
                    fix: &self.to_string(),
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidDateRange { start, end } => Alert::Error {
                message: "Invalid date range".to_owned(),
                details: format!(
                    "The start date {start} comes after the end date {end}. \
                    Pick a start date on or before the end date."
                ),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidDate(date) => Alert::Error {
                message: "Invalid date".to_owned(),
                details: format!("\"{date}\" is not a valid date, expected YYYY-MM-DD."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidClientId(client) => Alert::Error {
                message: "Invalid client".to_owned(),
                details: format!("Could not find a client with the ID \"{client}\"."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
