//! Dashboard module
//!
//! Provides the overview page with KPI cards, AI alerts and charts for the
//! records selected by the date and client filters, plus a JSON summary of the
//! same data.

mod alerts;
mod cards;
mod charts;
mod filter_bar;
mod handlers;
mod ranking;

pub use handlers::{get_dashboard_page, get_summary};
