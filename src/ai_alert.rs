//! Automatically generated insights about a client's finances.

use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, macros::format_description};

use crate::owner::OwnerId;

/// How urgently the client should look at an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    /// Good news or a suggestion.
    Low,
    /// Something to keep an eye on.
    Medium,
    /// Something that needs attention now.
    High,
}

impl AlertPriority {
    /// The label shown on the alert badge.
    pub fn label(self) -> &'static str {
        match self {
            AlertPriority::Low => "Low",
            AlertPriority::Medium => "Medium",
            AlertPriority::High => "High",
        }
    }
}

/// A message generated for a client by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiAlert {
    /// The alert's ID.
    pub id: i64,
    /// The client the alert was written for.
    pub owner_id: OwnerId,
    /// The text of the alert.
    pub message: String,
    /// How urgent the alert is.
    pub priority: AlertPriority,
    /// When the alert was generated.
    pub created_at: PrimitiveDateTime,
}

impl AiAlert {
    /// The creation time formatted for display, e.g. "28 Feb 10:00".
    pub fn display_timestamp(&self) -> String {
        format_timestamp(self.created_at)
    }
}

/// The alerts for `owner_id`, or every alert when no owner is given.
pub fn alerts_for_owner(alerts: &[AiAlert], owner_id: Option<OwnerId>) -> Vec<AiAlert> {
    alerts
        .iter()
        .filter(|alert| owner_id.is_none_or(|owner_id| alert.owner_id == owner_id))
        .cloned()
        .collect()
}

fn format_timestamp(timestamp: PrimitiveDateTime) -> String {
    timestamp
        .format(format_description!(
            "[day] [month repr:short] [hour]:[minute]"
        ))
        .unwrap_or_else(|error| {
            tracing::error!("could not format alert timestamp {timestamp}: {error}");
            timestamp.to_string()
        })
}
