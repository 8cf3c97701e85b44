//! The canonical transaction record that every data source converts into.

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::{Error, owner::OwnerId};

/// Alias for the integer type used for record IDs.
pub type RecordId = i64;

/// The direction of money movement for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl RecordKind {
    /// The plural label used for chart series and table headers.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expenses",
        }
    }
}

/// The suggested categories for expenses.
///
/// Categories are free text, this list only seeds pickers and decides which
/// series the category evolution chart shows.
pub const EXPENSE_CATEGORIES: [&str; 15] = [
    "Rent",
    "Fixed Bills",
    "Groceries",
    "Fast Food",
    "Transport",
    "Health",
    "Children",
    "Work",
    "Tools",
    "Leisure & Social",
    "Education",
    "Debts",
    "Savings",
    "Goals",
    "Unexpected",
];

/// The suggested categories for income, disjoint from [EXPENSE_CATEGORIES].
pub const INCOME_CATEGORIES: [&str; 3] = ["Website", "Automation", "Design"];

/// Whether `category` is one of the suggested expense categories.
pub fn is_expense_category(category: &str) -> bool {
    EXPENSE_CATEGORIES.contains(&category)
}

/// An immutable fact about money moving in or out of an account.
///
/// New records are created with [TransactionRecord::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    id: RecordId,
    owner_id: Option<OwnerId>,
    amount: f64,
    counterparty_from: String,
    counterparty_to: String,
    kind: RecordKind,
    category: String,
    posted_date: Date,
    recorded_at: PrimitiveDateTime,
}

impl TransactionRecord {
    /// Start building a record.
    ///
    /// The record has no owner or counterparties and is recorded at midnight
    /// on `posted_date` unless set on the builder.
    pub fn build(
        id: RecordId,
        amount: f64,
        kind: RecordKind,
        category: &str,
        posted_date: Date,
    ) -> TransactionRecordBuilder {
        TransactionRecordBuilder {
            id,
            owner_id: None,
            amount,
            counterparty_from: String::new(),
            counterparty_to: String::new(),
            kind,
            category: category.to_owned(),
            posted_date,
            recorded_at: posted_date.midnight(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn owner_id(&self) -> Option<OwnerId> {
        self.owner_id
    }

    /// The positive magnitude of the record.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn counterparty_from(&self) -> &str {
        &self.counterparty_from
    }

    pub fn counterparty_to(&self) -> &str {
        &self.counterparty_to
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The date the record is financially attributed to.
    pub fn posted_date(&self) -> Date {
        self.posted_date
    }

    /// When the entry was created, which may differ from [Self::posted_date].
    pub fn recorded_at(&self) -> PrimitiveDateTime {
        self.recorded_at
    }

    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == RecordKind::Expense
    }

    /// Whether the record belongs to `owner_id`, or `true` when no owner is given.
    pub fn is_owned_by(&self, owner_id: Option<OwnerId>) -> bool {
        owner_id.is_none_or(|owner_id| self.owner_id == Some(owner_id))
    }
}

/// Builder for [TransactionRecord], validated by [TransactionRecordBuilder::finalise].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecordBuilder {
    id: RecordId,
    owner_id: Option<OwnerId>,
    amount: f64,
    counterparty_from: String,
    counterparty_to: String,
    kind: RecordKind,
    category: String,
    posted_date: Date,
    recorded_at: PrimitiveDateTime,
}

impl TransactionRecordBuilder {
    pub fn owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn counterparties(mut self, from: &str, to: &str) -> Self {
        from.clone_into(&mut self.counterparty_from);
        to.clone_into(&mut self.counterparty_to);
        self
    }

    pub fn recorded_at(mut self, recorded_at: PrimitiveDateTime) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Create the record.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is zero, negative, NaN or infinite.
    pub fn finalise(self) -> Result<TransactionRecord, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        Ok(TransactionRecord {
            id: self.id,
            owner_id: self.owner_id,
            amount: self.amount,
            counterparty_from: self.counterparty_from,
            counterparty_to: self.counterparty_to,
            kind: self.kind,
            category: self.category,
            posted_date: self.posted_date,
            recorded_at: self.recorded_at,
        })
    }
}
