//! Reduces a set of records into the headline numbers shown on the dashboard.

use serde::Serialize;
use time::Date;

use crate::{
    filter::previous_month_range,
    grouping::{group_sum, top_n},
    owner::OwnerId,
    record::TransactionRecord,
};

/// A category and the sum of its records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The summed amount.
    pub value: f64,
}

/// The KPI cards' numbers for a filtered set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Income minus expenses.
    pub balance: f64,
    /// The sum of income records.
    pub total_income: f64,
    /// The sum of expense records.
    pub total_expense: f64,
    /// The expense category with the largest total, if there are any expenses.
    pub top_expense_category: Option<CategoryTotal>,
    /// The change in expenses relative to the previous calendar month, as a
    /// percentage rounded to one decimal place.
    pub month_over_month_variation_pct: f64,
    /// Shown as "average spending" on the dashboard.
    ///
    /// This is the total expense for the selected period, not a per-month
    /// average.
    pub average_expense: f64,
}

/// Summarise `filtered` records.
///
/// The month-over-month variation compares the filtered expenses against the
/// expenses in `all_records` (restricted to `owner_id` if given) during the
/// calendar month before `today`. It is anchored to `today` regardless of the
/// date filter used to produce `filtered`.
pub fn summarize(
    filtered: &[TransactionRecord],
    all_records: &[TransactionRecord],
    owner_id: Option<OwnerId>,
    today: Date,
) -> KpiSummary {
    let total_income = sum_where(filtered, TransactionRecord::is_income);
    let total_expense = sum_where(filtered, TransactionRecord::is_expense);

    let expenses_by_category = group_sum(
        filtered.iter().filter(|record| record.is_expense()),
        |record| record.category().to_owned(),
        TransactionRecord::amount,
    );
    let top_expense_category = top_n(&expenses_by_category, 1)
        .into_iter()
        .next()
        .map(|(name, value)| CategoryTotal { name, value });

    let previous_month = previous_month_range(today);
    let previous_month_expense: f64 = all_records
        .iter()
        .filter(|record| record.is_expense() && record.is_owned_by(owner_id))
        .filter(|record| previous_month.contains(record.posted_date()))
        .map(TransactionRecord::amount)
        .sum();

    let month_over_month_variation_pct = if previous_month_expense > 0.0 {
        round_to_one_decimal(
            (total_expense - previous_month_expense) / previous_month_expense * 100.0,
        )
    } else {
        0.0
    };

    KpiSummary {
        balance: total_income - total_expense,
        total_income,
        total_expense,
        top_expense_category,
        month_over_month_variation_pct,
        average_expense: total_expense,
    }
}

fn sum_where(records: &[TransactionRecord], predicate: fn(&TransactionRecord) -> bool) -> f64 {
    records
        .iter()
        .filter(|record| predicate(record))
        .map(TransactionRecord::amount)
        .sum()
}

/// Round half away from zero to one decimal place.
pub(crate) fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
