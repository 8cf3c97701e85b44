//! Shorthand for building records in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use time::Date;

use crate::record::{RecordKind, TransactionRecord, TransactionRecordBuilder};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

pub(crate) fn income(amount: f64, posted_date: Date, category: &str) -> TransactionRecordBuilder {
    record(amount, RecordKind::Income, posted_date, category)
}

pub(crate) fn expense(amount: f64, posted_date: Date, category: &str) -> TransactionRecordBuilder {
    record(amount, RecordKind::Expense, posted_date, category)
}

fn record(
    amount: f64,
    kind: RecordKind,
    posted_date: Date,
    category: &str,
) -> TransactionRecordBuilder {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    TransactionRecord::build(id, amount, kind, category, posted_date)
}

/// Finalise every builder, panicking on invalid test data.
pub(crate) fn finalise_all(
    builders: impl IntoIterator<Item = TransactionRecordBuilder>,
) -> Vec<TransactionRecord> {
    builders
        .into_iter()
        .map(|builder| builder.finalise().expect("invalid test record"))
        .collect()
}
