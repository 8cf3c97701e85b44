//! Group-by-and-sum helpers shared by the KPI summary and the dashboard charts.

use std::{collections::HashMap, hash::Hash};

use time::Date;

/// Totals keyed by a group, remembering the order each key was first seen.
#[derive(Debug, Clone)]
pub struct GroupedTotals<K> {
    entries: Vec<(K, f64)>,
    index: HashMap<K, usize>,
}

impl<K> Default for GroupedTotals<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> GroupedTotals<K> {
    /// Add `value` to the total for `key`, creating the group if needed.
    pub fn add(&mut self, key: K, value: f64) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 += value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1)
    }

    /// The number of distinct groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(key, value)| (key, *value))
    }

    /// The sum over every group.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }
}

/// Group `items` by `key_fn` and sum `value_fn` within each group.
pub fn group_sum<'a, T, K, I>(
    items: I,
    key_fn: impl Fn(&T) -> K,
    value_fn: impl Fn(&T) -> f64,
) -> GroupedTotals<K>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Clone,
{
    let mut totals = GroupedTotals::default();

    for item in items {
        totals.add(key_fn(item), value_fn(item));
    }

    totals
}

/// The `n` largest groups in descending order.
///
/// Equal totals keep their first-seen order. Fewer than `n` groups are
/// returned as is, never padded.
pub fn top_n<K: Eq + Hash + Clone>(grouped: &GroupedTotals<K>, n: usize) -> Vec<(K, f64)> {
    let mut entries = grouped.entries.clone();
    // `sort_by` is stable, so ties stay in insertion order.
    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries.truncate(n);
    entries
}

/// The month bucket for a date, formatted as `YYYY-MM`.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// The day bucket for a date, formatted as `YYYY-MM-DD`.
pub fn day_key(date: Date) -> String {
    format!("{}-{:02}", month_key(date), date.day())
}

/// `value` as a percentage of `total`, or zero when `total` is zero.
pub fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    }
}
