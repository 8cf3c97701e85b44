//! Owners partition records when several clients share one dataset.

use std::{collections::HashSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, record::TransactionRecord};

/// Identifies the client (account holder) that a record belongs to.
///
/// Client IDs are phone numbers including the country code, e.g.
/// `554899999999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

impl OwnerId {
    /// Create an owner ID from its integer value.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(OwnerId)
            .map_err(|_| Error::InvalidClientId(s.to_owned()))
    }
}

/// An entry in the client picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientOption {
    /// The client's ID.
    pub id: OwnerId,
    /// The client's phone number formatted for display.
    pub label: String,
}

/// Format an owner ID as a phone number, e.g. `554899999999` becomes
/// `+55 48 99999-999`.
///
/// IDs that are too short to fill every part of the number produce empty
/// parts rather than an error.
pub fn client_label(id: OwnerId) -> String {
    let digits = id.to_string();
    let part = |start: usize, end: usize| {
        let end = end.min(digits.len());
        digits.get(start.min(end)..end).unwrap_or("")
    };

    format!(
        "+55 {} {}-{}",
        part(2, 4),
        part(4, 9),
        part(9, digits.len())
    )
}

/// The distinct owners in `records` in the order they first appear.
///
/// Records without an owner are skipped.
pub fn unique_clients(records: &[TransactionRecord]) -> Vec<ClientOption> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter_map(|record| record.owner_id())
        .filter(|id| seen.insert(*id))
        .map(|id| ClientOption {
            id,
            label: client_label(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{expense, finalise_all, income},
    };

    use super::{OwnerId, client_label, unique_clients};

    #[test]
    fn formats_phone_number_label() {
        assert_eq!(client_label(OwnerId::new(554899999999)), "+55 48 99999-999");
        assert_eq!(client_label(OwnerId::new(554888888888)), "+55 48 88888-888");
    }

    #[test]
    fn short_ids_produce_empty_parts() {
        assert_eq!(client_label(OwnerId::new(55)), "+55  -");
        assert_eq!(client_label(OwnerId::new(554812)), "+55 48 12-");
    }

    #[test]
    fn unique_clients_keeps_first_seen_order() {
        let first = OwnerId::new(554899999999);
        let second = OwnerId::new(554888888888);
        let records = finalise_all([
            income(100.0, date!(2024 - 01 - 15), "Website").owner(first),
            expense(50.0, date!(2024 - 01 - 16), "Rent").owner(second),
            expense(20.0, date!(2024 - 01 - 17), "Rent").owner(first),
            expense(20.0, date!(2024 - 01 - 17), "Rent"),
        ]);

        let clients = unique_clients(&records);

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, first);
        assert_eq!(clients[1].id, second);
        assert_eq!(clients[1].label, "+55 48 88888-888");
    }

    #[test]
    fn parses_owner_id_from_query_value() {
        assert_eq!("554899999999".parse::<OwnerId>(), Ok(OwnerId::new(554899999999)));
        assert_eq!(
            "abc".parse::<OwnerId>(),
            Err(Error::InvalidClientId("abc".to_owned()))
        );
    }
}
