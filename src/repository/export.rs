//! Records exported from the remote datastore as JSON or CSV.
//!
//! Exported rows use the datastore's column names and looser types (UUID
//! IDs, amounts that may be strings), so every row is coerced into a
//! [TransactionRecord] here. Rows that cannot be read or coerced are logged
//! and skipped one at a time so they never reach the totals.

use std::{fs, path::Path};

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    Error,
    ai_alert::AiAlert,
    owner::OwnerId,
    record::{RecordId, RecordKind, TransactionRecord},
    repository::RecordRepository,
    timezone::get_local_offset,
};

const POSTED_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const CREATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// An amount column that may hold a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// A row as it appears in the datastore export.
///
/// Every column is optional so that a null or missing value only rejects its
/// own row in [ExportedRecord::into_record].
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ExportedRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "valor", default)]
    amount: Option<RawAmount>,
    #[serde(rename = "de", default)]
    from: Option<String>,
    #[serde(rename = "para", default)]
    to: Option<String>,
    #[serde(rename = "tipo", default)]
    kind: Option<String>,
    #[serde(rename = "categoria", default)]
    category: Option<String>,
    #[serde(rename = "data_comprovante", default)]
    posted_date: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl ExportedRecord {
    fn into_record(
        self,
        owner_id: OwnerId,
        local_offset: UtcOffset,
    ) -> Result<TransactionRecord, Error> {
        let raw_id = self.id.clone().unwrap_or_default();
        let malformed = |reason: String| Error::MalformedRecord {
            id: raw_id.clone(),
            reason,
        };

        let id = parse_record_id(&raw_id).ok_or_else(|| {
            malformed("the ID does not start with eight hexadecimal digits".to_owned())
        })?;

        let amount = match &self.amount {
            Some(RawAmount::Number(amount)) => *amount,
            Some(RawAmount::Text(text)) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| malformed(format!("\"{text}\" is not a number")))?,
            None => return Err(malformed("the amount is missing".to_owned())),
        };

        let kind = match self.kind.as_deref().map(str::trim) {
            Some("entrada") => RecordKind::Income,
            Some("saida") => RecordKind::Expense,
            Some(other) => return Err(malformed(format!("unknown record type \"{other}\""))),
            None => return Err(malformed("the record type is missing".to_owned())),
        };

        let posted_date = match self.posted_date.as_deref().map(str::trim) {
            Some(text) => Date::parse(text, POSTED_DATE_FORMAT).map_err(|_| {
                malformed(format!(
                    "\"{text}\" is not a valid date, expected YYYY-MM-DD"
                ))
            })?,
            None => return Err(malformed("the posted date is missing".to_owned())),
        };

        let recorded_at = self
            .created_at
            .as_deref()
            .and_then(|text| parse_created_at(text, local_offset))
            .unwrap_or_else(|| posted_date.midnight());

        TransactionRecord::build(
            id,
            amount,
            kind,
            self.category.as_deref().unwrap_or_default(),
            posted_date,
        )
        .owner(owner_id)
        .counterparties(
            self.from.as_deref().unwrap_or_default(),
            self.to.as_deref().unwrap_or_default(),
        )
        .recorded_at(recorded_at)
        .finalise()
        .map_err(|error| malformed(error.to_string()))
    }
}

/// The first eight hexadecimal digits of a UUID as an integer.
fn parse_record_id(uuid: &str) -> Option<RecordId> {
    let prefix = uuid.get(..8)?;
    RecordId::from_str_radix(prefix, 16).ok()
}

/// Parse a creation timestamp as local time.
///
/// RFC 3339 timestamps are converted to `local_offset`. Timestamps without an
/// offset are assumed to already be local.
fn parse_created_at(text: &str, local_offset: UtcOffset) -> Option<PrimitiveDateTime> {
    let text = text.trim();

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|timestamp| {
            let local = timestamp.to_offset(local_offset);
            PrimitiveDateTime::new(local.date(), local.time())
        })
        .or_else(|_| PrimitiveDateTime::parse(text, CREATED_AT_FORMAT))
        .ok()
}

/// Records loaded once from an exported file.
///
/// The export is already scoped to a single account holder, so every record is
/// assigned the configured owner.
#[derive(Debug, Clone, Default)]
pub struct ExportRepository {
    records: Vec<TransactionRecord>,
}

impl ExportRepository {
    /// Load records from a `.json` (array of rows) or `.csv` export.
    ///
    /// Creation timestamps with a UTC offset are converted to `canonical_timezone`,
    /// e.g. "America/Sao_Paulo".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not recognised,
    /// [Error::DataSourceRead] if the file cannot be read, or
    /// [Error::DataSourceParse] if it is not a JSON array or its CSV header
    /// cannot be read. Individual rows that are malformed are skipped.
    pub fn from_path(
        path: &Path,
        owner_id: OwnerId,
        canonical_timezone: &str,
    ) -> Result<Self, Error> {
        let local_offset = get_local_offset(canonical_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", canonical_timezone);
            Error::InvalidTimezoneError(canonical_timezone.to_owned())
        })?;

        let display_path = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|error| Error::DataSourceRead {
            path: display_path.clone(),
            reason: error.to_string(),
        })?;

        let is_csv = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

        let repository = if is_csv {
            Self::from_csv_str(&text, owner_id, local_offset)
        } else {
            Self::from_json_str(&text, owner_id, local_offset)
        };

        repository
            .map_err(|reason| Error::DataSourceParse {
                path: display_path.clone(),
                reason,
            })
            .inspect(|repository| {
                tracing::info!(
                    "Loaded {} records from {display_path}",
                    repository.records.len()
                )
            })
    }

    fn from_json_str(
        text: &str,
        owner_id: OwnerId,
        local_offset: UtcOffset,
    ) -> Result<Self, String> {
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(text).map_err(|error| error.to_string())?;

        let rows = rows.into_iter().map(|row| {
            let id = row
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned();

            serde_json::from_value::<ExportedRecord>(row).map_err(|error| Error::MalformedRecord {
                id,
                reason: error.to_string(),
            })
        });

        Ok(Self::from_rows(rows, owner_id, local_offset))
    }

    fn from_csv_str(
        text: &str,
        owner_id: OwnerId,
        local_offset: UtcOffset,
    ) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        reader.headers().map_err(|error| error.to_string())?;

        let rows = reader.deserialize::<ExportedRecord>().map(|row| {
            row.map_err(|error| Error::MalformedRecord {
                id: String::new(),
                reason: error.to_string(),
            })
        });

        Ok(Self::from_rows(rows, owner_id, local_offset))
    }

    fn from_rows(
        rows: impl IntoIterator<Item = Result<ExportedRecord, Error>>,
        owner_id: OwnerId,
        local_offset: UtcOffset,
    ) -> Self {
        let mut records: Vec<TransactionRecord> = rows
            .into_iter()
            .filter_map(|row| {
                row.and_then(|row| row.into_record(owner_id, local_offset))
                    .inspect_err(|error| tracing::warn!("Skipping exported row: {error}"))
                    .ok()
            })
            .collect();

        // Newest first.
        records.sort_by(|a, b| b.posted_date().cmp(&a.posted_date()));

        Self { records }
    }
}

impl RecordRepository for ExportRepository {
    fn list(&self, owner_id: Option<OwnerId>) -> Result<Vec<TransactionRecord>, Error> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    /// Exports carry no alerts.
    fn list_alerts(&self, _owner_id: Option<OwnerId>) -> Result<Vec<AiAlert>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use time::{
        UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        Error,
        owner::OwnerId,
        record::RecordKind,
        repository::RecordRepository,
    };

    use super::{ExportRepository, parse_created_at, parse_record_id};

    const OWNER: OwnerId = OwnerId::new(554899999999);

    const EXPORT_JSON: &str = r#"[
        {
            "id": "a1b2c3d4-0000-4000-8000-000000000001",
            "user_id": "f00dbabe-0000-4000-8000-000000000000",
            "valor": "1500.50",
            "de": "Main Account",
            "para": "Landlord",
            "tipo": "saida",
            "categoria": "Rent",
            "data_comprovante": "2024-01-05",
            "created_at": "2024-01-05T08:00:00+00:00"
        },
        {
            "id": "0000000a-0000-4000-8000-000000000002",
            "valor": 5500,
            "de": "Client ABC",
            "para": "Main Account",
            "tipo": "entrada",
            "categoria": "Website",
            "data_comprovante": "2024-01-15",
            "created_at": "2024-01-15T10:00:00"
        },
        {
            "id": "0000000b-0000-4000-8000-000000000003",
            "valor": "abc",
            "tipo": "saida",
            "categoria": "Rent",
            "data_comprovante": "2024-01-06"
        },
        {
            "id": "0000000c-0000-4000-8000-000000000004",
            "valor": 120,
            "tipo": "saida",
            "categoria": "Fast Food",
            "data_comprovante": "14/01/2024"
        },
        {
            "id": "0000000d-0000-4000-8000-000000000005",
            "valor": -20,
            "tipo": "saida",
            "categoria": "Fast Food",
            "data_comprovante": "2024-01-14"
        }
    ]"#;

    #[test]
    fn coerces_json_rows_and_skips_malformed_ones() {
        let repository = ExportRepository::from_json_str(EXPORT_JSON, OWNER, UtcOffset::UTC).unwrap();
        let records = repository.list(None).unwrap();

        assert_eq!(records.len(), 2);

        // Sorted by posted date, newest first.
        let income = &records[0];
        assert_eq!(income.id(), 10);
        assert_eq!(income.kind(), RecordKind::Income);
        assert_eq!(income.amount(), 5500.0);
        assert_eq!(income.recorded_at(), datetime!(2024-01-15 10:00));

        let rent = &records[1];
        assert_eq!(rent.id(), 0xa1b2c3d4);
        assert_eq!(rent.owner_id(), Some(OWNER));
        assert_eq!(rent.amount(), 1500.5);
        assert_eq!(rent.posted_date(), date!(2024 - 01 - 05));
        assert_eq!(rent.counterparty_to(), "Landlord");
    }

    #[test]
    fn reads_csv_rows() {
        let csv = "id,valor,de,para,tipo,categoria,data_comprovante,created_at\n\
            0000000a-0000,800,Main Account,Supermarket,saida,Groceries,2024-01-12,\n\
            0000000b-0000,4500,Client DEF,Main Account,entrada,Website,2024-02-05,2024-02-05T11:00:00\n";

        let repository = ExportRepository::from_csv_str(csv, OWNER, UtcOffset::UTC).unwrap();
        let records = repository.list(Some(OWNER)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].posted_date(), date!(2024 - 02 - 05));
        assert_eq!(records[1].category(), "Groceries");
        assert_eq!(records[1].recorded_at(), datetime!(2024-01-12 00:00));
    }

    #[test]
    fn other_owners_see_nothing() {
        let repository = ExportRepository::from_json_str(EXPORT_JSON, OWNER, UtcOffset::UTC).unwrap();

        assert!(repository.list(Some(OwnerId::new(1))).unwrap().is_empty());
        assert!(repository.list_alerts(None).unwrap().is_empty());
    }

    #[test]
    fn rejects_json_that_is_not_an_array() {
        assert!(ExportRepository::from_json_str("{}", OWNER, UtcOffset::UTC).is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = ExportRepository::from_path(Path::new("does-not-exist.json"), OWNER, "Etc/UTC");

        assert!(matches!(result, Err(Error::DataSourceRead { .. })));
    }

    #[test]
    fn record_id_uses_first_eight_hex_digits() {
        assert_eq!(parse_record_id("000000ff-1234"), Some(255));
        assert_eq!(parse_record_id("zzzzzzzz-1234"), None);
        assert_eq!(parse_record_id("abc"), None);
    }

    #[test]
    fn created_at_accepts_rfc3339_and_naive_timestamps() {
        assert_eq!(
            parse_created_at("2024-02-28T10:00:00Z", UtcOffset::UTC),
            Some(datetime!(2024-02-28 10:00))
        );
        assert_eq!(
            parse_created_at("2024-02-28T10:00:00", UtcOffset::UTC),
            Some(datetime!(2024-02-28 10:00))
        );
        assert_eq!(parse_created_at("yesterday", UtcOffset::UTC), None);
    }

    #[test]
    fn created_at_with_offset_is_converted_to_local_time() {
        assert_eq!(
            parse_created_at("2024-02-28T01:30:00Z", offset!(-3)),
            Some(datetime!(2024-02-27 22:30))
        );
        assert_eq!(
            parse_created_at("2024-02-28T10:00:00+02:00", offset!(-3)),
            Some(datetime!(2024-02-28 05:00))
        );
        // Timestamps without an offset are already local.
        assert_eq!(
            parse_created_at("2024-02-28T10:00:00", offset!(-3)),
            Some(datetime!(2024-02-28 10:00))
        );
    }

    #[test]
    fn null_columns_only_reject_their_own_row() {
        let json = r#"[
            {
                "id": "00000001-0000-4000-8000-000000000001",
                "valor": null,
                "tipo": "saida",
                "categoria": "Rent",
                "data_comprovante": "2024-01-05"
            },
            {
                "id": "00000002-0000-4000-8000-000000000002",
                "valor": 90,
                "tipo": "saida",
                "categoria": "Rent",
                "data_comprovante": null
            },
            {
                "id": "00000003-0000-4000-8000-000000000003",
                "valor": 200,
                "de": null,
                "para": "Main Account",
                "tipo": "entrada",
                "categoria": "Design",
                "data_comprovante": "2024-01-07"
            },
            {
                "id": "00000004-0000-4000-8000-000000000004",
                "valor": true,
                "tipo": "saida",
                "categoria": "Rent",
                "data_comprovante": "2024-01-08"
            }
        ]"#;

        let repository = ExportRepository::from_json_str(json, OWNER, UtcOffset::UTC).unwrap();
        let records = repository.list(None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 3);
        assert_eq!(records[0].amount(), 200.0);
        assert_eq!(records[0].counterparty_from(), "");
    }

    #[test]
    fn csv_row_with_wrong_column_count_is_skipped() {
        let csv = "id,valor,de,para,tipo,categoria,data_comprovante,created_at\n\
            0000000a-0000,800,Main Account,Supermarket,saida\n\
            0000000b-0000,,Client DEF,Main Account,entrada,Website,2024-02-05,\n\
            0000000c-0000,4500,Client DEF,Main Account,entrada,Website,2024-02-06,\n";

        let repository = ExportRepository::from_csv_str(csv, OWNER, UtcOffset::UTC).unwrap();
        let records = repository.list(None).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 12);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let result = ExportRepository::from_path(Path::new("records.json"), OWNER, "Not/AZone");

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidTimezoneError("Not/AZone".to_owned())
        );
    }
}
