//! CSV data source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use deal_core::error::DataError;
use deal_core::types::DealRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Columns every deal export must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "deal_id",
    "deal_stage",
    "outcome",
    "created_date",
    "closed_date",
    "deal_amount",
];

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvDealRow {
    deal_id: String,
    deal_stage: String,
    #[serde(default)]
    outcome: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    closed_date: Option<String>,
    #[serde(default, deserialize_with = "empty_decimal_as_none")]
    deal_amount: Option<Decimal>,
}

/// Counters collected while cleaning a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Rows read from the file
    pub rows: usize,
    /// Rows whose created or closed date was missing or unparseable
    pub undefined_cycles: usize,
    /// Rows whose close date precedes the creation date
    pub inverted_cycles: usize,
    /// Rows with a blank deal amount
    pub missing_amounts: usize,
    /// Rows with a "won" outcome
    pub won: usize,
}

/// CSV data source for historical deals.
pub struct DealCsvSource {
    path: String,
}

impl DealCsvSource {
    /// Create a new CSV data source.
    pub fn new(path: &str) -> Result<Self, DataError> {
        if !Path::new(path).exists() {
            return Err(DataError::FileNotFound(path.to_string()));
        }
        Ok(Self {
            path: path.to_string(),
        })
    }

    /// Load and clean every deal in the file.
    pub fn load(&self) -> Result<(Vec<DealRecord>, LoadSummary), DataError> {
        let file = std::fs::File::open(&self.path)?;
        let (deals, summary) = parse_deals(file)?;
        info!(
            path = %self.path,
            rows = summary.rows,
            undefined_cycles = summary.undefined_cycles,
            missing_amounts = summary.missing_amounts,
            "Loaded deal records"
        );
        Ok((deals, summary))
    }
}

/// Parse and clean deal records from any CSV reader.
///
/// The header is checked against [`REQUIRED_COLUMNS`] before any row is read.
pub fn parse_deals<R: Read>(reader: R) -> Result<(Vec<DealRecord>, LoadSummary), DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?
        .clone();
    validate_headers(&headers)?;

    let mut deals = Vec::new();
    let mut summary = LoadSummary::default();

    for (index, result) in reader.deserialize::<CsvDealRow>().enumerate() {
        let row_number = index + 1;
        let row = result.map_err(|e| DataError::Parse {
            row: row_number,
            message: e.to_string(),
        })?;

        let created = parse_date_field(row.created_date.as_deref(), row_number, "created_date");
        let closed = parse_date_field(row.closed_date.as_deref(), row_number, "closed_date");

        let deal = DealRecord::from_raw(
            row.deal_id,
            row.deal_stage,
            &row.outcome,
            created,
            closed,
            row.deal_amount,
        );

        summary.rows += 1;
        match deal.sales_cycle_days {
            None => summary.undefined_cycles += 1,
            Some(days) if days < 0 => {
                debug!(deal_id = %deal.deal_id, days, "Close date precedes creation date");
                summary.inverted_cycles += 1;
            }
            Some(_) => {}
        }
        if deal.deal_amount.is_none() {
            summary.missing_amounts += 1;
        }
        if deal.is_won {
            summary.won += 1;
        }

        deals.push(deal);
    }

    if deals.is_empty() {
        return Err(DataError::NoRecords);
    }

    if summary.undefined_cycles > 0 {
        warn!(
            count = summary.undefined_cycles,
            "Deals with missing or unparseable dates have no sales cycle"
        );
    }

    Ok((deals, summary))
}

fn validate_headers(headers: &csv::StringRecord) -> Result<(), DataError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns(missing))
    }
}

fn parse_date_field(value: Option<&str>, row: usize, column: &str) -> Option<NaiveDateTime> {
    let value = value?;
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        warn!(row, column, value, "Could not parse date");
    }
    parsed
}

/// Parse various date and timestamp formats.
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_decimal_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
