//! Data preparation for deal records.

mod csv_source;

pub use csv_source::{parse_deals, DealCsvSource, LoadSummary, REQUIRED_COLUMNS};

use deal_core::error::DataError;
use deal_core::types::DealRecord;

/// Load and clean deal records from a CSV file.
pub fn load_csv(path: &str) -> Result<(Vec<DealRecord>, LoadSummary), DataError> {
    let source = DealCsvSource::new(path)?;
    source.load()
}
