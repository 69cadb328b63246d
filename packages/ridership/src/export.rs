//! CSV and JSON output for loaded datasets.

use std::io::Write;

use cta_ridership_models::{DailyRidership, RawTable, RidershipData};
use serde_json::Value;

use crate::RidershipError;

/// Writes `data` as CSV with a header row.
///
/// Daily totals use the normalized column order. Station rows use the union
/// of the fetched columns; missing and `null` cells are left empty.
///
/// # Errors
///
/// Returns [`RidershipError`] if serialization or the underlying write fails.
pub fn write_csv(data: &RidershipData, writer: impl Write) -> Result<(), RidershipError> {
    let mut csv = csv::Writer::from_writer(writer);

    match data {
        RidershipData::DailyTotals(rows) => {
            if rows.is_empty() {
                csv.write_record(DailyRidership::COLUMNS)?;
            }
            for row in rows {
                csv.serialize(row)?;
            }
        }
        RidershipData::Stations(table) => write_raw_csv(table, &mut csv)?,
    }

    csv.flush()?;
    Ok(())
}

fn write_raw_csv<W: Write>(table: &RawTable, csv: &mut csv::Writer<W>) -> Result<(), RidershipError> {
    let columns = table.columns();
    csv.write_record(&columns)?;

    for record in table.records() {
        csv.write_record(
            columns
                .iter()
                .map(|column| record.get(*column).map_or_else(String::new, cell_text)),
        )?;
    }

    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Writes `data` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`RidershipError`] if serialization or the underlying write fails.
pub fn write_json(data: &RidershipData, mut writer: impl Write) -> Result<(), RidershipError> {
    serde_json::to_writer_pretty(&mut writer, data)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
