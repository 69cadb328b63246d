//! Daily-totals normalization.
//!
//! Coerces the raw Socrata columns to typed values and derives the
//! reporting-period columns (`year_only`, `year_month`).

use chrono::{Datelike, NaiveDate};
use cta_ridership_models::{DailyRidership, RawRecord, RawTable};
use serde_json::Value;

use crate::RidershipError;
use crate::parsing::{value_as_date, value_as_integer, value_as_text};

/// Columns that must be present before any coercion is attempted.
pub const REQUIRED_COLUMNS: [&str; 2] = ["service_date", "rail_boardings"];

/// Normalizes raw daily-total records.
///
/// Returns `Ok(None)` (and logs why) when the table is empty or lacks one of
/// [`REQUIRED_COLUMNS`].
///
/// # Errors
///
/// Returns [`RidershipError::Coercion`] if a value in a typed column is
/// missing or cannot be converted.
pub fn transform_daily_totals(
    table: &RawTable,
) -> Result<Option<Vec<DailyRidership>>, RidershipError> {
    if table.is_empty() {
        log::warn!("No records returned");
        return Ok(None);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|c| !table.has_column(c))
        .collect();
    if !missing.is_empty() {
        log::warn!(
            "Records are missing required column(s) {}, skipping normalization",
            missing.join(", ")
        );
        return Ok(None);
    }

    let rows = table
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| normalize_record(row, record))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Normalized {} daily ridership rows", rows.len());

    Ok(Some(rows))
}

fn normalize_record(row: usize, record: &RawRecord) -> Result<DailyRidership, RidershipError> {
    let service_date = coerce(record, row, "service_date", "date", value_as_date)?;
    let day_type = coerce(record, row, "day_type", "text", value_as_text)?;
    let bus = coerce(record, row, "bus", "integer", value_as_integer)?;
    let rail_boardings = coerce(record, row, "rail_boardings", "integer", value_as_integer)?;
    let total_rides = coerce(record, row, "total_rides", "integer", value_as_integer)?;

    let year_only = year_only(service_date);
    let month_only = month_only(service_date);
    let year_month = year_month(&year_only, &month_only);

    Ok(DailyRidership {
        service_date,
        day_type,
        bus,
        rail_boardings,
        total_rides,
        year_only,
        year_month,
    })
}

fn coerce<T>(
    record: &RawRecord,
    row: usize,
    column: &str,
    expected: &'static str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<T, RidershipError> {
    let value = record.get(column).unwrap_or(&Value::Null);
    convert(value).ok_or_else(|| RidershipError::Coercion {
        row,
        column: column.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Four-digit year of `date`.
#[must_use]
pub fn year_only(date: NaiveDate) -> String {
    format!("{:04}", date.year())
}

/// Two-digit month of `date`.
#[must_use]
pub fn month_only(date: NaiveDate) -> String {
    pad_month(&date.month().to_string())
}

/// Prefixes a single-character month with `0`; longer strings pass through.
#[must_use]
pub fn pad_month(month: &str) -> String {
    if month.chars().count() < 2 {
        format!("0{month}")
    } else {
        month.to_string()
    }
}

/// Joins year and month into the `YYYY-MM` reporting key.
#[must_use]
pub fn year_month(year_only: &str, month_only: &str) -> String {
    format!("{year_only}-{month_only}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn table(records: &[Value]) -> RawTable {
        RawTable::from(
            records
                .iter()
                .map(|r| r.as_object().cloned().unwrap())
                .collect::<Vec<_>>(),
        )
    }

    fn daily(service_date: &str) -> Value {
        json!({
            "service_date": service_date,
            "day_type": "W",
            "bus": "301000",
            "rail_boardings": "412000",
            "total_rides": "713000",
        })
    }

    fn is_year_month(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit)
    }

    #[test]
    fn normalizes_daily_totals() {
        let rows = transform_daily_totals(&table(&[daily("2023-11-02T00:00:00.000")]))
            .unwrap()
            .unwrap();

        assert_eq!(
            rows,
            vec![DailyRidership {
                service_date: NaiveDate::from_ymd_opt(2023, 11, 2).unwrap(),
                day_type: "W".to_string(),
                bus: 301_000,
                rail_boardings: 412_000,
                total_rides: 713_000,
                year_only: "2023".to_string(),
                year_month: "2023-11".to_string(),
            }]
        );
    }

    #[test]
    fn pads_january() {
        let rows = transform_daily_totals(&table(&[daily("2024-01-31T00:00:00.000")]))
            .unwrap()
            .unwrap();
        assert_eq!(rows[0].year_month, "2024-01");
        assert_eq!(rows[0].year_only, "2024");
    }

    #[test]
    fn every_row_has_year_month_key() {
        let records: Vec<Value> = (1..=12)
            .map(|m| daily(&format!("2019-{m:02}-15T00:00:00.000")))
            .collect();
        let rows = transform_daily_totals(&table(&records)).unwrap().unwrap();

        assert_eq!(rows.len(), 12);
        for row in &rows {
            assert!(is_year_month(&row.year_month), "{}", row.year_month);
        }
        assert_eq!(rows[8].year_month, "2019-09");
        assert_eq!(rows[9].year_month, "2019-10");
    }

    #[test]
    fn serialized_rows_have_no_month_only() {
        let rows = transform_daily_totals(&table(&[daily("2024-03-01")]))
            .unwrap()
            .unwrap();
        let value = serde_json::to_value(&rows[0]).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert!(!keys.contains(&"month_only"));
        assert!(keys.contains(&"year_month"));
        assert_eq!(keys.len(), DailyRidership::COLUMNS.len());
    }

    #[test]
    fn accepts_numeric_json() {
        let record = json!({
            "service_date": "2020-06-01T00:00:00.000",
            "day_type": "U",
            "bus": 1,
            "rail_boardings": 2,
            "total_rides": 3,
        });
        let rows = transform_daily_totals(&table(&[record])).unwrap().unwrap();
        assert_eq!(rows[0].total_rides, 3);
    }

    #[test]
    fn empty_table_yields_nothing() {
        assert!(transform_daily_totals(&RawTable::new()).unwrap().is_none());
    }

    #[test]
    fn missing_rail_boardings_yields_nothing() {
        let record = json!({
            "service_date": "2024-01-01T00:00:00.000",
            "day_type": "W",
            "bus": "1",
            "total_rides": "1",
        });
        assert!(transform_daily_totals(&table(&[record])).unwrap().is_none());
    }

    #[test]
    fn missing_service_date_yields_nothing() {
        let record = json!({"rail_boardings": "5", "bus": "1"});
        assert!(transform_daily_totals(&table(&[record])).unwrap().is_none());
    }

    #[test]
    fn station_records_yield_nothing() {
        let record = json!({
            "station_id": "40380",
            "stationname": "Clark/Lake",
            "date": "2024-01-01T00:00:00.000",
            "daytype": "U",
            "rides": "5000",
        });
        assert!(transform_daily_totals(&table(&[record])).unwrap().is_none());
    }

    #[test]
    fn bad_integer_is_a_coercion_error() {
        let mut record = daily("2024-01-01T00:00:00.000");
        record["bus"] = json!("lots");
        let second = daily("2024-01-02T00:00:00.000");

        let err = transform_daily_totals(&table(&[second, record])).unwrap_err();
        match err {
            RidershipError::Coercion {
                row,
                column,
                expected,
                ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(column, "bus");
                assert_eq!(expected, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_value_is_a_coercion_error() {
        let mut record = daily("2024-01-01T00:00:00.000");
        record.as_object_mut().unwrap().remove("day_type");

        let err = transform_daily_totals(&table(&[record])).unwrap_err();
        assert!(err.to_string().contains("day_type"));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn month_padding_rule() {
        assert_eq!(pad_month("1"), "01");
        assert_eq!(pad_month("9"), "09");
        assert_eq!(pad_month("11"), "11");
        assert_eq!(pad_month("012"), "012");
    }

    #[test]
    fn year_month_is_plain_join() {
        assert_eq!(year_month("2024", "01"), "2024-01");
        let date = NaiveDate::from_ymd_opt(2022, 11, 30).unwrap();
        assert_eq!(year_month(&year_only(date), &month_only(date)), "2022-11");
    }
}
