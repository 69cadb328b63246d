#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset configuration types and the normalized ridership row format.
//!
//! A [`DatasetChoice`] selects one of the City of Chicago CTA ridership
//! datasets and maps to a fixed [`LoaderConfig`]. Fetched pages accumulate
//! into a [`RawTable`]; the daily-totals dataset is then normalized into
//! [`DailyRidership`] rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Default maximum number of records a single load accumulates.
pub const DEFAULT_MAX_RECORDS: u64 = 10_000;

/// Records requested per page from the Socrata API.
pub const DEFAULT_PAGE_SIZE: u64 = 1_000;

/// Socrata endpoint for CTA system-wide daily boarding totals.
pub const DAILY_TOTAL_API_URL: &str = "https://data.cityofchicago.org/resource/6iiy-9s97.json";

/// Socrata endpoint for CTA `L` station daily entries.
pub const STATIONS_API_URL: &str = "https://data.cityofchicago.org/resource/5neh-572f.json";

/// A single JSON object as returned by the API, keyed by column name.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Which ridership dataset to load.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetChoice {
    /// System-wide daily totals (bus, rail, total rides per service date).
    DailyTotal,
    /// Per-station daily rail entries.
    Stations,
}

impl DatasetChoice {
    /// Socrata endpoint for this dataset.
    #[must_use]
    pub const fn api_url(self) -> &'static str {
        match self {
            Self::DailyTotal => DAILY_TOTAL_API_URL,
            Self::Stations => STATIONS_API_URL,
        }
    }

    /// Column the API results are ordered by (newest first).
    #[must_use]
    pub const fn date_column(self) -> &'static str {
        match self {
            Self::DailyTotal => "service_date",
            Self::Stations => "date",
        }
    }
}

/// Immutable fetch parameters for one dataset.
///
/// Built from a [`DatasetChoice`]. An unrecognized choice name produces the
/// empty configuration, for which fetching is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    choice: Option<DatasetChoice>,
    api_url: String,
    page_size: u64,
    max_records: u64,
    sort_order: String,
}

impl LoaderConfig {
    /// Configuration for a known dataset.
    #[must_use]
    pub fn for_choice(choice: DatasetChoice, max_records: u64) -> Self {
        Self {
            choice: Some(choice),
            api_url: choice.api_url().to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_records,
            sort_order: format!("&$order={} DESC", choice.date_column()),
        }
    }

    /// Configuration for a dataset named by string (e.g. `"daily_total"`).
    ///
    /// Unknown names yield [`LoaderConfig::empty`].
    #[must_use]
    pub fn from_choice_name(name: &str, max_records: u64) -> Self {
        name.parse::<DatasetChoice>().map_or_else(
            |_| Self::empty(max_records),
            |choice| Self::for_choice(choice, max_records),
        )
    }

    /// Configuration with no endpoint.
    #[must_use]
    pub const fn empty(max_records: u64) -> Self {
        Self {
            choice: None,
            api_url: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            max_records,
            sort_order: String::new(),
        }
    }

    /// Replaces the endpoint URL, e.g. to point at a mirror.
    #[must_use]
    pub fn with_endpoint(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    /// Replaces the record cap.
    #[must_use]
    pub const fn with_max_records(mut self, max_records: u64) -> Self {
        self.max_records = max_records;
        self
    }

    /// Replaces the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn choice(&self) -> Option<DatasetChoice> {
        self.choice
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub const fn max_records(&self) -> u64 {
        self.max_records
    }

    /// Raw query text appended after the pagination parameters.
    #[must_use]
    pub fn sort_order(&self) -> &str {
        &self.sort_order
    }

    /// Whether this configuration has no endpoint to fetch from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_url.is_empty()
    }
}

/// Records accumulated across pages, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    records: Vec<RawRecord>,
}

impl RawTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a page of records.
    pub fn extend(&mut self, page: impl IntoIterator<Item = RawRecord>) {
        self.records.extend(page);
    }

    #[must_use]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of all record keys, in order of first appearance.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for record in &self.records {
            for key in record.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
        columns
    }

    /// Whether any record carries the given column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.records.iter().any(|r| r.contains_key(column))
    }
}

impl From<Vec<RawRecord>> for RawTable {
    fn from(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

/// One normalized row of the daily-totals dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRidership {
    /// Service day the boardings were counted for.
    pub service_date: NaiveDate,
    /// `W` (weekday), `A` (Saturday) or `U` (Sunday/holiday).
    pub day_type: String,
    /// Bus boardings.
    pub bus: i64,
    /// Rail boardings.
    pub rail_boardings: i64,
    /// Bus plus rail.
    pub total_rides: i64,
    /// Four-digit year of `service_date`.
    pub year_only: String,
    /// Reporting period, `YYYY-MM`.
    pub year_month: String,
}

impl DailyRidership {
    /// Output columns, in order.
    pub const COLUMNS: [&'static str; 7] = [
        "service_date",
        "day_type",
        "bus",
        "rail_boardings",
        "total_rides",
        "year_only",
        "year_month",
    ];
}

/// A loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RidershipData {
    /// Normalized daily totals.
    DailyTotals(Vec<DailyRidership>),
    /// Station entries, as returned by the API.
    Stations(RawTable),
}

impl RidershipData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::DailyTotals(rows) => rows.len(),
            Self::Stations(table) => table.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which dataset these rows came from.
    #[must_use]
    pub const fn choice(&self) -> DatasetChoice {
        match self {
            Self::DailyTotals(_) => DatasetChoice::DailyTotal,
            Self::Stations(_) => DatasetChoice::Stations,
        }
    }
}
