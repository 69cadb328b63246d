//! City of Chicago ridership loader.

use cta_ridership_models::{DEFAULT_MAX_RECORDS, DatasetChoice, LoaderConfig, RidershipData};

use crate::socrata::{HttpPageClient, PageClient, fetch_socrata};
use crate::transform::transform_daily_totals;
use crate::{CachedLoader, DatasetLoader, RidershipError};

/// Loads one of the CTA ridership datasets.
///
/// Daily totals are normalized into typed rows; station entries are passed
/// through as fetched.
#[derive(Debug, Clone)]
pub struct RidershipLoader<C: PageClient = HttpPageClient> {
    config: LoaderConfig,
    client: C,
}

impl RidershipLoader {
    /// Loader for `choice` over HTTP.
    #[must_use]
    pub fn new(choice: DatasetChoice, max_records: u64) -> Self {
        Self::with_config(LoaderConfig::for_choice(choice, max_records))
    }

    /// Loader for a dataset named by string. Unknown names produce a loader
    /// that never fetches.
    #[must_use]
    pub fn from_choice_name(name: &str, max_records: u64) -> Self {
        Self::with_config(LoaderConfig::from_choice_name(name, max_records))
    }

    /// Loader for an explicit configuration over HTTP.
    #[must_use]
    pub fn with_config(config: LoaderConfig) -> Self {
        Self::with_client(config, HttpPageClient::new())
    }
}

impl Default for RidershipLoader {
    fn default() -> Self {
        Self::new(DatasetChoice::DailyTotal, DEFAULT_MAX_RECORDS)
    }
}

impl<C: PageClient> RidershipLoader<C> {
    /// Loader using a custom transport.
    #[must_use]
    pub const fn with_client(config: LoaderConfig, client: C) -> Self {
        Self { config, client }
    }

    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Wraps this loader so the dataset is only fetched once.
    #[must_use]
    pub const fn cached(self) -> CachedLoader<Self> {
        CachedLoader::new(self)
    }
}

impl<C: PageClient> DatasetLoader for RidershipLoader<C> {
    type Output = RidershipData;

    fn load_dataset(&self) -> Result<Option<RidershipData>, RidershipError> {
        let Some(choice) = self.config.choice() else {
            log::warn!("No dataset selected, nothing to load");
            return Ok(None);
        };

        let table = fetch_socrata(&self.config, &self.client)?;

        match choice {
            DatasetChoice::DailyTotal => {
                Ok(transform_daily_totals(&table)?.map(RidershipData::DailyTotals))
            }
            DatasetChoice::Stations => {
                if table.is_empty() {
                    log::warn!("No records returned");
                    return Ok(None);
                }
                Ok(Some(RidershipData::Stations(table)))
            }
        }
    }
}
