#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CTA ridership loading: paginated Socrata fetching and table
//! normalization.
//!
//! A [`DatasetLoader`] knows how to produce one dataset. [`CachedLoader`]
//! wraps a loader so the dataset is fetched at most once, and
//! [`loader::RidershipLoader`] is the implementation for the City of
//! Chicago ridership datasets.

pub mod export;
pub mod loader;
pub mod parsing;
pub mod socrata;
pub mod transform;

use std::cell::OnceCell;

/// Errors that can occur while loading or exporting ridership data.
#[derive(Debug, thiserror::Error)]
pub enum RidershipError {
    /// HTTP request failed at the network level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A page body was not a JSON array of objects.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column value could not be coerced to its declared type.
    #[error("Cannot coerce {column} at row {row} to {expected}: {value}")]
    Coercion {
        /// Zero-based index of the offending record.
        row: usize,
        /// Column being coerced.
        column: String,
        /// The value as received (`null` when absent).
        value: String,
        /// Name of the target type.
        expected: &'static str,
    },
}

/// Something that can load a dataset.
///
/// `Ok(None)` means the load ran but produced nothing usable (no records,
/// or the records lacked required columns).
pub trait DatasetLoader {
    /// The loaded dataset type.
    type Output;

    /// Fetches and prepares the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`RidershipError`] if fetching or type coercion fails.
    fn load_dataset(&self) -> Result<Option<Self::Output>, RidershipError>;
}

/// Loads a dataset on first access and serves the cached result afterwards.
///
/// A failed load is not cached; the next access tries again.
pub struct CachedLoader<L: DatasetLoader> {
    loader: L,
    dataset: OnceCell<Option<L::Output>>,
}

impl<L: DatasetLoader> CachedLoader<L> {
    #[must_use]
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            dataset: OnceCell::new(),
        }
    }

    /// Returns the dataset, loading it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`RidershipError`] if the underlying load fails.
    pub fn dataset(&self) -> Result<Option<&L::Output>, RidershipError> {
        if let Some(dataset) = self.dataset.get() {
            return Ok(dataset.as_ref());
        }

        let loaded = self.loader.load_dataset()?;
        Ok(self.dataset.get_or_init(|| loaded).as_ref())
    }

    /// Whether the dataset has already been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }
}
