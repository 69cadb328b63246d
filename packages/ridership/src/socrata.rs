//! Socrata SODA API fetcher.
//!
//! Pages through a dataset with the `$limit`, `$offset` and `$order` query
//! parameters until the record cap is reached, an empty page comes back, or
//! the server rejects a request.

use cta_ridership_models::{LoaderConfig, RawRecord, RawTable};

use crate::RidershipError;

/// Outcome of a single page request.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// The server answered with success and a JSON array of records.
    Records(Vec<RawRecord>),
    /// The server answered with a non-success status.
    Rejected(u16),
}

/// Transport used to request a page.
pub trait PageClient {
    /// Issues a GET for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`RidershipError`] on network failure or an undecodable
    /// success body. Non-success statuses are [`Page::Rejected`], not errors.
    fn get_page(&self, url: &str) -> Result<Page, RidershipError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone, Default)]
pub struct HttpPageClient {
    client: reqwest::blocking::Client,
}

impl HttpPageClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl PageClient for HttpPageClient {
    fn get_page(&self, url: &str) -> Result<Page, RidershipError> {
        let response = self.client.get(url).send()?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            return Ok(Page::Rejected(status.as_u16()));
        }

        let body = response.text()?;
        let records: Vec<RawRecord> = serde_json::from_str(&body)?;
        Ok(Page::Records(records))
    }
}

/// Builds the request URL for the page starting at `offset`.
#[must_use]
pub fn page_url(config: &LoaderConfig, offset: u64) -> String {
    format!(
        "{}?$limit={}&$offset={offset}{}",
        config.api_url(),
        config.page_size(),
        config.sort_order()
    )
}

/// Fetches records page by page and returns everything accumulated.
///
/// Stops when `max_records` is reached, on an empty page, or on a
/// non-success response (logged; records gathered so far are kept). An empty
/// configuration fetches nothing.
///
/// # Errors
///
/// Returns [`RidershipError`] if a request fails at the network level or a
/// page body cannot be decoded.
pub fn fetch_socrata(
    config: &LoaderConfig,
    client: &impl PageClient,
) -> Result<RawTable, RidershipError> {
    let mut table = RawTable::new();

    if config.is_empty() {
        log::warn!("No endpoint configured, nothing to fetch");
        return Ok(table);
    }
    if config.page_size() == 0 {
        log::warn!("Page size is zero, nothing to fetch");
        return Ok(table);
    }

    let label = config
        .choice()
        .map_or_else(|| config.api_url().to_string(), |c| c.to_string());
    let mut offset: u64 = 0;

    while offset < config.max_records() {
        let url = page_url(config, offset);

        log::info!(
            "Fetching {label} data: offset={offset}, limit={}",
            config.page_size()
        );
        log::debug!("GET {url}");

        match client.get_page(&url)? {
            Page::Records(records) => {
                if records.is_empty() {
                    break;
                }
                table.extend(records);
                offset = offset.saturating_add(config.page_size());
            }
            Page::Rejected(status) => {
                log::warn!("Failed to retrieve {label} data at offset {offset} (HTTP {status})");
                break;
            }
        }
    }

    log::info!("Downloaded {} {label} records total", table.len());

    Ok(table)
}
