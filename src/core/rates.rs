//! Exchange rate records and the provider abstraction

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Date format expected by the remote API's `date` query parameter.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A calendar date used both as the request parameter and as the result key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// The date `offset` days before `today`.
    pub fn days_before(today: NaiveDate, offset: u32) -> Self {
        DateKey(today - Duration::days(i64::from(offset)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// One currency line of a daily rate table. Either rate may be missing upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub sale_rate: Option<f64>,
    pub purchase_rate: Option<f64>,
    pub sale_rate_nb: Option<f64>,
    pub purchase_rate_nb: Option<f64>,
}

/// The payload returned for a single date, in the order the API listed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRates {
    pub date: String,
    pub base_currency: Option<String>,
    pub rates: Vec<CurrencyRate>,
}

/// Outcome of one fetch: wholly present or wholly empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RateRecord {
    Rates(DailyRates),
    #[default]
    Empty,
}

impl RateRecord {
    pub fn is_empty(&self) -> bool {
        matches!(self, RateRecord::Empty)
    }

    pub fn rates(&self) -> Option<&DailyRates> {
        match self {
            RateRecord::Rates(rates) => Some(rates),
            RateRecord::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub date: DateKey,
    pub record: RateRecord,
}

/// Results for one request, indexed by day offset (0 = today).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    pub entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &RateRecord> {
        self.entries.iter().map(|e| &e.record)
    }
}

/// Source of daily exchange rate tables.
///
/// Implementations report every failure as an error; the batch coordinator
/// decides how failures are surfaced.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_day(&self, session: &reqwest::Client, date: &DateKey) -> Result<DailyRates>;
}
