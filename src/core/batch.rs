//! Concurrent fetching of a run of consecutive days

use super::rates::{Batch, BatchEntry, DateKey, RateProvider, RateRecord};
use anyhow::{Context, Result, ensure};
use chrono::{Local, NaiveDate};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tracing::{debug, warn};

pub const MAX_DAYS: u32 = 10;

/// Builds the HTTP session shared by every request of a batch.
pub fn open_session(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("privat-rates/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP session")
}

/// Dates to query, most recent first: offset `i` maps to `today - i` days.
pub fn date_keys(today: NaiveDate, days: u32) -> Vec<DateKey> {
    (0..days)
        .map(|offset| DateKey::days_before(today, offset))
        .collect()
}

/// Fetches a single date. Never fails: any error is logged and becomes an
/// empty record.
pub async fn fetch_one(
    provider: &dyn RateProvider,
    session: &reqwest::Client,
    date: &DateKey,
) -> RateRecord {
    match provider.fetch_day(session, date).await {
        Ok(rates) => RateRecord::Rates(rates),
        Err(e) => {
            warn!(date = %date, error = %e, "Error fetching data for {date}");
            RateRecord::Empty
        }
    }
}

pub struct BatchCoordinator<'a> {
    provider: &'a dyn RateProvider,
    timeout: Duration,
}

impl<'a> BatchCoordinator<'a> {
    pub fn new(provider: &'a dyn RateProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Fetches today and the `days - 1` preceding days.
    pub async fn fetch_rates(&self, days: u32) -> Result<Batch> {
        self.fetch_rates_from(Local::now().date_naive(), days, &|| ())
            .await
    }

    /// Fetches `days` dates counting back from `today`, calling `on_complete`
    /// once per finished request.
    ///
    /// Every request is dispatched at once and the call returns only after all
    /// of them have finished. Entry `i` of the returned batch always holds the
    /// result for offset `i`, whatever order the responses arrived in.
    pub async fn fetch_rates_from(
        &self,
        today: NaiveDate,
        days: u32,
        on_complete: &(dyn Fn() + Sync),
    ) -> Result<Batch> {
        ensure!(
            (1..=MAX_DAYS).contains(&days),
            "Number of days must be between 1 and {MAX_DAYS}, got {days}"
        );
        let dates = date_keys(today, days);

        let records = {
            let session = open_session(self.timeout)?;
            debug!(days, "Dispatching rate requests");

            let mut pending: FuturesUnordered<_> = dates
                .iter()
                .enumerate()
                .map(|(index, date)| {
                    let session = &session;
                    async move { (index, fetch_one(self.provider, session, date).await) }
                })
                .collect();

            let mut records = vec![RateRecord::Empty; dates.len()];
            while let Some((index, record)) = pending.next().await {
                debug!(date = %dates[index], empty = record.is_empty(), "Request finished");
                records[index] = record;
                on_complete();
            }
            records
        };

        let entries = dates
            .into_iter()
            .zip(records)
            .map(|(date, record)| BatchEntry { date, record })
            .collect();
        Ok(Batch { entries })
    }
}
