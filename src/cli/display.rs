//! Plain-text rendering of a fetched batch

use crate::core::{Batch, CurrencyRate, DailyRates, RateRecord};
use std::fmt::Write;

/// Currencies shown to the user; other entries stay in the record.
pub const DISPLAY_CURRENCIES: [&str; 2] = ["USD", "EUR"];

fn format_rate(rate: Option<f64>) -> String {
    rate.map_or("N/A".to_string(), |r| r.to_string())
}

/// Formats a single currency line.
pub fn format_currency_line(rate: &CurrencyRate) -> String {
    format!(
        "{}: Sale Rate - {}, Purchase Rate - {}",
        rate.currency,
        format_rate(rate.sale_rate),
        format_rate(rate.purchase_rate)
    )
}

fn render_day(out: &mut String, rates: &DailyRates) {
    let _ = writeln!(out, "Date: {}", rates.date);
    for rate in rates
        .rates
        .iter()
        .filter(|r| DISPLAY_CURRENCIES.contains(&r.currency.as_str()))
    {
        let _ = writeln!(out, "{}", format_currency_line(rate));
    }
    let _ = writeln!(out);
}

/// Renders every populated record as a date block. Empty records are
/// skipped unless `show_unavailable` is set.
pub fn render_batch(batch: &Batch, show_unavailable: bool) -> String {
    let mut out = String::new();
    for entry in &batch.entries {
        match &entry.record {
            RateRecord::Rates(rates) => render_day(&mut out, rates),
            RateRecord::Empty if show_unavailable => {
                let _ = writeln!(out, "Date: {} - unavailable", entry.date);
                let _ = writeln!(out);
            }
            RateRecord::Empty => {}
        }
    }
    out
}
