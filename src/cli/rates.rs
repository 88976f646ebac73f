use super::prompt::{self, DaysChoice};
use super::{display, ui};
use crate::core::BatchCoordinator;
use crate::core::config::AppConfig;
use crate::providers::privatbank::PrivatBankProvider;
use anyhow::Result;
use chrono::Local;
use tracing::info;

/// Runs one fetch-and-display cycle, prompting for the day count when none
/// was given on the command line.
pub async fn run(config: &AppConfig, days: Option<u32>) -> Result<()> {
    let days = match days {
        Some(days) => days,
        None => {
            let stdin = std::io::stdin();
            match prompt::prompt_for_days(&mut stdin.lock(), &mut std::io::stdout())? {
                DaysChoice::Days(days) => days,
                DaysChoice::Exit => return Ok(()),
            }
        }
    };

    let output = fetch_and_render(config, days).await?;
    print!("{output}");
    Ok(())
}

/// Fetches `days` days of rates and returns the rendered report.
pub async fn fetch_and_render(config: &AppConfig, days: u32) -> Result<String> {
    let provider = PrivatBankProvider::new(config.base_url());
    let coordinator = BatchCoordinator::new(&provider, config.request_timeout());

    let pb = ui::new_progress_bar(u64::from(days), "Fetching exchange rates");
    let batch = coordinator
        .fetch_rates_from(Local::now().date_naive(), days, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();
    let batch = batch?;

    let available = batch.records().filter(|r| !r.is_empty()).count();
    info!(days, available, "Fetched exchange rates");

    Ok(display::render_batch(&batch, config.show_unavailable))
}
