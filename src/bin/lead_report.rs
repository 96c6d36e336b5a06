//! Prints a one-off lead report for a month.
//!
//! Usage: `lead_report [YEAR MONTH]` (defaults to the current month).

use chrono::Utc;
use rust_leads_api::config::Config;
use rust_leads_api::dashboard::{RefreshOutcome, ReportingService};
use rust_leads_api::models::DateRange;
use std::env;

fn parse_range(args: &[String]) -> anyhow::Result<DateRange> {
    match args {
        [] => Ok(DateRange::current_month(Utc::now().date_naive())),
        [year, month] => {
            let year: i32 = year
                .parse()
                .map_err(|_| anyhow::anyhow!("YEAR must be a number, got '{}'", year))?;
            let month: u32 = month
                .parse()
                .map_err(|_| anyhow::anyhow!("MONTH must be a number, got '{}'", month))?;
            DateRange::month(year, month)
                .ok_or_else(|| anyhow::anyhow!("invalid month {}/{}", month, year))
        }
        _ => anyhow::bail!("usage: lead_report [YEAR MONTH]"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_leads_api=warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let range = parse_range(&args)?;

    let config = Config::from_env()?;
    let reporting = ReportingService::new(config)?;

    let view = match reporting.refresh(range).await {
        RefreshOutcome::Refreshed { view, .. } => view,
        RefreshOutcome::ConfigurationIncomplete { missing } => {
            anyhow::bail!(
                "configuration incomplete, set {} (or SAMPLE_DATA_FALLBACK=true)",
                missing.join(", ")
            );
        }
    };

    println!("Leads {} → {}", view.range.start, view.range.end);
    println!();
    println!("Total leads:     {}", view.stats.total);
    println!("Uncontacted:     {}", view.stats.uncontacted);
    println!("Contacted:       {}%", view.contacted_percentage);
    for report in &view.sources {
        let mode = format!("{:?}", report.mode).to_lowercase();
        match &report.error {
            Some(error) => println!("  {:<14} failed: {}", report.label, error),
            None => println!("  {:<14} {} leads ({})", report.label, report.leads, mode),
        }
    }

    println!();
    println!("{:<24} {:>6} {:>7}", "Owner", "Leads", "Share");
    for row in &view.owner_table {
        println!("{:<24} {:>6} {:>6.1}%", row.owner, row.leads, row.percentage);
    }

    println!();
    println!("{:<12} {:>6} {:>10}", "Day", "Leads", "Contacted");
    for (day, bin) in view.daily_bins.iter().filter(|(_, bin)| bin.total > 0) {
        println!("{:<12} {:>6} {:>10}", day, bin.total, bin.contacted);
    }

    Ok(())
}
