//! The `usage` command — budget status and the per-day usage report.

use adjutant_budget::TokenBudgetTracker;
use adjutant_config::AppConfig;

pub async fn run(days: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = super::open_store(&config).await?;

    let tracker = TokenBudgetTracker::new(store, config.budget.daily_token_limit);

    let status = tracker.status().await;
    println!("📊 Token Budget");
    println!("─────────────────────────────────────");
    println!(
        "  Used today: {:.0} / {} weighted tokens ({:.1}%)",
        status.weighted_used, status.daily_limit, status.pct_used
    );
    println!("  Tier cap:   {}", status.tier_cap);
    if let Some(warning) = &status.warning {
        println!("  ⚠ {warning}");
    }

    let rows = tracker.summary(days).await?;
    if rows.is_empty() {
        println!();
        println!("No usage recorded in the last {days} days.");
        return Ok(());
    }

    println!();
    println!("📈 Last {days} days");
    println!("─────────────────────────────────────────────────────────");
    println!(
        "{:<12} {:<8} {:>9} {:>10} {:>10} {:>10}",
        "Day", "Tier", "Requests", "Input", "Output", "Weighted"
    );
    for row in &rows {
        println!(
            "{:<12} {:<8} {:>9} {:>10} {:>10} {:>10.0}",
            row.day, row.tier, row.requests, row.input_tokens, row.output_tokens,
            row.weighted_tokens
        );
    }

    Ok(())
}
