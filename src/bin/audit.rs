use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use fx_journal::config::Config;
use fx_journal::journal::{audit_entries, EntryDecision, Journal};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| cfg.journal_file.clone());

    let journal = Journal::load(&path)?;
    if journal.entries.is_empty() {
        println!("No journal entries in {}", path);
        return Ok(());
    }

    let policy = cfg.effective_policy();
    policy.validate().context("Invalid risk policy")?;
    let report = audit_entries(&journal.entries, &policy);

    println!("Journal audit: {}", path);
    println!("  Entries:  {}", report.checked);
    println!(
        "  Valid / Skip: {} / {}",
        journal.count_by_decision(EntryDecision::Valid),
        journal.count_by_decision(EntryDecision::Skip)
    );
    println!("  Awaiting reflection: {}", journal.open_entries().count());
    println!(
        "  Policy:   RR >= {:.2}, risk <= {:.2}%",
        policy.min_acceptable_rr, policy.max_risk_percent
    );
    println!();

    if report.is_clean() {
        println!("All entries match a fresh recomputation.");
    } else {
        println!("{} entr(ies) flagged:", report.flagged_entries());
        for finding in &report.findings {
            println!("  {}", finding);
        }
    }

    Ok(())
}
