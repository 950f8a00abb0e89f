use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fx_journal::config::Config;
use fx_journal::core::{compute_trade_sizing, TradeSizingInput, TradeSizingResult};
use fx_journal::exchange::JpyRateResolver;
use fx_journal::journal::Journal;
use fx_journal::models::currency_pair::{default_catalog, find_pair, sort_for_locale};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let policy = cfg.effective_policy();
    policy.validate().context("Invalid risk policy")?;

    // <SYMBOL> <BALANCE> <SL_PIPS> [TP_PIPS] [RISK_PCT]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        print_usage(&cfg);
        return Ok(());
    }

    let balance: f64 = parse_arg(&args[2], "balance")?;
    let stop_loss_pips: f64 = parse_arg(&args[3], "stop loss pips")?;
    let take_profit_pips = args
        .get(4)
        .map(|s| parse_arg(s, "take profit pips"))
        .transpose()?;
    let risk_percent = args
        .get(5)
        .map(|s| parse_arg(s, "risk percent"))
        .transpose()?;

    let catalog = default_catalog();
    let pair = find_pair(&catalog, &args[1])
        .cloned()
        .with_context(|| format!("Unknown pair {}", args[1]))?;

    let mut resolver = JpyRateResolver::from_config(&cfg);
    let rate = resolver.get_jpy_rate(pair.quote_currency()).await;
    info!("{} quote {} = {} JPY", pair, pair.quote_currency(), rate);

    let input = TradeSizingInput {
        account_balance: balance,
        risk_percent,
        stop_loss_pips,
        take_profit_pips,
        pair: Some(pair),
        jpy_rate_for_quote_currency: rate,
    };

    let result = match compute_trade_sizing(&input, &policy) {
        Some(r) => r,
        None => {
            println!("Incomplete input: balance, stop loss and take profit must be positive.");
            return Ok(());
        }
    };

    print_result(&args[1], &result);

    if let Ok(hypothesis) = std::env::var("JOURNAL_HYPOTHESIS") {
        let mut journal = Journal::load(&cfg.journal_file)?;
        let id = journal.submit(&hypothesis, input, &policy, Utc::now())?.id;
        journal.save(&cfg.journal_file)?;
        println!("Logged as entry #{} in {}", id, cfg.journal_file);
    }

    Ok(())
}

fn parse_arg(raw: &str, what: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {}: {}", what, raw))
}

fn print_result(symbol: &str, r: &TradeSizingResult) {
    println!("══════════════════════════════════════════");
    println!("  {}", symbol.to_uppercase());
    println!("  Pip value:     ¥{:.2} / lot", r.pip_value_yen);
    println!("  Risk:          ¥{:.0} ({:.2}%)", r.risk_amount_yen, r.risk_percent);
    println!("  Lot size:      {:.2}", r.lot_size);
    println!("  Take profit:   {:.1} pips (¥{:.0})", r.take_profit_pips, r.take_profit_amount_yen);
    println!("  RR:            {:.2}", r.risk_reward_ratio);
    println!("  Realized risk: {:.2}%", r.realized_risk_percent);
    println!("──────────────────────────────────────────");
    println!("  RR gate:       {}", if r.is_rr_ok { "OK" } else { "NG" });
    println!("  Risk gate:     {}", if r.is_risk_ok { "OK" } else { "NG" });
    if r.gate_all_ok() {
        println!("  => Conditions met, trade allowed");
    } else {
        println!("  => Conditions not met, log as skip");
    }
    println!("══════════════════════════════════════════");
}

fn print_usage(cfg: &Config) {
    println!("Usage: fx-journal <SYMBOL> <BALANCE_JPY> <SL_PIPS> [TP_PIPS] [RISK_PCT]");
    println!();
    println!("Pairs:");
    let mut pairs = default_catalog();
    sort_for_locale(&mut pairs, cfg.locale);
    for p in &pairs {
        println!(
            "  {:<8} contract {:>9} pip {:<7} quoted to {} dp",
            p.symbol(),
            p.contract_size(),
            p.pip_size(),
            p.pip_decimal_position()
        );
    }
}
