//! exchange-runner: headless runner for the loyalty points exchange.
//!
//! Usage:
//!   exchange-runner --data-dir ./data --db exchange.db --user alice
//!   exchange-runner --data-dir ./data --db exchange.db --ipc-mode

use anyhow::Result;
use pointswap_core::{
    command::ExchangeCommand, config::ExchangeConfig, exchange_service::ExchangeService,
    store::ExchangeStore, types::format_dollars,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db", ":memory:");
    let data_dir = string_arg(&args, "--data-dir", "./data");
    let user = string_arg(&args, "--user", "demo");
    let history_limit = parse_arg(&args, "--history", 10usize);

    let config = ExchangeConfig::load(data_dir)?;
    let store = ExchangeStore::open(db)?;
    store.migrate()?;
    let service = ExchangeService::new(config, store);

    if ipc_mode {
        run_ipc_loop(&service)?;
    } else {
        println!("Points exchange - exchange-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  user:      {user}");
        println!();
        print_summary(&service, user, history_limit)?;
    }

    Ok(())
}

/// One JSON command per stdin line, one JSON response per stdout line.
/// Request errors are reported inline and never end the loop.
fn run_ipc_loop(service: &ExchangeService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: ExchangeCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, ExchangeCommand::Quit) {
            break;
        }

        let response = match service.dispatch(&cmd) {
            Ok(value) => serde_json::json!({ "ok": value }),
            Err(e) => {
                if !e.is_validation() {
                    log::error!("runner: {cmd:?} failed: {e}");
                }
                serde_json::json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(service: &ExchangeService, user: &str, history_limit: usize) -> Result<()> {
    let balances = service.balances(user)?;

    println!("=== WALLETS (as of {}) ===", chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"));
    if balances.is_empty() {
        println!("  (No linked accounts)");
    }
    for b in &balances {
        println!(
            "  {:<20} {:>12} pts  {:>12}",
            b.program.label(),
            b.balance,
            format_dollars(b.dollar_value)
        );
    }

    println!();
    println!("=== BEST AFFORDABLE REWARD PER WALLET ===");
    for b in &balances {
        let top = service.affordable_for_wallet(user, b.program)?;
        match top.first() {
            Some(r) => println!(
                "  {:<20} {} ({} pts)",
                b.program.label(),
                r.description,
                r.points_required
            ),
            None => println!("  {:<20} (nothing affordable yet)", b.program.label()),
        }
    }

    println!();
    println!("=== CONVERSION OPTIONS ===");
    for b in &balances {
        for (to, rate) in service.config().rate_board.destinations(b.program) {
            println!("  {:<20} -> {:<24} x{rate}", b.program.label(), to.label());
        }
    }

    println!();
    println!("=== RECENT CONVERSIONS ===");
    let history = service.history(user, history_limit)?;
    if history.is_empty() {
        println!("  (No conversions yet)");
    }
    for c in &history {
        println!(
            "  {} | {} {} -> {} {} (fee {}) @ {}",
            c.created_at, c.amount_in, c.from_program, c.net_amount, c.to_program, c.fee, c.rate
        );
    }

    println!();
    println!("=== RATE VERIFICATION ===");
    for v in service.verify_rates() {
        println!(
            "  {:>18} -> {:<18} published {:>6.3}  implied {:>6.3}  {:+6.1}% {}",
            v.from.code(),
            v.to.code(),
            v.published_rate,
            v.implied_rate,
            v.deviation * 100.0,
            if v.within_tolerance { "" } else { "(!)" }
        );
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
