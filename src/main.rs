use anyhow::Context;
use emas_ledger::export;
use emas_ledger::{Config, Ledger, LedgerError, Snapshot};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
commands:
  buy <grams>     (beli)        buy gold at the current price
  sell <grams>    (jual)        sell gold at the current price
  sell-all        (jual-semua)  sell everything held
  next            (hari)        skip one day and move the price
  status                        show day, price, balance and holdings
  json                          print the current snapshot as JSON
  history         (riwayat)     print the transaction history
  save            (simpan)      write the history to a CSV file
  help                          show this message
  quit            (keluar)      exit";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let mut ledger = match config.seed {
        Some(seed) => Ledger::seeded(config.ledger, seed),
        None => Ledger::new(config.ledger),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", HELP)?;
    print_status(&mut stdout, &ledger.snapshot())?;

    for line in stdin.lock().lines() {
        let line = line?;
        let (command, arg) = match line.trim().split_once(char::is_whitespace) {
            Some((c, a)) => (c, a),
            None => (line.trim(), ""),
        };

        match command {
            "" => continue,
            "buy" | "beli" => report(&mut stdout, ledger.buy(arg))?,
            "sell" | "jual" => report(&mut stdout, ledger.sell(arg))?,
            "sell-all" | "jual-semua" => report(&mut stdout, ledger.sell_all())?,
            "next" | "hari" => {
                let advance = ledger.advance_day();
                writeln!(
                    stdout,
                    "day {} -> {}, price change {}%{}",
                    advance.from_day,
                    advance.to_day,
                    advance.percent_change,
                    if advance.floored { " (floored)" } else { "" }
                )?;
                print_status(&mut stdout, &advance.snapshot)?;
            }
            "status" => print_status(&mut stdout, &ledger.snapshot())?,
            "json" => writeln!(stdout, "{}", serde_json::to_string_pretty(&ledger.snapshot())?)?,
            "history" | "riwayat" => {
                for entry in ledger.history() {
                    writeln!(
                        stdout,
                        "{}  {:<13} {:>12} @ {:>20}  total {:>20}  saldo {:>22}  emas {:>12}",
                        entry.timestamp(),
                        entry.action(),
                        entry.quantity().to_string(),
                        entry.price_per_unit().to_string(),
                        entry.total().to_string(),
                        entry.cash_after().to_string(),
                        entry.holdings_after().to_string(),
                    )?;
                }
            }
            "save" | "simpan" => {
                match export::save_history(&ledger.export_history(), &config.export_dir) {
                    Ok(path) => writeln!(stdout, "history saved to {}", path.display())?,
                    Err(e) => writeln!(stdout, "could not save history: {}", e)?,
                }
            }
            "help" => writeln!(stdout, "{}", HELP)?,
            "quit" | "keluar" | "exit" => break,
            other => writeln!(stdout, "unknown command {:?}, type help", other)?,
        }
    }

    Ok(())
}

fn report(out: &mut impl Write, result: Result<Snapshot, LedgerError>) -> io::Result<()> {
    match result {
        Ok(snapshot) => print_status(out, &snapshot),
        Err(e) => writeln!(out, "rejected: {}", e),
    }
}

fn print_status(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "day:      {}", snapshot.day)?;
    writeln!(out, "price/g:  {}", snapshot.price_per_unit)?;
    writeln!(out, "balance:  {}", snapshot.cash)?;
    writeln!(out, "gold:     {}", snapshot.holdings)?;
    if let Some(worth) = snapshot.net_worth() {
        writeln!(out, "worth:    {}", worth)?;
    }
    Ok(())
}
