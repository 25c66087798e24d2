// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use financa::{Ledger, SqliteSlot, cli, commands, db};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("financa=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = db::resolve_path(matches.get_one::<PathBuf>("db").map(PathBuf::as_path))?;
    let conn = db::open_or_init(&path)?;
    let mut ledger = Ledger::load(SqliteSlot::new(&conn));

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("user", sub)) => commands::users::handle(&mut ledger, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&mut ledger, &conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("dashboard", sub)) => commands::reports::dashboard(&ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        Some(("reset", sub)) => {
            if !sub.get_flag("yes") {
                bail!("This deletes every account, category, budget and transaction; pass --yes to confirm");
            }
            ledger.reset()?;
            println!("All data deleted");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
