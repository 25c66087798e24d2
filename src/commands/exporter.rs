// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::persistence::{self, Slot};
use crate::store::Ledger;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle<S: Slot>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ledger, sub),
        Some(("snapshot", sub)) => export_snapshot(ledger, sub),
        _ => Ok(()),
    }
}

fn export_transactions<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs: Vec<_> = ledger.transactions().collect();
    txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out))?;
            wtr.write_record([
                "id", "date", "description", "type", "amount", "account", "category", "notes",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    ledger.account_name(t.account_id).to_string(),
                    ledger.category_name(t.category_id).to_string(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "description": t.description,
                        "type": t.kind, "amount": t.amount.to_string(),
                        "account": ledger.account_name(t.account_id),
                        "category": ledger.category_name(t.category_id),
                        "notes": t.notes
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Cannot write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

fn export_snapshot<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let document = persistence::encode(ledger.state())?;
    std::fs::write(out, document).with_context(|| format!("Cannot write {}", out))?;
    println!("Wrote ledger snapshot to {}", out);
    Ok(())
}
