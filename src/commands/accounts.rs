// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{AccountKind, AccountPatch, NewAccount};
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{
    current_user_id, ensure_unique_name, fmt_money, get_default_currency, maybe_print_json,
    optional_text, parse_bool, parse_currency, parse_decimal, pretty_table, require_text,
    resolve_account,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle<S: Slot>(
    ledger: &mut Ledger<S>,
    conn: &Connection,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require_text("name", sub.get_one::<String>("name"))?;
            ensure_unique_name("Account", &name, existing_names(ledger), None)?;
            let kind = match sub.get_one::<String>("type") {
                Some(t) => t.parse::<AccountKind>()?,
                None => AccountKind::Checking,
            };
            let balance = match sub.get_one::<String>("balance") {
                Some(b) => parse_decimal(b)?,
                None => Decimal::ZERO,
            };
            let currency = match optional_text(sub.get_one::<String>("currency")) {
                Some(c) => parse_currency(&c)?,
                None => get_default_currency(conn)?,
            };
            let user_id = current_user_id(ledger)?;
            let account = ledger.add_account(NewAccount {
                name,
                kind,
                balance,
                currency,
                user_id,
                is_active: !sub.get_flag("inactive"),
            })?;
            println!(
                "Added account '{}' ({}, {}) id {}",
                account.name, account.kind, account.currency, account.id
            );
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => {
            let id = resolve_account(ledger, sub.get_one::<String>("id").unwrap())?.id;
            let name = optional_text(sub.get_one::<String>("name"));
            if let Some(n) = &name {
                ensure_unique_name("Account", n, existing_names(ledger), Some(id))?;
            }
            let patch = AccountPatch {
                name,
                kind: optional_text(sub.get_one::<String>("type"))
                    .map(|t| t.parse::<AccountKind>())
                    .transpose()?,
                balance: optional_text(sub.get_one::<String>("balance"))
                    .map(|b| parse_decimal(&b))
                    .transpose()?,
                currency: optional_text(sub.get_one::<String>("currency"))
                    .map(|c| parse_currency(&c))
                    .transpose()?,
                is_active: optional_text(sub.get_one::<String>("active"))
                    .map(|a| parse_bool(&a))
                    .transpose()?,
            };
            ledger.update_account(id, patch)?;
            println!("Updated account {}", id);
        }
        Some(("rm", sub)) => {
            let id = resolve_account(ledger, sub.get_one::<String>("id").unwrap())?.id;
            if let Some(removed) = ledger.delete_account(id)? {
                let orphaned = ledger.transactions_by_account(id).len();
                println!("Removed account '{}'", removed.name);
                if orphaned > 0 {
                    println!(
                        "{} transaction(s) still reference it and will show '{}'",
                        orphaned,
                        crate::store::ACCOUNT_NOT_FOUND
                    );
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn list<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut accounts: Vec<_> = ledger.accounts().collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name));
    if !maybe_print_json(json_flag, jsonl_flag, &accounts)? {
        let data = accounts
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.name.clone(),
                    a.kind.to_string(),
                    fmt_money(&a.balance, &a.currency),
                    if a.is_active { "yes" } else { "no" }.to_string(),
                    a.created_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Type", "Balance", "Active", "Created"], data)
        );
        println!(
            "Total: {}",
            fmt_money(&ledger.total_balance(), &first_currency(&accounts))
        );
    }
    Ok(())
}

fn existing_names<S: Slot>(ledger: &Ledger<S>) -> impl Iterator<Item = (uuid::Uuid, &str)> {
    ledger.accounts().map(|a| (a.id, a.name.as_str()))
}

fn first_currency(accounts: &[&crate::models::Account]) -> String {
    accounts
        .first()
        .map(|a| a.currency.clone())
        .unwrap_or_else(|| crate::utils::DEFAULT_CURRENCY.to_string())
}
