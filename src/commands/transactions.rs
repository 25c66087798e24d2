// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::ReportWindow;
use crate::models::{NewTransaction, TransactionKind, TransactionPatch};
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{
    maybe_print_json, optional_text, parse_amount, parse_date, parse_month, pretty_table,
    require_text, resolve_account, resolve_category,
};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use uuid::Uuid;

pub fn handle<S: Slot>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            match ledger.delete_transaction(id)? {
                Some(tx) => println!("Removed transaction '{}' ({})", tx.description, tx.id),
                None => println!("No transaction {}", id),
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_id(s: &str) -> Result<Uuid> {
    s.trim()
        .parse::<Uuid>()
        .with_context(|| format!("Invalid transaction id '{}'", s))
}

fn add<S: Slot>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let description = require_text("description", sub.get_one::<String>("description"))?;
    let amount = parse_amount(&require_text("amount", sub.get_one::<String>("amount"))?)?;
    let account_key = require_text("account", sub.get_one::<String>("account"))?;
    let category_key = require_text("category", sub.get_one::<String>("category"))?;
    let kind = match sub.get_one::<String>("type") {
        Some(t) => t.parse::<TransactionKind>()?,
        None => TransactionKind::Expense,
    };
    let date = match optional_text(sub.get_one::<String>("date")) {
        Some(d) => parse_date(&d)?,
        None => chrono::Local::now().date_naive(),
    };
    let notes = optional_text(sub.get_one::<String>("notes"));

    let account = resolve_account(ledger, &account_key)?;
    let account_id = account.id;
    let account_name = account.name.clone();
    let category_id = resolve_category(ledger, &category_key)?.id;

    let tx = ledger.add_transaction(NewTransaction {
        description,
        amount,
        kind,
        category_id,
        account_id,
        date,
        notes,
    })?;
    println!(
        "Recorded {} {} on {} '{}' (acct: {}, balance {}) id {}",
        tx.kind,
        tx.amount,
        tx.date,
        tx.description,
        account_name,
        ledger.account_balance(account_id),
        tx.id
    );
    Ok(())
}

fn edit<S: Slot>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let account_id = optional_text(sub.get_one::<String>("account"))
        .map(|k| resolve_account(ledger, &k).map(|a| a.id))
        .transpose()?;
    let category_id = optional_text(sub.get_one::<String>("category"))
        .map(|k| resolve_category(ledger, &k).map(|c| c.id))
        .transpose()?;
    let patch = TransactionPatch {
        description: optional_text(sub.get_one::<String>("description")),
        amount: optional_text(sub.get_one::<String>("amount"))
            .map(|a| parse_amount(&a))
            .transpose()?,
        kind: optional_text(sub.get_one::<String>("type"))
            .map(|t| t.parse::<TransactionKind>())
            .transpose()?,
        category_id,
        account_id,
        date: optional_text(sub.get_one::<String>("date"))
            .map(|d| parse_date(&d))
            .transpose()?,
        notes: sub
            .get_one::<String>("notes")
            .map(|n| optional_text(Some(n))),
    };
    if ledger.update_transaction(id, patch)? {
        println!("Updated transaction {}", id);
    } else {
        return Err(anyhow!("No transaction {}", id));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub account: String,
    pub category: String,
    pub notes: String,
}

fn list<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.account.clone(),
                    r.category.clone(),
                    r.notes.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Type", "Amount", "Account", "Category", "Notes", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

/// Filtered transactions, newest first.
pub fn query_rows<S: Slot>(
    ledger: &Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let account_id = optional_text(sub.get_one::<String>("account"))
        .map(|k| resolve_account(ledger, &k).map(|a| a.id))
        .transpose()?;
    let category_id = optional_text(sub.get_one::<String>("category"))
        .map(|k| resolve_category(ledger, &k).map(|c| c.id))
        .transpose()?;
    let kind = optional_text(sub.get_one::<String>("type"))
        .map(|t| t.parse::<TransactionKind>())
        .transpose()?;
    let window = optional_text(sub.get_one::<String>("month"))
        .map(|m| -> Result<ReportWindow> {
            let (y, mo) = parse_month(&m)?;
            ReportWindow::month(y, mo).with_context(|| format!("Invalid month '{}'", m))
        })
        .transpose()?;
    let search = optional_text(sub.get_one::<String>("search")).map(|s| s.to_lowercase());

    let mut txs: Vec<_> = ledger
        .transactions()
        .filter(|t| account_id.is_none_or(|id| t.account_id == id))
        .filter(|t| category_id.is_none_or(|id| t.category_id == id))
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| window.is_none_or(|w| w.contains(t.date)))
        .filter(|t| {
            search
                .as_deref()
                .is_none_or(|s| t.description.to_lowercase().contains(s))
        })
        .collect();
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: t.description.clone(),
            kind: t.kind.to_string(),
            amount: format!("{:.2}", t.signed_amount()),
            account: ledger.account_name(t.account_id).to_string(),
            category: ledger.category_name(t.category_id).to_string(),
            notes: t.notes.clone().unwrap_or_default(),
        })
        .collect())
}
