// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::budget_spent_in_window;
use crate::models::TransactionKind;
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub detail: String,
}

impl Finding {
    fn new(issue: &'static str, detail: String) -> Self {
        Self { issue, detail }
    }
}

/// Problems the store tolerates silently: dangling references left by
/// deletes, budgets pointing at non-expense categories, and cached budget
/// totals that no longer match the transactions.
pub fn findings<S: Slot>(ledger: &Ledger<S>) -> Vec<Finding> {
    let mut rows = Vec::new();

    // 1) Transactions
    for t in ledger.transactions() {
        if ledger.account(t.account_id).is_none() {
            rows.push(Finding::new(
                "tx_missing_account",
                format!("{} '{}' -> {}", t.id, t.description, t.account_id),
            ));
        }
        if ledger.category(t.category_id).is_none() {
            rows.push(Finding::new(
                "tx_missing_category",
                format!("{} '{}' -> {}", t.id, t.description, t.category_id),
            ));
        }
        if t.amount < Decimal::ZERO {
            rows.push(Finding::new(
                "tx_negative_amount",
                format!("{} '{}' amount {}", t.id, t.description, t.amount),
            ));
        }
    }

    // 2) Budgets
    for b in ledger.budgets() {
        match ledger.category(b.category_id) {
            None => rows.push(Finding::new(
                "budget_missing_category",
                format!("{} '{}' -> {}", b.id, b.name, b.category_id),
            )),
            Some(c) if c.kind != TransactionKind::Expense => rows.push(Finding::new(
                "budget_not_expense",
                format!("{} '{}' uses {} category '{}'", b.id, b.name, c.kind, c.name),
            )),
            Some(_) => {}
        }
        let derived = budget_spent_in_window(b, ledger.transactions());
        if derived != b.spent {
            rows.push(Finding::new(
                "budget_spent_stale",
                format!(
                    "{} '{}' cached {:.2}, transactions {:.2}",
                    b.id, b.name, b.spent, derived
                ),
            ));
        }
    }

    rows
}

pub fn handle<S: Slot>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let rows = findings(ledger);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        let data = rows
            .into_iter()
            .map(|f| vec![f.issue.to_string(), f.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}
