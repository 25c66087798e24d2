// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::{budget_progress, BudgetProgress};
use crate::models::{BudgetPatch, BudgetPeriod, Category, NewBudget, TransactionKind};
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{
    current_user_id, ensure_unique_name, maybe_print_json, optional_text, parse_amount,
    parse_date, parse_decimal, pretty_table, require_text, resolve_budget, resolve_category,
};
use anyhow::{Context, Result, bail};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<S: Slot>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = resolve_budget(ledger, sub.get_one::<String>("id").unwrap())?.id;
            if let Some(removed) = ledger.delete_budget(id)? {
                println!("Removed budget '{}'", removed.name);
            }
        }
        Some(("status", sub)) => status(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn expense_category(category: &Category) -> Result<()> {
    if category.kind != TransactionKind::Expense {
        bail!(
            "Budgets track expense categories; '{}' is {}",
            category.name,
            category.kind
        );
    }
    Ok(())
}

/// Last day of the period that begins on `start`; end dates are inclusive.
fn default_end(start: NaiveDate, period: BudgetPeriod) -> Result<NaiveDate> {
    let months = match period {
        BudgetPeriod::Monthly => Months::new(1),
        BudgetPeriod::Yearly => Months::new(12),
    };
    start
        .checked_add_months(months)
        .and_then(|next| next.pred_opt())
        .with_context(|| format!("Cannot compute end date from {}", start))
}

fn existing_names<S: Slot>(ledger: &Ledger<S>) -> impl Iterator<Item = (uuid::Uuid, &str)> {
    ledger.budgets().map(|b| (b.id, b.name.as_str()))
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        bail!("End date {} is before start date {}", end, start);
    }
    Ok(())
}

fn add<S: Slot>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let name = require_text("name", sub.get_one::<String>("name"))?;
    ensure_unique_name("Budget", &name, existing_names(ledger), None)?;
    let amount = parse_amount(&require_text("amount", sub.get_one::<String>("amount"))?)?;
    let category_key = require_text("category", sub.get_one::<String>("category"))?;
    let period = match sub.get_one::<String>("period") {
        Some(p) => p.parse::<BudgetPeriod>()?,
        None => BudgetPeriod::Monthly,
    };
    let start_date = match optional_text(sub.get_one::<String>("start")) {
        Some(d) => parse_date(&d)?,
        None => chrono::Local::now().date_naive(),
    };
    let end_date = match optional_text(sub.get_one::<String>("end")) {
        Some(d) => parse_date(&d)?,
        None => default_end(start_date, period)?,
    };
    check_range(start_date, end_date)?;
    let spent = match optional_text(sub.get_one::<String>("spent")) {
        Some(s) => parse_decimal(&s)?,
        None => Decimal::ZERO,
    };

    let category = resolve_category(ledger, &category_key)?;
    expense_category(category)?;
    let category_id = category.id;
    let user_id = current_user_id(ledger)?;

    let budget = ledger.add_budget(NewBudget {
        name,
        amount,
        spent,
        category_id,
        period,
        start_date,
        end_date,
        user_id,
    })?;
    println!(
        "Budget '{}' set to {} ({}, {} to {}) id {}",
        budget.name, budget.amount, budget.period, budget.start_date, budget.end_date, budget.id
    );
    Ok(())
}

fn edit<S: Slot>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let current = resolve_budget(ledger, sub.get_one::<String>("id").unwrap())?;
    let id = current.id;
    let (cur_start, cur_end) = (current.start_date, current.end_date);
    let name = optional_text(sub.get_one::<String>("name"));
    if let Some(n) = &name {
        ensure_unique_name("Budget", n, existing_names(ledger), Some(id))?;
    }

    let category_id = match optional_text(sub.get_one::<String>("category")) {
        Some(k) => {
            let category = resolve_category(ledger, &k)?;
            expense_category(category)?;
            Some(category.id)
        }
        None => None,
    };
    let start_date = optional_text(sub.get_one::<String>("start"))
        .map(|d| parse_date(&d))
        .transpose()?;
    let end_date = optional_text(sub.get_one::<String>("end"))
        .map(|d| parse_date(&d))
        .transpose()?;
    check_range(start_date.unwrap_or(cur_start), end_date.unwrap_or(cur_end))?;

    let patch = BudgetPatch {
        name,
        amount: optional_text(sub.get_one::<String>("amount"))
            .map(|a| parse_amount(&a))
            .transpose()?,
        spent: optional_text(sub.get_one::<String>("spent"))
            .map(|s| parse_decimal(&s))
            .transpose()?,
        category_id,
        period: optional_text(sub.get_one::<String>("period"))
            .map(|p| p.parse::<BudgetPeriod>())
            .transpose()?,
        start_date,
        end_date,
    };
    ledger.update_budget(id, patch)?;
    println!("Updated budget {}", id);
    Ok(())
}

fn list<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut budgets: Vec<_> = ledger.budgets().collect();
    budgets.sort_by(|a, b| a.name.cmp(&b.name));
    if !maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        let data = budgets
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.name.clone(),
                    ledger.category_name(b.category_id).to_string(),
                    b.period.to_string(),
                    format!("{} .. {}", b.start_date, b.end_date),
                    format!("{:.2}", b.amount),
                    format!("{:.2}", b.spent),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Category", "Period", "Dates", "Limit", "Spent"],
                data
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusRow {
    category: String,
    #[serde(flatten)]
    progress: BudgetProgress,
}

fn status<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut budgets: Vec<_> = ledger.budgets().collect();
    budgets.sort_by(|a, b| a.name.cmp(&b.name));
    let rows: Vec<StatusRow> = budgets
        .iter()
        .map(|b| StatusRow {
            category: ledger.category_name(b.category_id).to_string(),
            progress: budget_progress(b),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                let p = &r.progress;
                vec![
                    p.name.clone(),
                    r.category.clone(),
                    format!("{:.2}", p.spent),
                    format!("{:.2}", p.amount),
                    format!("{:.2}", p.remaining),
                    format!("{:.1}%", p.percent),
                    p.severity.as_str().to_string(),
                    if p.over_budget { "OVER" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Budget", "Category", "Spent", "Limit", "Remaining", "Used", "Status", ""],
                data
            )
        );
    }
    Ok(())
}
