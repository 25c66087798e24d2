// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::{
    self, AccountBalance, CategoryTotal, FinancialSummary, ReportWindow,
};
use crate::models::Transaction;
use crate::persistence::Slot;
use crate::store::Ledger;
use crate::utils::{maybe_print_json, optional_text, parse_month, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;

/// Number of categories and transactions shown on the dashboard.
pub const DASHBOARD_TOP: usize = 5;

pub fn handle<S: Slot>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, sub)?,
        Some(("categories", sub)) => categories(ledger, sub)?,
        Some(("balances", sub)) => balances(ledger, sub)?,
        Some(("recent", sub)) => recent(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn window_arg(sub: &clap::ArgMatches) -> Result<Option<ReportWindow>> {
    optional_text(sub.get_one::<String>("month"))
        .map(|m| -> Result<ReportWindow> {
            let (y, mo) = parse_month(&m)?;
            ReportWindow::month(y, mo).with_context(|| format!("Invalid month '{}'", m))
        })
        .transpose()
}

fn today_window() -> ReportWindow {
    ReportWindow::month_to_date(chrono::Local::now().date_naive())
}

pub fn summary_for<S: Slot>(ledger: &Ledger<S>, window: ReportWindow) -> FinancialSummary {
    let txs: Vec<&Transaction> = ledger.transactions().collect();
    let accounts: Vec<_> = ledger.accounts().collect();
    metrics::financial_summary(&txs, &accounts, window)
}

fn summary_rows(s: &FinancialSummary, window: &ReportWindow) -> Vec<Vec<String>> {
    let period = format!("{} .. {}", window.start, window.end);
    vec![
        vec!["Income (period)".into(), format!("{:.2}", s.period_income), period.clone()],
        vec!["Expenses (period)".into(), format!("{:.2}", s.period_expenses), period.clone()],
        vec!["Balance (period)".into(), format!("{:.2}", s.period_balance), period],
        vec!["Income (all time)".into(), format!("{:.2}", s.total_income), String::new()],
        vec!["Expenses (all time)".into(), format!("{:.2}", s.total_expenses), String::new()],
        vec!["Net worth".into(), format!("{:.2}", s.net_worth), String::new()],
    ]
}

fn summary<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let window = window_arg(sub)?.unwrap_or_else(today_window);
    let s = summary_for(ledger, window);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        println!(
            "{}",
            pretty_table(&["Metric", "Amount", "Window"], summary_rows(&s, &window))
        );
    }
    Ok(())
}

pub fn breakdown_for<S: Slot>(
    ledger: &Ledger<S>,
    window: Option<ReportWindow>,
    top: Option<usize>,
) -> Vec<CategoryTotal> {
    let cats: Vec<_> = ledger.categories().collect();
    let txs: Vec<&Transaction> = ledger.transactions().collect();
    let mut totals = match window {
        Some(w) => metrics::category_breakdown_in(&cats, &txs, w),
        None => metrics::category_breakdown(&cats, &txs),
    };
    if let Some(n) = top {
        totals.truncate(n);
    }
    totals
}

fn category_rows(totals: &[CategoryTotal]) -> Vec<Vec<String>> {
    totals
        .iter()
        .map(|c| vec![c.name.clone(), format!("{:.2}", c.total), c.color.clone()])
        .collect()
}

fn categories<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let totals = breakdown_for(ledger, window_arg(sub)?, sub.get_one::<usize>("top").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Color"], category_rows(&totals))
        );
    }
    Ok(())
}

fn balance_rows(balances: &[AccountBalance]) -> Vec<Vec<String>> {
    balances
        .iter()
        .map(|b| {
            vec![
                b.name.clone(),
                b.kind.to_string(),
                b.currency.clone(),
                format!("{:.2}", b.balance),
                if b.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect()
}

fn balances<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut accounts: Vec<_> = ledger.accounts().collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name));
    let data = metrics::account_balances(&accounts);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Account", "Type", "CCY", "Balance", "Active"],
                balance_rows(&data)
            )
        );
        println!("Net worth: {:.2}", metrics::net_worth(accounts.iter().copied()));
    }
    Ok(())
}

#[derive(Serialize)]
struct RecentRow {
    id: String,
    date: String,
    description: String,
    category: String,
    amount: String,
}

fn recent_rows<S: Slot>(ledger: &Ledger<S>, limit: usize) -> Vec<RecentRow> {
    let txs: Vec<&Transaction> = ledger.transactions().collect();
    metrics::recent_transactions(&txs, limit)
        .into_iter()
        .map(|t| RecentRow {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: t.description.clone(),
            category: ledger.category_name(t.category_id).to_string(),
            amount: format!("{:.2}", t.signed_amount()),
        })
        .collect()
}

fn recent_table(rows: &[RecentRow]) -> comfy_table::Table {
    pretty_table(
        &["Date", "Description", "Category", "Amount"],
        rows.iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                ]
            })
            .collect(),
    )
}

fn recent<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = sub
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(DASHBOARD_TOP);
    let rows = recent_rows(ledger, limit);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!("{}", recent_table(&rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct Dashboard {
    window: ReportWindow,
    summary: FinancialSummary,
    top_categories: Vec<CategoryTotal>,
    recent_transactions: Vec<RecentRow>,
    account_balances: Vec<AccountBalance>,
}

pub fn dashboard<S: Slot>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let window = today_window();
    let mut accounts: Vec<_> = ledger.accounts().collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name));
    let d = Dashboard {
        window,
        summary: summary_for(ledger, window),
        top_categories: breakdown_for(ledger, None, Some(DASHBOARD_TOP)),
        recent_transactions: recent_rows(ledger, DASHBOARD_TOP),
        account_balances: metrics::account_balances(&accounts),
    };
    if !maybe_print_json(json_flag, jsonl_flag, &d)? {
        if let Some(user) = ledger.current_user() {
            println!("Hello, {}", user.name);
        }
        println!(
            "{}",
            pretty_table(&["Metric", "Amount", "Window"], summary_rows(&d.summary, &window))
        );
        println!("Top categories");
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Color"], category_rows(&d.top_categories))
        );
        println!("Recent transactions");
        println!("{}", recent_table(&d.recent_transactions));
        println!("Accounts");
        println!(
            "{}",
            pretty_table(
                &["Account", "Type", "CCY", "Balance", "Active"],
                balance_rows(&d.account_balances)
            )
        );
    }
    Ok(())
}
