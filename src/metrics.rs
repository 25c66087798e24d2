// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregates derived from the ledger on every read. Nothing here is cached.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Account, AccountKind, Budget, Category, Transaction, TransactionKind};

/// Half-open reporting period `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// From the first day of `today`'s month up to and including `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self {
            start,
            end: today + Duration::days(1),
        }
    }

    /// The whole calendar month. `None` for an invalid month number.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Sum that clamps at `Decimal::MAX`/`MIN` instead of panicking.
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

pub fn period_total<'a, I>(transactions: I, kind: TransactionKind, window: ReportWindow) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    saturating_sum(
        transactions
            .into_iter()
            .filter(|t| t.kind == kind && window.contains(t.date))
            .map(|t| t.amount),
    )
}

pub fn period_income<'a, I>(transactions: I, window: ReportWindow) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    period_total(transactions, TransactionKind::Income, window)
}

pub fn period_expenses<'a, I>(transactions: I, window: ReportWindow) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    period_total(transactions, TransactionKind::Expense, window)
}

/// Sum of every account balance, inactive accounts included.
pub fn net_worth<'a, I>(accounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a Account>,
{
    saturating_sum(accounts.into_iter().map(|a| a.balance))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub color: String,
    pub total: Decimal,
}

/// Expense totals per expense category, largest first. Categories with
/// nothing spent are left out.
pub fn category_breakdown(
    categories: &[&Category],
    transactions: &[&Transaction],
) -> Vec<CategoryTotal> {
    breakdown(categories, transactions, |_| true)
}

/// Same as [`category_breakdown`], counting only transactions inside `window`.
pub fn category_breakdown_in(
    categories: &[&Category],
    transactions: &[&Transaction],
    window: ReportWindow,
) -> Vec<CategoryTotal> {
    breakdown(categories, transactions, |t| window.contains(t.date))
}

fn breakdown<F>(
    categories: &[&Category],
    transactions: &[&Transaction],
    include: F,
) -> Vec<CategoryTotal>
where
    F: Fn(&Transaction) -> bool,
{
    let mut totals: Vec<CategoryTotal> = categories
        .iter()
        .filter(|c| c.kind == TransactionKind::Expense)
        .map(|c| {
            let total = saturating_sum(
                transactions
                    .iter()
                    .filter(|t| {
                        t.category_id == c.id && t.kind == TransactionKind::Expense && include(t)
                    })
                    .map(|t| t.amount),
            );
            CategoryTotal {
                category_id: c.id,
                name: c.name.clone(),
                color: c.display_color().to_string(),
                total,
            }
        })
        .filter(|ct| !ct.total.is_zero())
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

pub fn top_categories(
    categories: &[&Category],
    transactions: &[&Transaction],
    n: usize,
) -> Vec<CategoryTotal> {
    let mut totals = category_breakdown(categories, transactions);
    totals.truncate(n);
    totals
}

/// Most recent transactions first.
pub fn recent_transactions<'a>(transactions: &[&'a Transaction], n: usize) -> Vec<&'a Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Share of the limit already used, as a percentage between 0 and 100.
pub fn budget_progress_percent(spent: Decimal, amount: Decimal) -> Decimal {
    if spent <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if amount <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    // A quotient too large for a Decimal is well past the limit.
    let ratio = spent.checked_div(amount).unwrap_or(Decimal::ONE);
    ratio.min(Decimal::ONE) * Decimal::ONE_HUNDRED
}

pub fn budget_severity(percent: Decimal) -> Severity {
    if percent >= Decimal::from(90) {
        Severity::Critical
    } else if percent >= Decimal::from(75) {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

pub fn is_over_budget(spent: Decimal, amount: Decimal) -> bool {
    spent > amount
}

pub fn budget_remaining(budget: &Budget) -> Decimal {
    budget.amount.saturating_sub(budget.spent)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent: Decimal,
    pub severity: Severity,
    pub over_budget: bool,
}

pub fn budget_progress(budget: &Budget) -> BudgetProgress {
    let percent = budget_progress_percent(budget.spent, budget.amount);
    BudgetProgress {
        budget_id: budget.id,
        name: budget.name.clone(),
        amount: budget.amount,
        spent: budget.spent,
        remaining: budget_remaining(budget),
        percent,
        severity: budget_severity(percent),
        over_budget: is_over_budget(budget.spent, budget.amount),
    }
}

/// Expenses of the budget's category dated within its start and end dates,
/// both inclusive. Used to spot a stale `spent`, never written back.
pub fn budget_spent_in_window<'a, I>(budget: &Budget, transactions: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    saturating_sum(
        transactions
            .into_iter()
            .filter(|t| {
                t.kind == TransactionKind::Expense
                    && t.category_id == budget.category_id
                    && budget.start_date <= t.date
                    && t.date <= budget.end_date
            })
            .map(|t| t.amount),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_worth: Decimal,
    pub period_income: Decimal,
    pub period_expenses: Decimal,
    pub period_balance: Decimal,
}

pub fn financial_summary(
    transactions: &[&Transaction],
    accounts: &[&Account],
    window: ReportWindow,
) -> FinancialSummary {
    let sum_kind = |kind: TransactionKind| -> Decimal {
        saturating_sum(
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount),
        )
    };
    let period_income = period_income(transactions.iter().copied(), window);
    let period_expenses = period_expenses(transactions.iter().copied(), window);
    FinancialSummary {
        total_income: sum_kind(TransactionKind::Income),
        total_expenses: sum_kind(TransactionKind::Expense),
        net_worth: net_worth(accounts.iter().copied()),
        period_income,
        period_expenses,
        period_balance: period_income.saturating_sub(period_expenses),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
}

pub fn account_balances(accounts: &[&Account]) -> Vec<AccountBalance> {
    accounts
        .iter()
        .map(|a| AccountBalance {
            account_id: a.id,
            name: a.name.clone(),
            kind: a.kind,
            currency: a.currency.clone(),
            balance: a.balance,
            is_active: a.is_active,
        })
        .collect()
}
