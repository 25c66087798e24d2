// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use financa::metrics::{
    self, ReportWindow, Severity, budget_progress_percent, budget_severity, is_over_budget,
};
use financa::models::{
    Account, AccountKind, Budget, BudgetPeriod, Category, NewAccount, NewBudget, NewCategory,
    NewTransaction, Transaction, TransactionKind,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn account(balance: i64, is_active: bool) -> Account {
    Account::new(
        NewAccount {
            name: format!("acct {}", balance),
            kind: AccountKind::Checking,
            balance: Decimal::from(balance),
            currency: "BRL".into(),
            user_id: Uuid::nil(),
            is_active,
        },
        Utc::now(),
    )
}

fn category(name: &str, kind: TransactionKind) -> Category {
    Category::new(
        NewCategory {
            name: name.into(),
            color: String::new(),
            icon: String::new(),
            kind,
            user_id: Uuid::nil(),
        },
        Utc::now(),
    )
}

fn tx(kind: TransactionKind, amount: &str, category_id: Uuid, on: NaiveDate) -> Transaction {
    Transaction::new(
        NewTransaction {
            description: format!("{} {}", kind, amount),
            amount: amount.parse().unwrap(),
            kind,
            category_id,
            account_id: Uuid::nil(),
            date: on,
            notes: None,
        },
        Utc::now(),
    )
}

#[test]
fn net_worth_counts_inactive_accounts() {
    let accounts = [account(100, true), account(-40, false), account(0, true)];
    assert_eq!(metrics::net_worth(accounts.iter()), Decimal::from(60));
    assert_eq!(metrics::net_worth(std::iter::empty()), Decimal::ZERO);
}

#[test]
fn month_to_date_window_includes_today_and_excludes_last_month() {
    let w = ReportWindow::month_to_date(date(2025, 3, 15));
    assert_eq!(w.start, date(2025, 3, 1));
    assert!(w.contains(date(2025, 3, 1)));
    assert!(w.contains(date(2025, 3, 15)));
    assert!(!w.contains(date(2025, 3, 16)));
    assert!(!w.contains(date(2025, 2, 28)));
}

#[test]
fn calendar_month_window_wraps_the_year() {
    let w = ReportWindow::month(2024, 12).unwrap();
    assert_eq!(w.start, date(2024, 12, 1));
    assert_eq!(w.end, date(2025, 1, 1));
    assert!(w.contains(date(2024, 12, 31)));
    assert!(ReportWindow::month(2024, 13).is_none());
}

#[test]
fn period_totals_respect_type_and_window() {
    let cat = Uuid::new_v4();
    let txs = [
        tx(TransactionKind::Income, "500", cat, date(2025, 3, 1)),
        tx(TransactionKind::Income, "80", cat, date(2025, 2, 28)),
        tx(TransactionKind::Expense, "120.50", cat, date(2025, 3, 9)),
        tx(TransactionKind::Transfer, "60", cat, date(2025, 3, 9)),
        tx(TransactionKind::Expense, "10", cat, date(2025, 4, 1)),
    ];
    let w = ReportWindow::month(2025, 3).unwrap();
    assert_eq!(metrics::period_income(txs.iter(), w), Decimal::from(500));
    assert_eq!(
        metrics::period_expenses(txs.iter(), w),
        Decimal::new(12050, 2)
    );
    assert_eq!(
        metrics::period_total(txs.iter(), TransactionKind::Transfer, w),
        Decimal::from(60)
    );
}

#[test]
fn breakdown_drops_zero_totals_and_sorts_descending() {
    let food = category("Food", TransactionKind::Expense);
    let rent = category("Rent", TransactionKind::Expense);
    let fun = category("Fun", TransactionKind::Expense);
    let salary = category("Salary", TransactionKind::Income);
    let d = date(2025, 3, 5);
    let txs = [
        tx(TransactionKind::Expense, "30", food.id, d),
        tx(TransactionKind::Expense, "15", food.id, d),
        tx(TransactionKind::Expense, "900", rent.id, d),
        // Income booked against an expense category does not count.
        tx(TransactionKind::Income, "999", fun.id, d),
        tx(TransactionKind::Expense, "5", salary.id, d),
    ];
    let cats = [&food, &rent, &fun, &salary];
    let tx_refs: Vec<&Transaction> = txs.iter().collect();

    let totals = metrics::category_breakdown(&cats, &tx_refs);
    let names: Vec<_> = totals.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Rent", "Food"]);
    assert_eq!(totals[0].total, Decimal::from(900));
    assert_eq!(totals[1].total, Decimal::from(45));
    assert_eq!(totals[1].color, "#6B7280");
    assert!(totals.iter().all(|t| !t.total.is_zero()));

    let top = metrics::top_categories(&cats, &tx_refs, 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Rent");
}

#[test]
fn breakdown_in_window_ignores_other_months() {
    let food = category("Food", TransactionKind::Expense);
    let txs = [
        tx(TransactionKind::Expense, "30", food.id, date(2025, 3, 5)),
        tx(TransactionKind::Expense, "70", food.id, date(2025, 2, 5)),
    ];
    let tx_refs: Vec<&Transaction> = txs.iter().collect();
    let w = ReportWindow::month(2025, 2).unwrap();
    let totals = metrics::category_breakdown_in(&[&food], &tx_refs, w);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total, Decimal::from(70));
    let w = ReportWindow::month(2025, 1).unwrap();
    assert!(metrics::category_breakdown_in(&[&food], &tx_refs, w).is_empty());
}

#[test]
fn budget_progress_is_capped_but_over_budget_is_not() {
    let hundred = Decimal::from(100);
    assert_eq!(budget_progress_percent(Decimal::from(120), hundred), hundred);
    assert!(is_over_budget(Decimal::from(120), hundred));

    assert_eq!(
        budget_progress_percent(Decimal::from(50), hundred),
        Decimal::from(50)
    );
    assert!(!is_over_budget(Decimal::from(50), hundred));

    assert!(!is_over_budget(hundred, hundred));
    assert_eq!(budget_progress_percent(hundred, hundred), hundred);
}

#[test]
fn budget_progress_with_zero_limit() {
    assert_eq!(
        budget_progress_percent(Decimal::ZERO, Decimal::ZERO),
        Decimal::ZERO
    );
    assert_eq!(
        budget_progress_percent(Decimal::ONE, Decimal::ZERO),
        Decimal::from(100)
    );
}

#[test]
fn budget_progress_survives_a_quotient_too_large_for_decimal() {
    let spent: Decimal = "10000000000000000000000".parse().unwrap();
    let tiny = Decimal::new(1, 7);
    assert_eq!(budget_progress_percent(spent, tiny), Decimal::from(100));
    assert!(is_over_budget(spent, tiny));
    assert_eq!(budget_progress_percent(-spent, tiny), Decimal::ZERO);
}

#[test]
fn sums_clamp_instead_of_overflowing() {
    let mut rich = account(0, true);
    rich.balance = Decimal::MAX;
    let accounts = [rich, account(1, true)];
    assert_eq!(metrics::net_worth(accounts.iter()), Decimal::MAX);

    let food = category("Food", TransactionKind::Expense);
    let mut big = tx(TransactionKind::Expense, "1", food.id, date(2025, 3, 2));
    big.amount = Decimal::MAX;
    let small = tx(TransactionKind::Expense, "5", food.id, date(2025, 3, 3));
    let window = ReportWindow::month(2025, 3).unwrap();
    assert_eq!(
        metrics::period_expenses([&big, &small], window),
        Decimal::MAX
    );
    let totals = metrics::category_breakdown(&[&food], &[&big, &small]);
    assert_eq!(totals[0].total, Decimal::MAX);
}

#[test]
fn severity_thresholds() {
    assert_eq!(budget_severity(Decimal::from(100)), Severity::Critical);
    assert_eq!(budget_severity(Decimal::from(90)), Severity::Critical);
    assert_eq!(budget_severity(Decimal::new(899, 1)), Severity::Warning);
    assert_eq!(budget_severity(Decimal::from(75)), Severity::Warning);
    assert_eq!(budget_severity(Decimal::new(7499, 2)), Severity::Ok);
    assert_eq!(budget_severity(Decimal::ZERO), Severity::Ok);
}

fn budget(amount: i64, spent: i64, category_id: Uuid) -> Budget {
    Budget::new(
        NewBudget {
            name: "Food".into(),
            amount: Decimal::from(amount),
            spent: Decimal::from(spent),
            category_id,
            period: BudgetPeriod::Monthly,
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 31),
            user_id: Uuid::nil(),
        },
        Utc::now(),
    )
}

#[test]
fn budget_progress_row_combines_the_rules() {
    let b = budget(400, 320, Uuid::new_v4());
    let p = metrics::budget_progress(&b);
    assert_eq!(p.percent, Decimal::from(80));
    assert_eq!(p.severity, Severity::Warning);
    assert_eq!(p.remaining, Decimal::from(80));
    assert!(!p.over_budget);

    let b = budget(400, 500, Uuid::new_v4());
    let p = metrics::budget_progress(&b);
    assert_eq!(p.percent, Decimal::from(100));
    assert_eq!(p.remaining, Decimal::from(-100));
    assert!(p.over_budget);
}

#[test]
fn spent_in_window_uses_inclusive_budget_dates() {
    let food = Uuid::new_v4();
    let b = budget(400, 0, food);
    let txs = [
        tx(TransactionKind::Expense, "10", food, date(2025, 3, 1)),
        tx(TransactionKind::Expense, "20", food, date(2025, 3, 31)),
        tx(TransactionKind::Expense, "40", food, date(2025, 4, 1)),
        tx(TransactionKind::Income, "80", food, date(2025, 3, 10)),
        tx(TransactionKind::Expense, "160", Uuid::new_v4(), date(2025, 3, 10)),
    ];
    assert_eq!(
        metrics::budget_spent_in_window(&b, txs.iter()),
        Decimal::from(30)
    );
}

#[test]
fn recent_transactions_newest_first() {
    let cat = Uuid::new_v4();
    let txs = [
        tx(TransactionKind::Expense, "1", cat, date(2025, 1, 1)),
        tx(TransactionKind::Expense, "2", cat, date(2025, 3, 1)),
        tx(TransactionKind::Expense, "3", cat, date(2025, 2, 1)),
    ];
    let refs: Vec<&Transaction> = txs.iter().collect();
    let recent = metrics::recent_transactions(&refs, 2);
    let dates: Vec<_> = recent.iter().map(|t| t.date).collect();
    assert_eq!(dates, [date(2025, 3, 1), date(2025, 2, 1)]);
}

#[test]
fn financial_summary_mixes_all_time_and_period_figures() {
    let cat = Uuid::new_v4();
    let txs = [
        tx(TransactionKind::Income, "500", cat, date(2025, 3, 2)),
        tx(TransactionKind::Income, "300", cat, date(2025, 2, 2)),
        tx(TransactionKind::Expense, "120", cat, date(2025, 3, 3)),
    ];
    let accounts = [account(380, true), account(20, false)];
    let tx_refs: Vec<&Transaction> = txs.iter().collect();
    let acct_refs: Vec<&Account> = accounts.iter().collect();
    let s = metrics::financial_summary(
        &tx_refs,
        &acct_refs,
        ReportWindow::month_to_date(date(2025, 3, 20)),
    );
    assert_eq!(s.period_income, Decimal::from(500));
    assert_eq!(s.period_expenses, Decimal::from(120));
    assert_eq!(s.period_balance, Decimal::from(380));
    assert_eq!(s.total_income, Decimal::from(800));
    assert_eq!(s.total_expenses, Decimal::from(120));
    assert_eq!(s.net_worth, Decimal::from(400));
}
