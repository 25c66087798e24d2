// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use financa::metrics::{self, ReportWindow};
use financa::models::{
    AccountKind, NewAccount, NewCategory, NewTransaction, NewUser, Transaction,
    TransactionKind, UserKind,
};
use financa::Ledger;
use rust_decimal::Decimal;

#[test]
fn salary_and_groceries_month() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
    let mut ledger = Ledger::in_memory();
    let user = ledger
        .sign_in(NewUser {
            name: "Bruno".into(),
            email: "bruno@example.com".into(),
            kind: UserKind::Individual,
        })
        .unwrap();
    let checking = ledger
        .add_account(NewAccount {
            name: "Checking".into(),
            kind: AccountKind::Checking,
            balance: Decimal::ZERO,
            currency: "BRL".into(),
            user_id: user.id,
            is_active: true,
        })
        .unwrap();
    let salary = ledger
        .add_category(NewCategory {
            name: "Salary".into(),
            color: "#22c55e".into(),
            icon: "$".into(),
            kind: TransactionKind::Income,
            user_id: user.id,
        })
        .unwrap();
    let groceries = ledger
        .add_category(NewCategory {
            name: "Groceries".into(),
            color: "#ef4444".into(),
            icon: "#".into(),
            kind: TransactionKind::Expense,
            user_id: user.id,
        })
        .unwrap();

    ledger
        .add_transaction(NewTransaction {
            description: "June salary".into(),
            amount: Decimal::from(500),
            kind: TransactionKind::Income,
            category_id: salary.id,
            account_id: checking.id,
            date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            notes: None,
        })
        .unwrap();
    ledger
        .add_transaction(NewTransaction {
            description: "Market".into(),
            amount: Decimal::from(120),
            kind: TransactionKind::Expense,
            category_id: groceries.id,
            account_id: checking.id,
            date: today,
            notes: Some("weekly".into()),
        })
        .unwrap();

    let window = ReportWindow::month_to_date(today);
    let txs: Vec<&Transaction> = ledger.transactions().collect();
    assert_eq!(ledger.account_balance(checking.id), Decimal::from(380));
    assert_eq!(
        metrics::period_income(txs.iter().copied(), window),
        Decimal::from(500)
    );
    assert_eq!(
        metrics::period_expenses(txs.iter().copied(), window),
        Decimal::from(120)
    );
    assert_eq!(metrics::net_worth(ledger.accounts()), Decimal::from(380));

    let cats: Vec<_> = ledger.categories().collect();
    let breakdown = metrics::category_breakdown(&cats, &txs);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].name, "Groceries");
    assert_eq!(breakdown[0].total, Decimal::from(120));
}
