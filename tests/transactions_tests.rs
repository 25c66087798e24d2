// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use financa::commands::{accounts, categories, settings, transactions, users};
use financa::models::{AccountKind, NewAccount};
use financa::{Ledger, MemorySlot, cli, db};
use rust_decimal::Decimal;

fn run(ledger: &mut Ledger<MemorySlot>, args: &[&str]) -> anyhow::Result<()> {
    let conn = db::open_in_memory().unwrap();
    let mut argv = vec!["financa"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("user", m)) => users::handle(ledger, m),
        Some(("account", m)) => accounts::handle(ledger, &conn, m),
        Some(("category", m)) => categories::handle(ledger, m),
        Some(("tx", m)) => transactions::handle(ledger, m),
        Some(("config", m)) => settings::handle(&conn, m),
        _ => panic!("unexpected command {:?}", args),
    }
}

fn setup() -> Ledger<MemorySlot> {
    let mut ledger = Ledger::in_memory();
    run(&mut ledger, &["user", "login", "--name", "Ana", "--email", "ana@example.com"]).unwrap();
    run(&mut ledger, &["account", "add", "--name", "Checking", "--balance", "100"]).unwrap();
    run(&mut ledger, &["category", "add", "--name", "Groceries"]).unwrap();
    run(&mut ledger, &["category", "add", "--name", "Salary", "--type", "income"]).unwrap();
    for (i, amount) in ["10", "20", "30"].into_iter().enumerate() {
        let date = format!("2025-01-0{}", i + 1);
        run(
            &mut ledger,
            &[
                "tx", "add", "--description", "Market", "--amount", amount, "--account",
                "checking", "--category", "groceries", "--date", date.as_str(),
            ],
        )
        .unwrap();
    }
    ledger
}

fn list_rows(ledger: &Ledger<MemorySlot>, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["financa", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(ledger, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

#[test]
fn add_books_against_the_named_account() {
    let ledger = setup();
    let checking = ledger.find_account("Checking").unwrap();
    assert_eq!(checking.balance, Decimal::from(40));
    assert_eq!(checking.currency, "BRL");
}

#[test]
fn list_limit_respected_newest_first() {
    let ledger = setup();
    let rows = list_rows(&ledger, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].amount, "-30.00");
    assert_eq!(rows[0].category, "Groceries");
}

#[test]
fn list_filters_by_type_search_and_month() {
    let mut ledger = setup();
    run(
        &mut ledger,
        &[
            "tx", "add", "--description", "Payroll", "--amount", "500", "--type", "income",
            "--account", "Checking", "--category", "Salary", "--date", "2025-02-05",
        ],
    )
    .unwrap();

    let income = list_rows(&ledger, &["--type", "income"]);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].amount, "500.00");

    assert_eq!(list_rows(&ledger, &["--search", "MARK"]).len(), 3);
    assert_eq!(list_rows(&ledger, &["--month", "2025-02"]).len(), 1);
    assert_eq!(list_rows(&ledger, &["--category", "Groceries"]).len(), 3);
}

#[test]
fn blank_required_input_is_rejected_before_the_store() {
    let mut ledger = setup();
    let before = ledger.state().clone();
    let err = run(
        &mut ledger,
        &[
            "tx", "add", "--description", "  ", "--amount", "5", "--account", "Checking",
            "--category", "Groceries",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("required fields: description"));
    assert_eq!(&before, ledger.state());
}

#[test]
fn non_positive_amount_is_rejected() {
    let mut ledger = setup();
    let err = run(
        &mut ledger,
        &[
            "tx", "add", "--description", "Refund", "--amount=-5", "--account", "Checking",
            "--category", "Groceries",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("greater than zero"));
}

#[test]
fn unknown_account_is_reported() {
    let mut ledger = setup();
    let err = run(
        &mut ledger,
        &[
            "tx", "add", "--description", "Taxi", "--amount", "5", "--account", "Wallet",
            "--category", "Groceries",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Account 'Wallet' not found"));
}

#[test]
fn edit_and_rm_leave_the_balance_alone() {
    let mut ledger = setup();
    let id = list_rows(&ledger, &["--limit", "1"])[0].id.clone();
    run(&mut ledger, &["tx", "edit", id.as_str(), "--amount", "300", "--notes", "fixed"]).unwrap();
    let rows = list_rows(&ledger, &["--limit", "1"]);
    assert_eq!(rows[0].amount, "-300.00");
    assert_eq!(rows[0].notes, "fixed");
    assert_eq!(
        ledger.find_account("Checking").unwrap().balance,
        Decimal::from(40)
    );

    run(&mut ledger, &["tx", "rm", id.as_str()]).unwrap();
    assert_eq!(list_rows(&ledger, &[]).len(), 2);
    assert_eq!(
        ledger.find_account("Checking").unwrap().balance,
        Decimal::from(40)
    );
}

#[test]
fn creating_records_requires_a_signed_in_user() {
    let mut ledger = Ledger::in_memory();
    let err = run(&mut ledger, &["account", "add", "--name", "Checking"]).unwrap_err();
    assert!(err.to_string().contains("No user signed in"));
    assert_eq!(ledger.accounts().count(), 0);
}

#[test]
fn duplicate_account_and_category_names_are_rejected() {
    let mut ledger = setup();
    let err = run(&mut ledger, &["account", "add", "--name", " checking "]).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    let err = run(&mut ledger, &["category", "add", "--name", "GROCERIES"]).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    run(&mut ledger, &["account", "add", "--name", "Savings"]).unwrap();
    assert!(run(&mut ledger, &["account", "edit", "savings", "--name", "Checking"]).is_err());
    run(&mut ledger, &["account", "edit", "checking", "--name", "CHECKING"]).unwrap();
    assert_eq!(ledger.accounts().count(), 2);
}

#[test]
fn ambiguous_account_name_is_not_booked() {
    let mut ledger = setup();
    // Older documents may already hold two accounts with the same name.
    let twin = ledger
        .add_account(NewAccount {
            name: "Checking".into(),
            kind: AccountKind::Cash,
            balance: Decimal::ZERO,
            currency: "BRL".into(),
            user_id: uuid::Uuid::nil(),
            is_active: true,
        })
        .unwrap();
    let before = ledger.state().clone();
    let err = run(
        &mut ledger,
        &[
            "tx", "add", "--description", "Taxi", "--amount", "5", "--account", "checking",
            "--category", "Groceries",
        ],
    )
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("ambiguous"));
    assert!(msg.contains(&twin.id.to_string()));
    assert_eq!(&before, ledger.state());

    let twin_id = twin.id.to_string();
    run(
        &mut ledger,
        &[
            "tx", "add", "--description", "Taxi", "--amount", "5", "--account",
            twin_id.as_str(), "--category", "Groceries",
        ],
    )
    .unwrap();
    assert_eq!(ledger.account_balance(twin.id), Decimal::from(-5));
}

#[test]
fn currency_codes_are_checked_everywhere() {
    let mut ledger = setup();
    run(&mut ledger, &["account", "add", "--name", "Travel", "--currency", " usd "]).unwrap();
    assert_eq!(ledger.find_account("travel").unwrap().currency, "USD");

    assert!(run(&mut ledger, &["account", "add", "--name", "Odd", "--currency", "dollars"]).is_err());
    assert!(run(&mut ledger, &["account", "edit", "travel", "--currency", "U5D"]).is_err());
    assert_eq!(ledger.find_account("travel").unwrap().currency, "USD");
    assert!(ledger.find_account("odd").is_none());

    assert!(run(&mut ledger, &["config", "currency", "euro"]).is_err());
    run(&mut ledger, &["config", "currency", "eur"]).unwrap();
}
