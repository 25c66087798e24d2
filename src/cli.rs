// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn target(help: &'static str) -> Arg {
    Arg::new("id").required(true).help(help)
}

pub fn build_cli() -> Command {
    Command::new("financa")
        .about("Personal finance ledger: accounts, categories, budgets and reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINANCA_DB")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the SQLite database (default: platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Current user profile")
                .subcommand(
                    Command::new("login")
                        .about("Sign in, replacing any current user")
                        .arg(req("name", "Full name"))
                        .arg(req("email", "E-mail address"))
                        .arg(
                            opt("type", "individual|organization")
                                .default_value("individual"),
                        ),
                )
                .subcommand(json_flags(Command::new("show").about("Show the current user")))
                .subcommand(
                    Command::new("update")
                        .about("Edit the current user")
                        .arg(opt("name", "Full name"))
                        .arg(opt("email", "E-mail address"))
                        .arg(opt("type", "individual|organization")),
                )
                .subcommand(Command::new("logout").about("Sign out")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Account name"))
                        .arg(
                            opt("type", "checking|savings|credit|investment|cash")
                                .default_value("checking"),
                        )
                        .arg(opt("balance", "Opening balance").default_value("0"))
                        .arg(opt("currency", "Currency code (default: configured currency)"))
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue)
                                .help("Create the account as inactive"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(target("Account id or name"))
                        .arg(opt("name", "New name"))
                        .arg(opt("type", "checking|savings|credit|investment|cash"))
                        .arg(opt("balance", "Overwrite the balance"))
                        .arg(opt("currency", "Currency code"))
                        .arg(opt("active", "yes|no")),
                )
                .subcommand(Command::new("rm").arg(target("Account id or name"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Category name"))
                        .arg(opt("type", "income|expense|transfer").default_value("expense"))
                        .arg(opt("color", "Hex color").default_value("#6B7280"))
                        .arg(opt("icon", "Icon glyph").default_value("")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(opt("type", "income|expense|transfer")),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(target("Category id or name"))
                        .arg(opt("name", "New name"))
                        .arg(opt("type", "income|expense|transfer"))
                        .arg(opt("color", "Hex color"))
                        .arg(opt("icon", "Icon glyph")),
                )
                .subcommand(Command::new("rm").arg(target("Category id or name"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("description", "What the money was for"))
                        .arg(req("amount", "Positive amount"))
                        .arg(opt("type", "income|expense|transfer").default_value("expense"))
                        .arg(req("account", "Account id or name"))
                        .arg(req("category", "Category id or name"))
                        .arg(opt("date", "YYYY-MM-DD (default: today)"))
                        .arg(opt("notes", "Free-form notes")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("account", "Filter by account id or name"))
                        .arg(opt("category", "Filter by category id or name"))
                        .arg(opt("type", "income|expense|transfer"))
                        .arg(opt("search", "Case-insensitive match on description"))
                        .arg(opt("month", "YYYY-MM"))
                        .arg(opt("limit", "Max rows").value_parser(value_parser!(usize))),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction (account balances are not re-booked)")
                        .arg(target("Transaction id"))
                        .arg(opt("description", "Description"))
                        .arg(opt("amount", "Positive amount"))
                        .arg(opt("type", "income|expense|transfer"))
                        .arg(opt("account", "Account id or name"))
                        .arg(opt("category", "Category id or name"))
                        .arg(opt("date", "YYYY-MM-DD"))
                        .arg(opt("notes", "Notes (empty string clears)")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction (account balances are not reversed)")
                        .arg(target("Transaction id")),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budgets")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Budget name"))
                        .arg(req("amount", "Limit"))
                        .arg(req("category", "Expense category id or name"))
                        .arg(opt("period", "monthly|yearly").default_value("monthly"))
                        .arg(opt("start", "YYYY-MM-DD (default: today)"))
                        .arg(opt("end", "YYYY-MM-DD (default: last day of the period)"))
                        .arg(opt("spent", "Amount already spent").default_value("0")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(target("Budget id or name"))
                        .arg(opt("name", "New name"))
                        .arg(opt("amount", "Limit"))
                        .arg(opt("spent", "Amount spent so far"))
                        .arg(opt("category", "Expense category id or name"))
                        .arg(opt("period", "monthly|yearly"))
                        .arg(opt("start", "YYYY-MM-DD"))
                        .arg(opt("end", "YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(target("Budget id or name")))
                .subcommand(json_flags(
                    Command::new("status").about("Progress of every budget"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived reports")
                .subcommand(json_flags(
                    Command::new("summary")
                        .arg(opt("month", "YYYY-MM (default: current month to date)")),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .arg(opt("month", "YYYY-MM (default: all time)"))
                        .arg(opt("top", "Keep only the N largest").value_parser(value_parser!(usize))),
                ))
                .subcommand(json_flags(Command::new("balances")))
                .subcommand(json_flags(
                    Command::new("recent").arg(
                        opt("limit", "Max rows")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                )),
        )
        .subcommand(json_flags(
            Command::new("dashboard").about("Summary, top categories and recent activity"),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(req("format", "csv|json"))
                        .arg(req("out", "Output path")),
                )
                .subcommand(
                    Command::new("snapshot")
                        .about("Write the stored ledger document")
                        .arg(req("out", "Output path")),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Preferences")
                .subcommand(
                    Command::new("currency")
                        .about("Show or set the default currency for new accounts")
                        .arg(Arg::new("code").help("Currency code")),
                ),
        )
        .subcommand(json_flags(
            Command::new("doctor").about("Check references and cached budget totals"),
        ))
        .subcommand(
            Command::new("reset").about("Delete all data").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm deletion"),
            ),
        )
}
