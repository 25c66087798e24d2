// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Account, Budget, Category};
use crate::persistence::Slot;
use crate::store::Ledger;

pub const DEFAULT_CURRENCY: &str = "BRL";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Transaction and budget amounts are magnitudes; the sign comes from the type.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        bail!("Amount must be greater than zero, got '{}'", s.trim());
    }
    Ok(d)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(anyhow!("Invalid boolean '{}', expected yes|no", s)),
    }
}

/// Rejects blank input for a required field.
pub fn require_text(field: &str, value: Option<&String>) -> Result<String> {
    match value.map(|s| s.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(anyhow!("Please fill in all required fields: {}", field)),
    }
}

/// Trimmed optional input; blank counts as absent.
pub fn optional_text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

fn pick<'l, T>(
    what: &str,
    key: &str,
    mut matches: Vec<&'l T>,
    id: fn(&T) -> Uuid,
) -> Result<&'l T> {
    match matches.len() {
        0 => bail!("{} '{}' not found", what, key.trim()),
        1 => Ok(matches.remove(0)),
        _ => {
            let ids: Vec<String> = matches.iter().map(|&m| id(m).to_string()).collect();
            bail!(
                "{} name '{}' is ambiguous; use one of the ids: {}",
                what,
                key.trim(),
                ids.join(", ")
            )
        }
    }
}

pub fn resolve_account<'l, S: Slot>(ledger: &'l Ledger<S>, key: &str) -> Result<&'l Account> {
    pick("Account", key, ledger.accounts_matching(key), |a| a.id)
}

pub fn resolve_category<'l, S: Slot>(ledger: &'l Ledger<S>, key: &str) -> Result<&'l Category> {
    pick("Category", key, ledger.categories_matching(key), |c| c.id)
}

pub fn resolve_budget<'l, S: Slot>(ledger: &'l Ledger<S>, key: &str) -> Result<&'l Budget> {
    pick("Budget", key, ledger.budgets_matching(key), |b| b.id)
}

/// Fails when another record (other than `except`) already uses `name`.
pub fn ensure_unique_name<'a, I>(
    what: &str,
    name: &str,
    existing: I,
    except: Option<Uuid>,
) -> Result<()>
where
    I: IntoIterator<Item = (Uuid, &'a str)>,
{
    let taken = existing
        .into_iter()
        .any(|(id, n)| Some(id) != except && n.trim().eq_ignore_ascii_case(name.trim()));
    if taken {
        bail!("{} '{}' already exists", what, name.trim());
    }
    Ok(())
}

/// Three-letter currency code, upper-cased.
pub fn parse_currency(s: &str) -> Result<String> {
    let code = s.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid currency code '{}', expected three letters", s.trim());
    }
    Ok(code)
}

// Default currency for new accounts
pub fn get_default_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='default_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_default_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('default_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Owner id for new records; entities are only created while signed in.
pub fn current_user_id<S: Slot>(ledger: &Ledger<S>) -> Result<Uuid> {
    ledger
        .current_user()
        .map(|u| u.id)
        .context("No user signed in; run `financa user login --name .. --email ..` first")
}
