// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable home of the ledger document.
//!
//! The whole ledger is kept as one opaque JSON document under a single key.
//! There is no schema version and no partial-write recovery: a document that
//! fails to parse is discarded and the ledger starts empty.

use std::cell::RefCell;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;
use crate::store::LedgerState;

/// Key under which the ledger document is stored.
pub const LEDGER_SLOT: &str = "financa-storage";

/// A single durable key-value slot holding the serialized ledger.
pub trait Slot {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, document: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the document in the `settings` table of the SQLite database.
pub struct SqliteSlot<'c> {
    conn: &'c Connection,
    key: String,
}

impl<'c> SqliteSlot<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self::with_key(conn, LEDGER_SLOT)
    }

    pub fn with_key(conn: &'c Connection, key: &str) -> Self {
        Self {
            conn,
            key: key.to_string(),
        }
    }
}

impl Slot for SqliteSlot<'_> {
    fn load(&self) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![self.key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn save(&self, document: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![self.key, document],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key=?1", params![self.key])?;
        Ok(())
    }
}

/// In-process slot, used by tests and throwaway ledgers.
#[derive(Debug, Default)]
pub struct MemorySlot {
    document: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
        }
    }

    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl Slot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &str) -> Result<()> {
        *self.document.borrow_mut() = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.document.borrow_mut() = None;
        Ok(())
    }
}

pub fn encode(state: &LedgerState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Reads the slot, falling back to an empty ledger when the document is
/// missing, unreadable or does not parse.
pub fn restore<S: Slot>(slot: &S) -> LedgerState {
    let document = match slot.load() {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            tracing::debug!("no stored ledger, starting empty");
            return LedgerState::default();
        }
        Err(err) => {
            tracing::warn!("could not read stored ledger, starting empty: {err}");
            return LedgerState::default();
        }
    };
    match serde_json::from_str::<LedgerState>(&document) {
        Ok(state) => {
            tracing::debug!(
                transactions = state.transactions.len(),
                accounts = state.accounts.len(),
                categories = state.categories.len(),
                budgets = state.budgets.len(),
                "restored ledger"
            );
            state
        }
        Err(err) => {
            tracing::warn!("stored ledger is corrupt, starting empty: {err}");
            LedgerState::default()
        }
    }
}
