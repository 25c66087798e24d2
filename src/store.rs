// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger store: single owner of the current user and the entity
//! collections.
//!
//! Every mutator changes the in-memory state first and then writes the whole
//! state through to the injected [`Slot`]. Updates and deletes of unknown ids
//! are no-ops and skip the write.
//!
//! Account balances are adjusted only when a transaction is added. Editing
//! or deleting a transaction leaves the balance as it is, so balances and
//! transaction history can drift apart; `doctor` reports the related
//! problems it can detect.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::metrics;
use crate::models::{
    Account, AccountPatch, Budget, BudgetPatch, Category, CategoryPatch, NewAccount, NewBudget,
    NewCategory, NewTransaction, NewUser, Transaction, TransactionPatch, User, UserPatch,
};
use crate::persistence::{self, MemorySlot, Slot};

pub const CATEGORY_NOT_FOUND: &str = "(category not found)";
pub const ACCOUNT_NOT_FOUND: &str = "(account not found)";

/// Everything the ledger persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(default)]
    pub current_user: Option<User>,
    #[serde(default)]
    pub transactions: BTreeMap<Uuid, Transaction>,
    #[serde(default)]
    pub categories: BTreeMap<Uuid, Category>,
    #[serde(default)]
    pub accounts: BTreeMap<Uuid, Account>,
    #[serde(default)]
    pub budgets: BTreeMap<Uuid, Budget>,
}

pub struct Ledger<S: Slot> {
    state: LedgerState,
    slot: S,
}

impl Ledger<MemorySlot> {
    pub fn in_memory() -> Self {
        Self::load(MemorySlot::new())
    }
}

impl<S: Slot> Ledger<S> {
    /// Restores the ledger from `slot`, starting empty when nothing usable is
    /// stored there.
    pub fn load(slot: S) -> Self {
        let state = persistence::restore(&slot);
        Self { state, slot }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    fn persist(&self) -> Result<()> {
        let document = persistence::encode(&self.state)?;
        self.slot.save(&document)
    }

    /// Drops all data, both in memory and in the slot.
    pub fn reset(&mut self) -> Result<()> {
        self.state = LedgerState::default();
        self.slot.clear()?;
        tracing::info!("ledger reset");
        Ok(())
    }

    // User

    pub fn current_user(&self) -> Option<&User> {
        self.state.current_user.as_ref()
    }

    /// Replaces the current user wholesale. Entity owner ids are not checked.
    pub fn set_current_user(&mut self, user: Option<User>) -> Result<()> {
        match &user {
            Some(u) => tracing::debug!(user = %u.id, "current user set"),
            None => tracing::debug!("current user cleared"),
        }
        self.state.current_user = user;
        self.persist()
    }

    pub fn sign_in(&mut self, fields: NewUser) -> Result<User> {
        let user = User::new(fields, Utc::now());
        self.set_current_user(Some(user.clone()))?;
        Ok(user)
    }

    pub fn update_current_user(&mut self, patch: UserPatch) -> Result<bool> {
        let Some(user) = self.state.current_user.as_mut() else {
            return Ok(false);
        };
        user.apply(patch, Utc::now());
        self.persist()?;
        Ok(true)
    }

    // Transactions

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.state.transactions.values()
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.state.transactions.get(&id)
    }

    /// Records a transaction and books it against its account: income credits
    /// the account, every other kind debits it. An unknown account is skipped
    /// without error. A booking that would overflow the balance is rejected
    /// and nothing is recorded.
    pub fn add_transaction(&mut self, fields: NewTransaction) -> Result<Transaction> {
        let now = Utc::now();
        let tx = Transaction::new(fields, now);

        let booked = match self.state.accounts.get(&tx.account_id) {
            Some(account) => Some(
                account
                    .balance
                    .checked_add(tx.signed_amount())
                    .ok_or(LedgerError::BalanceOverflow {
                        account: account.id,
                    })?,
            ),
            None => None,
        };

        self.state.transactions.insert(tx.id, tx.clone());
        match (self.state.accounts.get_mut(&tx.account_id), booked) {
            (Some(account), Some(balance)) => {
                account.balance = balance;
                account.updated_at = now;
                tracing::debug!(
                    transaction = %tx.id,
                    account = %account.id,
                    balance = %account.balance,
                    "transaction booked"
                );
            }
            _ => {
                tracing::debug!(
                    transaction = %tx.id,
                    account = %tx.account_id,
                    "transaction references unknown account, balance untouched"
                );
            }
        }

        self.persist()?;
        Ok(tx)
    }

    /// Merges `patch` into the transaction. The account balance is not
    /// re-booked, even when amount, type or account change.
    pub fn update_transaction(&mut self, id: Uuid, patch: TransactionPatch) -> Result<bool> {
        let Some(tx) = self.state.transactions.get_mut(&id) else {
            return Ok(false);
        };
        tx.apply(patch, Utc::now());
        tracing::debug!(transaction = %id, "transaction updated");
        self.persist()?;
        Ok(true)
    }

    /// Removes the transaction. Its effect on the account balance stays.
    pub fn delete_transaction(&mut self, id: Uuid) -> Result<Option<Transaction>> {
        let removed = self.state.transactions.remove(&id);
        if removed.is_some() {
            tracing::debug!(transaction = %id, "transaction deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn transactions_by_account(&self, account_id: Uuid) -> Vec<&Transaction> {
        self.transactions()
            .filter(|t| t.account_id == account_id)
            .collect()
    }

    pub fn transactions_by_category(&self, category_id: Uuid) -> Vec<&Transaction> {
        self.transactions()
            .filter(|t| t.category_id == category_id)
            .collect()
    }

    // Accounts

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.state.accounts.values()
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.state.accounts.get(&id)
    }

    pub fn add_account(&mut self, fields: NewAccount) -> Result<Account> {
        let account = Account::new(fields, Utc::now());
        self.state.accounts.insert(account.id, account.clone());
        tracing::debug!(account = %account.id, "account added");
        self.persist()?;
        Ok(account)
    }

    pub fn update_account(&mut self, id: Uuid, patch: AccountPatch) -> Result<bool> {
        let Some(account) = self.state.accounts.get_mut(&id) else {
            return Ok(false);
        };
        account.apply(patch, Utc::now());
        tracing::debug!(account = %id, "account updated");
        self.persist()?;
        Ok(true)
    }

    /// Removes the account only; transactions that reference it are kept.
    pub fn delete_account(&mut self, id: Uuid) -> Result<Option<Account>> {
        let removed = self.state.accounts.remove(&id);
        if removed.is_some() {
            tracing::debug!(account = %id, "account deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn account_balance(&self, id: Uuid) -> Decimal {
        self.account(id).map(|a| a.balance).unwrap_or(Decimal::ZERO)
    }

    pub fn total_balance(&self) -> Decimal {
        metrics::net_worth(self.accounts())
    }

    // Categories

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.state.categories.values()
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.state.categories.get(&id)
    }

    pub fn add_category(&mut self, fields: NewCategory) -> Result<Category> {
        let category = Category::new(fields, Utc::now());
        self.state.categories.insert(category.id, category.clone());
        tracing::debug!(category = %category.id, "category added");
        self.persist()?;
        Ok(category)
    }

    pub fn update_category(&mut self, id: Uuid, patch: CategoryPatch) -> Result<bool> {
        let Some(category) = self.state.categories.get_mut(&id) else {
            return Ok(false);
        };
        category.apply(patch, Utc::now());
        tracing::debug!(category = %id, "category updated");
        self.persist()?;
        Ok(true)
    }

    /// Removes the category only; transactions and budgets keep the id.
    pub fn delete_category(&mut self, id: Uuid) -> Result<Option<Category>> {
        let removed = self.state.categories.remove(&id);
        if removed.is_some() {
            tracing::debug!(category = %id, "category deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    // Budgets

    pub fn budgets(&self) -> impl Iterator<Item = &Budget> {
        self.state.budgets.values()
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.state.budgets.get(&id)
    }

    pub fn add_budget(&mut self, fields: NewBudget) -> Result<Budget> {
        let budget = Budget::new(fields, Utc::now());
        self.state.budgets.insert(budget.id, budget.clone());
        tracing::debug!(budget = %budget.id, "budget added");
        self.persist()?;
        Ok(budget)
    }

    pub fn update_budget(&mut self, id: Uuid, patch: BudgetPatch) -> Result<bool> {
        let Some(budget) = self.state.budgets.get_mut(&id) else {
            return Ok(false);
        };
        budget.apply(patch, Utc::now());
        tracing::debug!(budget = %id, "budget updated");
        self.persist()?;
        Ok(true)
    }

    pub fn delete_budget(&mut self, id: Uuid) -> Result<Option<Budget>> {
        let removed = self.state.budgets.remove(&id);
        if removed.is_some() {
            tracing::debug!(budget = %id, "budget deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    // Lookups by id or name, for the command line. Names are compared
    // case-insensitively and need not be unique; the `find_*` helpers only
    // answer when exactly one entity matches.

    pub fn accounts_matching(&self, key: &str) -> Vec<&Account> {
        let key = key.trim();
        match key.parse::<Uuid>() {
            Ok(id) => self.account(id).into_iter().collect(),
            Err(_) => self
                .accounts()
                .filter(|a| a.name.trim().eq_ignore_ascii_case(key))
                .collect(),
        }
    }

    pub fn categories_matching(&self, key: &str) -> Vec<&Category> {
        let key = key.trim();
        match key.parse::<Uuid>() {
            Ok(id) => self.category(id).into_iter().collect(),
            Err(_) => self
                .categories()
                .filter(|c| c.name.trim().eq_ignore_ascii_case(key))
                .collect(),
        }
    }

    pub fn budgets_matching(&self, key: &str) -> Vec<&Budget> {
        let key = key.trim();
        match key.parse::<Uuid>() {
            Ok(id) => self.budget(id).into_iter().collect(),
            Err(_) => self
                .budgets()
                .filter(|b| b.name.trim().eq_ignore_ascii_case(key))
                .collect(),
        }
    }

    pub fn find_account(&self, key: &str) -> Option<&Account> {
        single(self.accounts_matching(key))
    }

    pub fn find_category(&self, key: &str) -> Option<&Category> {
        single(self.categories_matching(key))
    }

    pub fn find_budget(&self, key: &str) -> Option<&Budget> {
        single(self.budgets_matching(key))
    }

    pub fn category_name(&self, id: Uuid) -> &str {
        self.category(id)
            .map(|c| c.name.as_str())
            .unwrap_or(CATEGORY_NOT_FOUND)
    }

    pub fn account_name(&self, id: Uuid) -> &str {
        self.account(id)
            .map(|a| a.name.as_str())
            .unwrap_or(ACCOUNT_NOT_FOUND)
    }
}

fn single<T>(mut matches: Vec<&T>) -> Option<&T> {
    if matches.len() == 1 {
        matches.pop()
    } else {
        None
    }
}
