// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a kind/period label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {what} '{value}', expected one of: {expected}")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
    expected: String,
}

macro_rules! labelled_enum {
    ($name:ident, $what:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseKindError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err(ParseKindError {
                        what: $what,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|k| k.as_str())
                            .collect::<Vec<_>>()
                            .join("|"),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Individual,
    Organization,
}

labelled_enum!(UserKind, "user type", {
    Individual => "individual",
    Organization => "organization",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Investment,
    Cash,
}

labelled_enum!(AccountKind, "account type", {
    Checking => "checking",
    Savings => "savings",
    Credit => "credit",
    Investment => "investment",
    Cash => "cash",
});

/// Shared by transactions and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

labelled_enum!(TransactionKind, "transaction type", {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

impl TransactionKind {
    /// Effect of an amount of this kind on the account it is booked against.
    /// Everything that is not income debits the account.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense | TransactionKind::Transfer => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Yearly,
}

labelled_enum!(BudgetPeriod, "budget period", {
    Monthly => "monthly",
    Yearly => "yearly",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: UserKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: Decimal,
    pub currency: String,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

impl Category {
    pub fn display_color(&self) -> &str {
        if self.color.trim().is_empty() {
            DEFAULT_CATEGORY_COLOR
        } else {
            &self.color
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    /// Cached; only changed by an explicit edit.
    pub spent: Decimal,
    pub category_id: Uuid,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Creation inputs: everything except id and timestamps.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub kind: UserKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub currency: String,
    pub user_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub kind: TransactionKind,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudget {
    pub name: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub category_id: Uuid,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Uuid,
}

// Partial updates. `None` leaves a field untouched; for optional fields the
// inner `None` clears the value.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub kind: Option<UserKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub kind: Option<TransactionKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub spent: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl User {
    pub fn new(fields: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            kind: fields.kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.kind, patch.kind);
        self.updated_at = now;
    }
}

impl Account {
    pub fn new(fields: NewAccount, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            kind: fields.kind,
            balance: fields.balance,
            currency: fields.currency,
            user_id: fields.user_id,
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: AccountPatch, now: DateTime<Utc>) {
        merge(&mut self.name, patch.name);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.balance, patch.balance);
        merge(&mut self.currency, patch.currency);
        merge(&mut self.is_active, patch.is_active);
        self.updated_at = now;
    }
}

impl Category {
    pub fn new(fields: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            color: fields.color,
            icon: fields.icon,
            kind: fields.kind,
            user_id: fields.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: CategoryPatch, now: DateTime<Utc>) {
        merge(&mut self.name, patch.name);
        merge(&mut self.color, patch.color);
        merge(&mut self.icon, patch.icon);
        merge(&mut self.kind, patch.kind);
        self.updated_at = now;
    }
}

impl Transaction {
    pub fn new(fields: NewTransaction, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: fields.description,
            amount: fields.amount,
            kind: fields.kind,
            category_id: fields.category_id,
            account_id: fields.account_id,
            date: fields.date,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: TransactionPatch, now: DateTime<Utc>) {
        merge(&mut self.description, patch.description);
        merge(&mut self.amount, patch.amount);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.category_id, patch.category_id);
        merge(&mut self.account_id, patch.account_id);
        merge(&mut self.date, patch.date);
        merge(&mut self.notes, patch.notes);
        self.updated_at = now;
    }
}

impl Budget {
    pub fn new(fields: NewBudget, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            amount: fields.amount,
            spent: fields.spent,
            category_id: fields.category_id,
            period: fields.period,
            start_date: fields.start_date,
            end_date: fields.end_date,
            user_id: fields.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: BudgetPatch, now: DateTime<Utc>) {
        merge(&mut self.name, patch.name);
        merge(&mut self.amount, patch.amount);
        merge(&mut self.spent, patch.spent);
        merge(&mut self.category_id, patch.category_id);
        merge(&mut self.period, patch.period);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
        self.updated_at = now;
    }
}
