// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Failures raised by the ledger core.
///
/// Mutators apply their change in memory before writing through, so a
/// storage or encoding error means the durable copy is behind the in-memory
/// one. `BalanceOverflow` is raised before anything changes.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("could not encode ledger state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("balance of account {account} would overflow")]
    BalanceOverflow { account: uuid::Uuid },
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
