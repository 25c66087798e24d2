// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod metrics;
pub mod persistence;
pub mod store;
pub mod utils;
pub mod commands;

pub use error::LedgerError;
pub use persistence::{MemorySlot, Slot, SqliteSlot};
pub use store::{Ledger, LedgerState};
