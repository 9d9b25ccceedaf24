// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod store;
mod transaction;

pub use store::{PutPolicy, ReadMode, SingleVersionStore, StoreConfig};
pub use transaction::{Resolution, Transaction, TransactionId};
