// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_type::CowVec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{EncodedKey, interface::Transaction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadMode {
	/// Plain read; never blocks on row locks.
	Shared,
	/// Read-modify-write: takes the exclusive row lock for the transaction.
	Exclusive,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PutPolicy {
	Overwrite,
	/// Fail if the key already holds a value.
	NoOverwrite,
}

/// Static properties of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
	/// Store keeps several values per key.
	pub duplicates: bool,
	pub read_only: bool,
	/// Writes are logged and replicated.
	pub durable: bool,
	/// Operations without a caller transaction run in an implicit one.
	pub transactional: bool,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			duplicates: false,
			read_only: false,
			durable: true,
			transactional: true,
		}
	}
}

pub trait SingleVersionStore: Send + Sync {
	type Transaction: Transaction;

	fn config(&self) -> &StoreConfig;

	/// False when this node may not write, e.g. a replication follower of a
	/// durable store.
	fn may_write(&self) -> bool;

	fn begin(&self) -> crate::Result<Self::Transaction>;

	fn get(
		&self,
		txn: Option<&mut Self::Transaction>,
		key: &EncodedKey,
		mode: ReadMode,
	) -> crate::Result<Option<CowVec<u8>>>;

	fn put(
		&self,
		txn: Option<&mut Self::Transaction>,
		key: &EncodedKey,
		value: CowVec<u8>,
		policy: PutPolicy,
	) -> crate::Result<()>;

	fn delete(&self, txn: Option<&mut Self::Transaction>, key: &EncodedKey) -> crate::Result<()>;

	/// Runs `f` in a fresh transaction, committing on success and aborting on
	/// failure.
	fn with_transaction<F, R>(&self, f: F) -> crate::Result<R>
	where
		F: FnOnce(&mut Self::Transaction) -> crate::Result<R>,
		Self: Sized,
	{
		let mut txn = self.begin()?;
		match f(&mut txn) {
			Ok(result) => {
				txn.commit()?;
				Ok(result)
			}
			Err(err) => {
				let id = txn.id();
				if let Err(abort) = txn.abort() {
					warn!(txn = %id, error = %abort.code, "abort after failure did not succeed");
				}
				Err(err)
			}
		}
	}
}
