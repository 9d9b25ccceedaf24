// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, mem};

use keyseq_core::{
	CowVec, EncodedKey,
	interface::{Transaction, TransactionId},
};
use tracing::{debug, trace};

use crate::memory::MemoryStore;

/// Buffers writes until commit and owns the row locks it took.
pub struct MemoryTransaction {
	id: TransactionId,
	store: MemoryStore,
	pending: BTreeMap<EncodedKey, Option<CowVec<u8>>>,
	locked: Vec<EncodedKey>,
	resolved: bool,
}

impl MemoryTransaction {
	pub(crate) fn new(store: MemoryStore, id: TransactionId) -> Self {
		Self {
			id,
			store,
			pending: BTreeMap::new(),
			locked: Vec::new(),
			resolved: false,
		}
	}

	pub(crate) fn lock(&mut self, key: &EncodedKey) -> crate::Result<()> {
		if self.store.locks.acquire(key, self.id, self.store.config.lock_timeout)? {
			self.locked.push(key.clone());
		}
		Ok(())
	}

	/// The value this transaction sees for `key`: its own pending write, or
	/// the committed value.
	pub(crate) fn visible(&self, key: &EncodedKey) -> Option<CowVec<u8>> {
		match self.pending.get(key) {
			Some(pending) => pending.clone(),
			None => self.store.committed(key),
		}
	}

	pub(crate) fn stage(&mut self, key: &EncodedKey, value: Option<CowVec<u8>>) {
		self.pending.insert(key.clone(), value);
	}

	pub fn is_locked(&self, key: &EncodedKey) -> bool {
		self.locked.contains(key)
	}

	fn release(&mut self) {
		self.store.locks.release(&self.locked, self.id);
		self.locked.clear();
		self.resolved = true;
	}
}

impl Transaction for MemoryTransaction {
	fn id(&self) -> TransactionId {
		self.id
	}

	fn commit(mut self) -> crate::Result<()> {
		let pending = mem::take(&mut self.pending);
		let writes = pending.len();
		{
			let _guard = self.store.commit_lock.write();
			for (key, value) in pending {
				match value {
					Some(value) => {
						self.store.data.insert(key, value);
					}
					None => {
						self.store.data.remove(&key);
					}
				}
			}
		}
		debug!(txn = %self.id, writes, "commit");
		self.release();
		Ok(())
	}

	fn abort(mut self) -> crate::Result<()> {
		debug!(txn = %self.id, discarded = self.pending.len(), "abort");
		self.pending.clear();
		self.release();
		Ok(())
	}
}

impl Drop for MemoryTransaction {
	fn drop(&mut self) {
		if !self.resolved {
			trace!(txn = %self.id, "dropped unresolved, aborting");
			self.release();
		}
	}
}
