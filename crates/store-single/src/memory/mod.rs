// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ops::Deref,
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	time::Duration,
};

use crossbeam_skiplist::SkipMap;
use keyseq_core::{
	CowVec, EncodedKey, err,
	interface::{PutPolicy, ReadMode, SingleVersionStore, StoreConfig, Transaction, TransactionId},
};
use keyseq_type::error::diagnostic::store::{key_exists, key_not_found, store_read_only};
use parking_lot::RwLock;
use tracing::{debug, instrument};

mod lock;
mod transaction;

use lock::LockTable;
pub use transaction::MemoryTransaction;

#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
	pub store: StoreConfig,
	/// Longest a transaction waits for a row lock; `None` waits forever.
	pub lock_timeout: Option<Duration>,
}

impl Default for MemoryStoreConfig {
	fn default() -> Self {
		Self {
			store: StoreConfig::default(),
			lock_timeout: Some(Duration::from_secs(5)),
		}
	}
}

#[derive(Clone)]
pub struct MemoryStore(Arc<MemoryStoreInner>);

pub struct MemoryStoreInner {
	config: MemoryStoreConfig,
	data: SkipMap<EncodedKey, CowVec<u8>>,
	commit_lock: RwLock<()>,
	locks: LockTable,
	next_txn: AtomicU64,
	follower: AtomicBool,
}

impl Deref for MemoryStore {
	type Target = MemoryStoreInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::with_config(MemoryStoreConfig::default())
	}

	pub fn with_config(config: MemoryStoreConfig) -> Self {
		Self(Arc::new(MemoryStoreInner {
			config,
			data: SkipMap::new(),
			commit_lock: RwLock::new(()),
			locks: LockTable::default(),
			next_txn: AtomicU64::new(0),
			follower: AtomicBool::new(false),
		}))
	}

	/// Marks this node as a replication follower. Followers of a durable
	/// store lose write capability.
	pub fn set_replication_follower(&self, follower: bool) {
		debug!(follower, "replication role changed");
		self.follower.store(follower, Ordering::Release);
	}

	pub fn is_replication_follower(&self) -> bool {
		self.follower.load(Ordering::Acquire)
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub(crate) fn committed(&self, key: &EncodedKey) -> Option<CowVec<u8>> {
		let _guard = self.commit_lock.read();
		self.data.get(key).map(|entry| entry.value().clone())
	}

	fn check_writable(&self, operation: &str) -> crate::Result<()> {
		if self.config.store.read_only {
			return err!(store_read_only(operation));
		}
		Ok(())
	}

	fn put_in(
		&self,
		txn: &mut MemoryTransaction,
		key: &EncodedKey,
		value: CowVec<u8>,
		policy: PutPolicy,
	) -> crate::Result<()> {
		txn.lock(key)?;
		if policy == PutPolicy::NoOverwrite && txn.visible(key).is_some() {
			return err!(key_exists(key.to_string()));
		}
		txn.stage(key, Some(value));
		Ok(())
	}

	fn delete_in(&self, txn: &mut MemoryTransaction, key: &EncodedKey) -> crate::Result<()> {
		txn.lock(key)?;
		if txn.visible(key).is_none() {
			return err!(key_not_found(key.to_string()));
		}
		txn.stage(key, None);
		Ok(())
	}
}

impl SingleVersionStore for MemoryStore {
	type Transaction = MemoryTransaction;

	fn config(&self) -> &StoreConfig {
		&self.config.store
	}

	fn may_write(&self) -> bool {
		!(self.is_replication_follower() && self.config.store.durable)
	}

	fn begin(&self) -> crate::Result<MemoryTransaction> {
		let id = TransactionId(self.next_txn.fetch_add(1, Ordering::Relaxed) + 1);
		Ok(MemoryTransaction::new(self.clone(), id))
	}

	#[instrument(name = "store::get", level = "trace", skip(self, txn, key), fields(key = %key))]
	fn get(
		&self,
		txn: Option<&mut MemoryTransaction>,
		key: &EncodedKey,
		mode: ReadMode,
	) -> crate::Result<Option<CowVec<u8>>> {
		match txn {
			Some(txn) => {
				if mode == ReadMode::Exclusive {
					txn.lock(key)?;
				}
				Ok(txn.visible(key))
			}
			None => Ok(self.committed(key)),
		}
	}

	#[instrument(name = "store::put", level = "trace", skip(self, txn, key, value), fields(key = %key))]
	fn put(
		&self,
		txn: Option<&mut MemoryTransaction>,
		key: &EncodedKey,
		value: CowVec<u8>,
		policy: PutPolicy,
	) -> crate::Result<()> {
		self.check_writable("put")?;
		match txn {
			Some(txn) => self.put_in(txn, key, value, policy),
			None => {
				let mut txn = self.begin()?;
				self.put_in(&mut txn, key, value, policy)?;
				txn.commit()
			}
		}
	}

	#[instrument(name = "store::delete", level = "trace", skip(self, txn, key), fields(key = %key))]
	fn delete(&self, txn: Option<&mut MemoryTransaction>, key: &EncodedKey) -> crate::Result<()> {
		self.check_writable("delete")?;
		match txn {
			Some(txn) => self.delete_in(txn, key),
			None => {
				let mut txn = self.begin()?;
				self.delete_in(&mut txn, key)?;
				txn.commit()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use keyseq_core::{
		CowVec, EncodedKey,
		interface::{PutPolicy, ReadMode, SingleVersionStore, StoreConfig, Transaction},
	};

	use super::{MemoryStore, MemoryStoreConfig};

	fn value(bytes: &[u8]) -> CowVec<u8> {
		CowVec::new(bytes.to_vec())
	}

	fn short_timeout() -> MemoryStore {
		MemoryStore::with_config(MemoryStoreConfig {
			lock_timeout: Some(Duration::from_millis(20)),
			..Default::default()
		})
	}

	#[test]
	fn test_put_get_delete() {
		let store = MemoryStore::new();
		let key = EncodedKey::from("a");

		store.put(None, &key, value(b"1"), PutPolicy::Overwrite).unwrap();
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), Some(value(b"1")));

		store.delete(None, &key).unwrap();
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), None);
		assert!(store.is_empty());
	}

	#[test]
	fn test_no_overwrite_rejects_existing() {
		let store = MemoryStore::new();
		let key = EncodedKey::from("a");

		store.put(None, &key, value(b"1"), PutPolicy::NoOverwrite).unwrap();
		let err = store.put(None, &key, value(b"2"), PutPolicy::NoOverwrite).unwrap_err();
		assert_eq!(err.code, "STORE_001");
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), Some(value(b"1")));
	}

	#[test]
	fn test_delete_missing_key() {
		let store = MemoryStore::new();
		let err = store.delete(None, &EncodedKey::from("missing")).unwrap_err();
		assert_eq!(err.code, "STORE_002");
	}

	#[test]
	fn test_uncommitted_writes_are_private() {
		let store = MemoryStore::new();
		let key = EncodedKey::from("a");

		let mut txn = store.begin().unwrap();
		store.put(Some(&mut txn), &key, value(b"1"), PutPolicy::Overwrite).unwrap();

		assert_eq!(store.get(Some(&mut txn), &key, ReadMode::Shared).unwrap(), Some(value(b"1")));
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), None);

		txn.commit().unwrap();
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), Some(value(b"1")));
	}

	#[test]
	fn test_abort_discards_writes() {
		let store = MemoryStore::new();
		let key = EncodedKey::from("a");

		let mut txn = store.begin().unwrap();
		store.put(Some(&mut txn), &key, value(b"1"), PutPolicy::Overwrite).unwrap();
		txn.abort().unwrap();

		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), None);
	}

	#[test]
	fn test_exclusive_read_blocks_other_writers() {
		let store = short_timeout();
		let key = EncodedKey::from("a");
		store.put(None, &key, value(b"1"), PutPolicy::Overwrite).unwrap();

		let mut holder = store.begin().unwrap();
		store.get(Some(&mut holder), &key, ReadMode::Exclusive).unwrap();
		assert!(holder.is_locked(&key));

		let err = store.put(None, &key, value(b"2"), PutPolicy::Overwrite).unwrap_err();
		assert_eq!(err.code, "TXN_001");

		// shared reads never block
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), Some(value(b"1")));

		drop(holder);
		store.put(None, &key, value(b"2"), PutPolicy::Overwrite).unwrap();
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), Some(value(b"2")));
	}

	#[test]
	fn test_read_only_store_rejects_writes() {
		let store = MemoryStore::with_config(MemoryStoreConfig {
			store: StoreConfig {
				read_only: true,
				..Default::default()
			},
			..Default::default()
		});

		let err = store.put(None, &EncodedKey::from("a"), value(b"1"), PutPolicy::Overwrite).unwrap_err();
		assert_eq!(err.code, "STORE_003");
	}

	#[test]
	fn test_may_write_follows_replication_role() {
		let store = MemoryStore::new();
		assert!(store.may_write());

		store.set_replication_follower(true);
		assert!(!store.may_write());

		let not_durable = MemoryStore::with_config(MemoryStoreConfig {
			store: StoreConfig {
				durable: false,
				..Default::default()
			},
			..Default::default()
		});
		not_durable.set_replication_follower(true);
		assert!(not_durable.may_write());
	}

	#[test]
	fn test_with_transaction_aborts_on_error() {
		let store = MemoryStore::new();
		let key = EncodedKey::from("a");

		let result: keyseq_core::Result<()> = store.with_transaction(|txn| {
			store.put(Some(&mut *txn), &key, value(b"1"), PutPolicy::Overwrite)?;
			store.delete(Some(txn), &EncodedKey::from("missing"))
		});

		assert_eq!(result.unwrap_err().code, "STORE_002");
		assert_eq!(store.get(None, &key, ReadMode::Shared).unwrap(), None);
	}
}
