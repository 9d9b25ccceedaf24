// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use keyseq_core::{
	CowVec, EncodedKey, err,
	interface::{PutPolicy, ReadMode, SingleVersionStore, StoreConfig},
};
use keyseq_type::error::diagnostic::store::io_failed;
use tracing::debug;

#[derive(Debug, Default)]
struct Counters {
	gets: AtomicUsize,
	puts: AtomicUsize,
	deletes: AtomicUsize,
	failing_puts: AtomicUsize,
}

/// Wraps a store, counting round trips and failing puts on request.
///
/// Clones share their counters.
pub struct InstrumentedStore<S> {
	inner: S,
	counters: Arc<Counters>,
}

impl<S: Clone> Clone for InstrumentedStore<S> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			counters: self.counters.clone(),
		}
	}
}

impl<S> InstrumentedStore<S> {
	pub fn new(inner: S) -> Self {
		Self {
			inner,
			counters: Arc::new(Counters::default()),
		}
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn gets(&self) -> usize {
		self.counters.gets.load(Ordering::SeqCst)
	}

	pub fn puts(&self) -> usize {
		self.counters.puts.load(Ordering::SeqCst)
	}

	pub fn deletes(&self) -> usize {
		self.counters.deletes.load(Ordering::SeqCst)
	}

	/// Total number of store operations issued.
	pub fn round_trips(&self) -> usize {
		self.gets() + self.puts() + self.deletes()
	}

	pub fn reset(&self) {
		self.counters.gets.store(0, Ordering::SeqCst);
		self.counters.puts.store(0, Ordering::SeqCst);
		self.counters.deletes.store(0, Ordering::SeqCst);
	}

	/// The next `n` puts fail without reaching the wrapped store.
	pub fn fail_next_puts(&self, n: usize) {
		self.counters.failing_puts.store(n, Ordering::SeqCst);
	}

	fn take_put_failure(&self) -> bool {
		self.counters
			.failing_puts
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok()
	}
}

impl<S: SingleVersionStore> SingleVersionStore for InstrumentedStore<S> {
	type Transaction = S::Transaction;

	fn config(&self) -> &StoreConfig {
		self.inner.config()
	}

	fn may_write(&self) -> bool {
		self.inner.may_write()
	}

	fn begin(&self) -> keyseq_core::Result<Self::Transaction> {
		self.inner.begin()
	}

	fn get(
		&self,
		txn: Option<&mut Self::Transaction>,
		key: &EncodedKey,
		mode: ReadMode,
	) -> keyseq_core::Result<Option<CowVec<u8>>> {
		self.counters.gets.fetch_add(1, Ordering::SeqCst);
		self.inner.get(txn, key, mode)
	}

	fn put(
		&self,
		txn: Option<&mut Self::Transaction>,
		key: &EncodedKey,
		value: CowVec<u8>,
		policy: PutPolicy,
	) -> keyseq_core::Result<()> {
		self.counters.puts.fetch_add(1, Ordering::SeqCst);
		if self.take_put_failure() {
			debug!(key = %key, "injected put failure");
			return err!(io_failed("put", "injected failure"));
		}
		self.inner.put(txn, key, value, policy)
	}

	fn delete(&self, txn: Option<&mut Self::Transaction>, key: &EncodedKey) -> keyseq_core::Result<()> {
		self.counters.deletes.fetch_add(1, Ordering::SeqCst);
		self.inner.delete(txn, key)
	}
}
