// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::{interface::SingleVersionStore, return_error};
use keyseq_type::error::diagnostic::sequence::sequence_read_only;
use tracing::{debug, instrument};

use crate::sequence::{Sequence, txn::with_txn};

impl<S: SingleVersionStore> Sequence<S> {
	/// Deletes the record and closes the handle. The handle is closed even
	/// when the delete fails.
	#[instrument(name = "sequence::remove", level = "debug", skip_all)]
	pub fn remove(self, txn: Option<&mut S::Transaction>) -> crate::Result<()> {
		let key = self.opened_key("remove")?.clone();
		if !self.store.may_write() {
			self.close();
			return_error!(sequence_read_only("remove"));
		}

		let result = with_txn(&self.store, txn, |txn| self.store.delete(txn, &key));
		if result.is_ok() {
			debug!(key = %key, "sequence removed");
		}
		self.close();
		result
	}
}

#[cfg(test)]
mod tests {
	use keyseq_core::{
		EncodedKey,
		interface::{ReadMode, SingleVersionStore, Transaction},
	};
	use keyseq_store_single::MemoryStore;

	use crate::{Sequence, config::OpenFlags};

	fn key() -> EncodedKey {
		EncodedKey::from("seq")
	}

	#[test]
	fn test_remove_deletes_record() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.open(None, key(), OpenFlags::CREATE).unwrap();

		seq.remove(None).unwrap();
		assert_eq!(store.get(None, &key(), ReadMode::Shared).unwrap(), None);
	}

	#[test]
	fn test_remove_in_aborted_transaction_keeps_record() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.open(None, key(), OpenFlags::CREATE).unwrap();

		let mut txn = store.begin().unwrap();
		seq.remove(Some(&mut txn)).unwrap();
		txn.abort().unwrap();

		assert!(store.get(None, &key(), ReadMode::Shared).unwrap().is_some());
	}

	#[test]
	fn test_remove_surfaces_delete_failure() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.open(None, key(), OpenFlags::CREATE).unwrap();
		store.delete(None, &key()).unwrap();

		let err = seq.remove(None).unwrap_err();
		assert_eq!(err.code, "STORE_002");
	}

	#[test]
	fn test_remove_before_open() {
		let seq = Sequence::new(MemoryStore::new());
		assert_eq!(seq.remove(None).unwrap_err().code, "SEQUENCE_015");
	}
}
