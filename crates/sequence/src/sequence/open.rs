// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::{
	CowVec, EncodedKey,
	interface::{PutPolicy, ReadMode, SingleVersionStore},
	return_error,
};
use keyseq_type::error::diagnostic::sequence::{
	duplicates_not_supported, illegal_after_open, key_empty, sequence_already_exists, sequence_create_failed,
	sequence_not_found, sequence_read_only, unsupported_version, value_out_of_range,
};
use tracing::{debug, instrument};

use crate::{
	codec::{decode, encode},
	config::OpenFlags,
	range::check_cache_size,
	record::{CURRENT_VERSION, Direction, LEGACY_VERSION, SequenceRecord},
	sequence::{Sequence, txn::with_txn},
};

impl<S: SingleVersionStore> Sequence<S> {
	/// Binds the handle to `key`, loading the stored record or creating it
	/// from the staged configuration.
	///
	/// Legacy records are rewritten in the current format. Without a caller
	/// transaction the create or upgrade write runs in an implicit one.
	#[instrument(name = "sequence::open", level = "debug", skip(self, txn, key), fields(key = %key))]
	pub fn open(
		&mut self,
		txn: Option<&mut S::Transaction>,
		key: EncodedKey,
		flags: OpenFlags,
	) -> crate::Result<()> {
		if self.is_open() {
			return_error!(illegal_after_open("open"));
		}
		if key.is_empty() {
			return_error!(key_empty());
		}

		let config = self.store.config();
		if config.read_only {
			return_error!(sequence_read_only("open"));
		}
		if config.duplicates {
			return_error!(duplicates_not_supported());
		}

		let (staged, cache_size) = {
			let state = self.state.get_mut();
			(state.record, state.cache_size)
		};

		let store = &self.store;
		let record = with_txn(store, txn, |mut txn| {
			let record = match store.get(txn.as_deref_mut(), &key, ReadMode::Shared)? {
				None => {
					if !flags.create {
						return_error!(sequence_not_found(key.to_string()));
					}
					if !store.may_write() {
						return_error!(sequence_read_only("open"));
					}

					let record = initial_record(staged)?;
					store.put(txn.as_deref_mut(), &key, CowVec::new(encode(&record).to_vec()), PutPolicy::NoOverwrite)
						.map_err(|err| err.context(sequence_create_failed()))?;
					debug!(value = record.value, min = record.min, max = record.max, "sequence created");
					record
				}
				Some(bytes) => {
					if flags.create && flags.exclusive {
						return_error!(sequence_already_exists(key.to_string()));
					}

					let mut record = decode(&bytes)?;
					if record.version == LEGACY_VERSION {
						if !store.may_write() {
							return_error!(sequence_read_only("open"));
						}
						record.version = CURRENT_VERSION;
						store.put(
							txn.as_deref_mut(),
							&key,
							CowVec::new(encode(&record).to_vec()),
							PutPolicy::Overwrite,
						)?;
						debug!("legacy sequence record upgraded");
					}
					record
				}
			};

			if record.version != CURRENT_VERSION {
				return_error!(unsupported_version(record.version));
			}
			if cache_size != 0 {
				check_cache_size(cache_size, record.min, record.max)?;
			}
			Ok(record)
		})?;

		let state = self.state.get_mut();
		state.record = record;
		state.prev_value = record.value;
		state.last_value = match record.direction() {
			Direction::Increment => record.value.wrapping_sub(1),
			Direction::Decrement => record.value.wrapping_add(1),
		};
		self.thread_safe = flags.thread_safe;
		self.key = Some(key);
		Ok(())
	}
}

/// Fills the defaults of a staged record and checks its value.
fn initial_record(staged: SequenceRecord) -> crate::Result<SequenceRecord> {
	let mut record = staged;
	if !record.flags.range_set {
		record.min = i64::MIN;
		record.max = i64::MAX;
	}
	record.version = CURRENT_VERSION;
	record.flags.wrapped = false;

	if !record.contains(record.value) {
		return_error!(value_out_of_range(record.value, record.min, record.max));
	}
	Ok(record)
}

#[cfg(test)]
mod tests {
	use keyseq_core::{
		CowVec, EncodedKey,
		interface::{PutPolicy, ReadMode, SingleVersionStore, StoreConfig, Transaction},
	};
	use keyseq_store_single::{MemoryStore, MemoryStoreConfig};

	use crate::{
		Sequence,
		codec::{Endianness, decode, encode_legacy},
		config::{OpenFlags, SetFlags},
		record::{CURRENT_VERSION, SequenceRecord},
	};

	fn key() -> EncodedKey {
		EncodedKey::from("seq")
	}

	fn store_with(config: StoreConfig) -> MemoryStore {
		MemoryStore::with_config(MemoryStoreConfig {
			store: config,
			..Default::default()
		})
	}

	#[test]
	fn test_create_persists_record() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.initial_value(7).unwrap();
		seq.open(None, key(), OpenFlags::CREATE).unwrap();

		let bytes = store.get(None, &key(), ReadMode::Shared).unwrap().unwrap();
		let record = decode(&bytes).unwrap();
		assert_eq!(record.version, CURRENT_VERSION);
		assert_eq!(record.value, 7);
		assert_eq!(record.min, i64::MIN);
		assert_eq!(record.max, i64::MAX);
		assert!(!record.flags.range_set);
	}

	#[test]
	fn test_missing_without_create() {
		let mut seq = Sequence::new(MemoryStore::new());
		let err = seq.open(None, key(), OpenFlags::NONE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_007");
		assert!(!seq.is_open());
	}

	#[test]
	fn test_exclusive_create_of_existing() {
		let store = MemoryStore::new();
		Sequence::new(store.clone()).open(None, key(), OpenFlags::CREATE).unwrap();

		let mut seq = Sequence::new(store.clone());
		let err = seq.open(None, key(), OpenFlags::CREATE | OpenFlags::EXCLUSIVE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_006");

		let mut seq = Sequence::new(store);
		seq.open(None, key(), OpenFlags::CREATE).unwrap();
	}

	#[test]
	fn test_empty_key() {
		let mut seq = Sequence::new(MemoryStore::new());
		let err = seq.open(None, EncodedKey::new(Vec::<u8>::new()), OpenFlags::CREATE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_001");
	}

	#[test]
	fn test_store_configuration_checks() {
		let mut seq = Sequence::new(store_with(StoreConfig {
			duplicates: true,
			..Default::default()
		}));
		assert_eq!(seq.open(None, key(), OpenFlags::CREATE).unwrap_err().code, "SEQUENCE_002");

		let mut seq = Sequence::new(store_with(StoreConfig {
			read_only: true,
			..Default::default()
		}));
		assert_eq!(seq.open(None, key(), OpenFlags::CREATE).unwrap_err().code, "SEQUENCE_003");
	}

	#[test]
	fn test_follower_may_open_but_not_create() {
		let store = MemoryStore::new();
		Sequence::new(store.clone()).open(None, key(), OpenFlags::CREATE).unwrap();
		store.set_replication_follower(true);

		let mut seq = Sequence::new(store.clone());
		seq.open(None, key(), OpenFlags::NONE).unwrap();

		let mut seq = Sequence::new(store);
		let err = seq.open(None, EncodedKey::from("other"), OpenFlags::CREATE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_003");
	}

	#[test]
	fn test_initial_value_outside_default_range_checked_at_create() {
		let mut seq = Sequence::new(MemoryStore::new());
		seq.set_range(0, 10).unwrap();
		assert_eq!(seq.initial_value(11).unwrap_err().code, "SEQUENCE_004");
	}

	#[test]
	fn test_cache_checked_against_stored_range() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.set_range(0, 5).unwrap();
		seq.open(None, key(), OpenFlags::CREATE).unwrap();

		let mut seq = Sequence::new(store.clone());
		seq.set_cachesize(100).unwrap();
		let err = seq.open(None, key(), OpenFlags::NONE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_011");
	}

	#[test]
	fn test_failed_cache_check_rolls_back_create() {
		let store = MemoryStore::new();
		let mut seq = Sequence::new(store.clone());
		seq.set_range(0, 5).unwrap();
		seq.set_cachesize(100).unwrap();

		let err = seq.open(None, key(), OpenFlags::CREATE).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_011");
		assert_eq!(store.get(None, &key(), ReadMode::Shared).unwrap(), None);
	}

	#[test]
	fn test_open_inside_caller_transaction() {
		let store = MemoryStore::new();
		let mut txn = store.begin().unwrap();

		let mut seq = Sequence::new(store.clone());
		seq.open(Some(&mut txn), key(), OpenFlags::CREATE).unwrap();
		assert_eq!(store.get(None, &key(), ReadMode::Shared).unwrap(), None);

		txn.commit().unwrap();
		assert!(store.get(None, &key(), ReadMode::Shared).unwrap().is_some());
	}

	#[test]
	fn test_legacy_record_upgraded() {
		let store = MemoryStore::new();
		let legacy = SequenceRecord {
			value: 40,
			..Default::default()
		};
		store.put(None, &key(), CowVec::new(encode_legacy(&legacy, Endianness::Big).to_vec()), PutPolicy::Overwrite)
			.unwrap();

		let mut seq = Sequence::new(store.clone());
		seq.open(None, key(), OpenFlags::NONE).unwrap();

		let bytes = store.get(None, &key(), ReadMode::Shared).unwrap().unwrap();
		assert_eq!(decode(&bytes).unwrap(), legacy);
	}

	#[test]
	fn test_set_after_open_rejected() {
		let mut seq = Sequence::new(MemoryStore::new());
		seq.open(None, key(), OpenFlags::CREATE).unwrap();

		assert_eq!(seq.set_range(0, 10).unwrap_err().code, "SEQUENCE_014");
		assert_eq!(seq.set_flags(SetFlags::WRAP).unwrap_err().code, "SEQUENCE_014");
		assert_eq!(seq.initial_value(1).unwrap_err().code, "SEQUENCE_014");
		assert_eq!(seq.open(None, key(), OpenFlags::CREATE).unwrap_err().code, "SEQUENCE_014");
		seq.set_cachesize(10).unwrap();
	}
}
