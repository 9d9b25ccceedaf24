// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::{
	CowVec, EncodedKey,
	interface::{PutPolicy, ReadMode, SingleVersionStore},
	internal, return_error,
};
use keyseq_type::error::diagnostic::sequence::{
	cache_with_transaction, invalid_delta, sequence_not_found, sequence_overflow, sequence_read_only,
	sequence_update_failed, unsupported_version,
};
use parking_lot::MutexGuard;
use tracing::{debug, instrument, trace};

use crate::{
	codec::{decode, encode},
	config::GetFlags,
	range::{range_width, reserve},
	record::{CURRENT_VERSION, LEGACY_VERSION, SequenceRecord},
	sequence::{Sequence, SequenceState, txn::with_txn},
};

/// Outcome of a store round trip: the record as held in memory and the end
/// of the freshly reserved block.
struct Refill {
	record: SequenceRecord,
	last_value: i64,
}

impl<S: SingleVersionStore> Sequence<S> {
	/// Hands out the next `delta` values and returns the first of them, or
	/// with [`GetFlags::CURRENT`] the value most recently handed out.
	///
	/// A caller transaction is only allowed when caching is disabled.
	#[instrument(name = "sequence::get", level = "trace", skip(self, txn))]
	pub fn get(&self, txn: Option<&mut S::Transaction>, delta: i32, flags: GetFlags) -> crate::Result<i64> {
		let key = self.opened_key("get")?;
		if delta < 0 || (delta == 0 && !flags.current) {
			return_error!(invalid_delta(delta));
		}

		let mut state = self.lock()?;
		if state.cache_size != 0 && txn.is_some() {
			return_error!(cache_with_transaction(state.cache_size));
		}
		if !self.store.may_write() {
			return_error!(sequence_read_only("get"));
		}
		if delta as u64 > range_width(state.record.min, state.record.max) {
			return_error!(sequence_overflow());
		}

		if flags.current {
			return Ok(state.prev_value);
		}

		let delta = i64::from(delta);
		if state.available() < delta {
			self.refill(&mut state, txn, key, delta as i32)?;
			if state.available() < delta {
				return_error!(internal!("reserved block holds {} values, {} requested", state.available(), delta));
			}
		}

		let result = state.take(delta);
		trace!(value = result, "allocated");
		Ok(result)
	}

	fn refill(
		&self,
		state: &mut MutexGuard<'_, SequenceState>,
		txn: Option<&mut S::Transaction>,
		key: &EncodedKey,
		delta: i32,
	) -> crate::Result<()> {
		let cache_size = state.cache_size;

		let refill = match txn {
			// The latch is released across the locking read so a thread never
			// holds it while waiting on a row lock owned by another transaction.
			Some(txn) => {
				let bytes =
					MutexGuard::unlocked(state, || self.store.get(Some(&mut *txn), key, ReadMode::Exclusive))?;
				let stored = stored_record(bytes, key)?;
				if stored.value != state.record.value {
					debug!(stored = stored.value, local = state.record.value, "lost race, adopting stored record");
				}
				self.advance(Some(txn), key, stored, delta, cache_size)?
			}
			None => with_txn(&self.store, None, |mut txn| {
				let bytes = self.store.get(txn.as_deref_mut(), key, ReadMode::Exclusive)?;
				let stored = stored_record(bytes, key)?;
				self.advance(txn, key, stored, delta, cache_size)
			})?,
		};

		debug!(start = refill.record.value, end = refill.last_value, "sequence block reserved");
		state.record = refill.record;
		state.last_value = refill.last_value;
		Ok(())
	}

	/// Reserves a block from `stored` and persists the value after it.
	fn advance(
		&self,
		txn: Option<&mut S::Transaction>,
		key: &EncodedKey,
		stored: SequenceRecord,
		delta: i32,
		cache_size: i32,
	) -> crate::Result<Refill> {
		let reservation = reserve(&stored, delta, cache_size)?;

		let mut record = stored;
		record.flags.wrapped |= reservation.wrapped;
		record.value = reservation.successor;
		self.store
			.put(txn, key, CowVec::new(encode(&record).to_vec()), PutPolicy::Overwrite)
			.map_err(|err| err.context(sequence_update_failed()))?;

		record.value = reservation.start;
		Ok(Refill {
			record,
			last_value: reservation.end,
		})
	}
}

fn stored_record(bytes: Option<CowVec<u8>>, key: &EncodedKey) -> crate::Result<SequenceRecord> {
	let Some(bytes) = bytes else {
		return_error!(sequence_not_found(key.to_string()));
	};
	let mut record = decode(&bytes)?;
	match record.version {
		CURRENT_VERSION => {}
		// an upgrade done by `open` was rolled back; the refill put redoes it
		LEGACY_VERSION => {
			debug!(key = %key, "upgrading legacy record on refill");
			record.version = CURRENT_VERSION;
		}
		version => return_error!(unsupported_version(version)),
	}
	Ok(record)
}
