// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::{
	EncodedKey, err,
	interface::{ReadMode, SingleVersionStore},
	return_error,
};
use keyseq_type::error::diagnostic::sequence::{
	concurrent_use_without_thread_safe, conflicting_direction, illegal_after_open, illegal_before_open,
	invalid_range, sequence_not_found, value_out_of_range,
};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::{
	codec::decode,
	config::{SequenceConfig, SetFlags},
	range::check_cache_size,
	record::{Direction, SequenceRecord},
	stat::{LatchStats, SequenceStat},
};

mod get;
mod open;
mod remove;
mod txn;

/// A handle on one persistent sequence.
///
/// Configure the handle, then [`open`](Sequence::open) it against a key.
/// An opened handle is shared by reference; with a non-zero cache size it
/// serves values from memory and only touches the store once per block.
pub struct Sequence<S: SingleVersionStore> {
	store: S,
	key: Option<EncodedKey>,
	thread_safe: bool,
	state: Mutex<SequenceState>,
	stats: LatchStats,
}

pub(crate) struct SequenceState {
	/// Private copy of the record; `value` is the next value to hand out.
	pub(crate) record: SequenceRecord,
	pub(crate) cache_size: i32,
	/// Last value reserved in memory.
	pub(crate) last_value: i64,
	/// Value most recently handed out.
	pub(crate) prev_value: i64,
}

impl SequenceState {
	/// Values that can be handed out without touching the store.
	fn available(&self) -> i64 {
		let record = &self.record;
		match record.direction() {
			Direction::Increment => self.last_value.wrapping_add(1).wrapping_sub(record.value),
			Direction::Decrement => record.value.wrapping_sub(self.last_value).wrapping_add(1),
		}
	}

	fn take(&mut self, delta: i64) -> i64 {
		let result = self.record.value;
		self.prev_value = result;
		self.record.value = self.record.direction().wrapping_step(result, delta);
		result
	}
}

impl<S: SingleVersionStore> Sequence<S> {
	pub fn new(store: S) -> Self {
		Self {
			store,
			key: None,
			thread_safe: false,
			state: Mutex::new(SequenceState {
				record: SequenceRecord::default(),
				cache_size: 0,
				last_value: 0,
				prev_value: 0,
			}),
			stats: LatchStats::default(),
		}
	}

	pub fn with_config(store: S, config: SequenceConfig) -> crate::Result<Self> {
		let mut result = Self::new(store);
		if let Some((min, max)) = config.range {
			result.set_range(min, max)?;
		}
		result.set_flags(config.flags)?;
		if let Some(value) = config.initial_value {
			result.initial_value(value)?;
		}
		result.set_cachesize(config.cache_size)?;
		Ok(result)
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn is_open(&self) -> bool {
		self.key.is_some()
	}

	pub fn key(&self) -> crate::Result<EncodedKey> {
		self.opened_key("key").cloned()
	}

	pub fn get_cachesize(&self) -> crate::Result<i32> {
		self.opened_key("get_cachesize")?;
		Ok(self.lock()?.cache_size)
	}

	/// Allowed at any time; on an open handle the size is checked against
	/// the live range.
	pub fn set_cachesize(&self, cache_size: i32) -> crate::Result<()> {
		let mut state = self.lock()?;
		if self.is_open() {
			check_cache_size(cache_size, state.record.min, state.record.max)?;
		} else {
			check_cache_size(cache_size, i64::MIN, i64::MAX)?;
		}
		state.cache_size = cache_size;
		Ok(())
	}

	pub fn get_range(&self) -> crate::Result<(i64, i64)> {
		self.opened_key("get_range")?;
		let state = self.lock()?;
		Ok((state.record.min, state.record.max))
	}

	pub fn set_range(&mut self, min: i64, max: i64) -> crate::Result<()> {
		self.unopened("set_range")?;
		if min >= max {
			return_error!(invalid_range(min, max));
		}

		let record = &mut self.state.get_mut().record;
		record.min = min;
		record.max = max;
		record.flags.range_set = true;
		Ok(())
	}

	pub fn get_flags(&self) -> crate::Result<SetFlags> {
		self.opened_key("get_flags")?;
		let flags = self.lock()?.record.flags;
		Ok(SetFlags {
			increment: flags.direction == Direction::Increment,
			decrement: flags.direction == Direction::Decrement,
			wrap: flags.wrap,
		})
	}

	/// Adds `flags` to the handle. A direction replaces the current one.
	pub fn set_flags(&mut self, flags: SetFlags) -> crate::Result<()> {
		self.unopened("set_flags")?;
		if flags.increment && flags.decrement {
			return_error!(conflicting_direction());
		}

		let record = &mut self.state.get_mut().record;
		if flags.increment {
			record.flags.direction = Direction::Increment;
		}
		if flags.decrement {
			record.flags.direction = Direction::Decrement;
		}
		if flags.wrap {
			record.flags.wrap = true;
		}
		Ok(())
	}

	/// Value of a newly created record. Checked against an explicit range
	/// here, and against the default range when the record is created.
	pub fn initial_value(&mut self, value: i64) -> crate::Result<()> {
		self.unopened("initial_value")?;

		let record = &mut self.state.get_mut().record;
		if record.flags.range_set && !record.contains(value) {
			return_error!(value_out_of_range(value, record.min, record.max));
		}
		record.value = value;
		Ok(())
	}

	/// Snapshot of the handle's statistics; `clear` resets the latch
	/// counters afterwards.
	#[instrument(name = "sequence::stat", level = "debug", skip(self))]
	pub fn stat(&self, clear: bool) -> crate::Result<SequenceStat> {
		let key = self.opened_key("stat")?;
		let current = match self.store.get(None, key, ReadMode::Shared)? {
			Some(bytes) => decode(&bytes)?.value,
			None => return_error!(sequence_not_found(key.to_string())),
		};

		let state = self.lock()?;
		let (wait, nowait) = self.stats.snapshot();
		let result = SequenceStat {
			wait,
			nowait,
			current,
			value: state.record.value,
			last_value: state.last_value,
			min: state.record.min,
			max: state.record.max,
			cache_size: state.cache_size,
			flags: state.record.flags,
		};
		if clear {
			self.stats.clear();
		}
		Ok(result)
	}

	/// Releases the handle. Performs no store I/O.
	pub fn close(self) {
		debug!(key = ?self.key.as_ref().map(ToString::to_string), "sequence closed");
	}

	fn opened_key(&self, operation: &str) -> crate::Result<&EncodedKey> {
		match &self.key {
			Some(key) => Ok(key),
			None => err!(illegal_before_open(operation)),
		}
	}

	fn unopened(&self, operation: &str) -> crate::Result<()> {
		if self.is_open() {
			return_error!(illegal_after_open(operation));
		}
		Ok(())
	}

	/// Takes the latch. A handle opened without thread support refuses to
	/// wait for it.
	fn lock(&self) -> crate::Result<MutexGuard<'_, SequenceState>> {
		if let Some(guard) = self.state.try_lock() {
			self.stats.acquired();
			return Ok(guard);
		}
		if !self.thread_safe {
			return_error!(concurrent_use_without_thread_safe());
		}
		self.stats.waited();
		Ok(self.state.lock())
	}
}
