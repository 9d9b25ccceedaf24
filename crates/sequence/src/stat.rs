// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::record::{Direction, SequenceFlags};

/// Snapshot returned by [`Sequence::stat`](crate::Sequence::stat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStat {
	/// Latch acquisitions that had to wait.
	pub wait: u64,
	/// Latch acquisitions that did not wait.
	pub nowait: u64,
	/// Value currently persisted in the store.
	pub current: i64,
	/// Next value this handle hands out.
	pub value: i64,
	/// Last value reserved by this handle.
	pub last_value: i64,
	pub min: i64,
	pub max: i64,
	pub cache_size: i32,
	pub flags: SequenceFlags,
}

impl Display for SequenceStat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{}\tnumber of times the sequence latch was waited for", self.wait)?;
		writeln!(f, "{}\tnumber of times the sequence latch was acquired without waiting", self.nowait)?;
		writeln!(f, "{}\tcurrent value in the store", self.current)?;
		writeln!(f, "{}\tcurrent cached value", self.value)?;
		writeln!(f, "{}\tlast cached value", self.last_value)?;
		writeln!(f, "{}\tminimum value", self.min)?;
		writeln!(f, "{}\tmaximum value", self.max)?;
		writeln!(f, "{}\tcache size", self.cache_size)?;

		let mut flags = vec![match self.flags.direction {
			Direction::Increment => "increment",
			Direction::Decrement => "decrement",
		}];
		if self.flags.wrap {
			flags.push("wrap");
		}
		if self.flags.range_set {
			flags.push("range set");
		}
		if self.flags.wrapped {
			flags.push("wrapped");
		}
		write!(f, "{}\tsequence flags", flags.join(", "))
	}
}

#[derive(Debug, Default)]
pub(crate) struct LatchStats {
	wait: AtomicU64,
	nowait: AtomicU64,
}

impl LatchStats {
	pub(crate) fn waited(&self) {
		self.wait.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn acquired(&self) {
		self.nowait.fetch_add(1, Ordering::Relaxed);
	}

	/// Returns `(wait, nowait)`.
	pub(crate) fn snapshot(&self) -> (u64, u64) {
		(self.wait.load(Ordering::Relaxed), self.nowait.load(Ordering::Relaxed))
	}

	pub(crate) fn clear(&self) {
		self.wait.store(0, Ordering::Relaxed);
		self.nowait.store(0, Ordering::Relaxed);
	}
}
