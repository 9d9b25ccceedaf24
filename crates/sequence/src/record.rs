// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::return_error;
use keyseq_type::error::diagnostic::sequence::corrupt_flags;
use serde::{Deserialize, Serialize};

/// Width of an encoded [`SequenceRecord`].
pub const RECORD_SIZE: usize = 32;

pub const CURRENT_VERSION: u32 = 2;

/// Records of this version were written in the byte order of the host.
pub const LEGACY_VERSION: u32 = 1;

const DECREMENTING: u32 = 0x01;
const INCREMENTING: u32 = 0x02;
const RANGE_EXPLICITLY_SET: u32 = 0x04;
const WRAP_ON_LIMIT: u32 = 0x08;
const HAS_WRAPPED: u32 = 0x10;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
	#[default]
	Increment,
	Decrement,
}

impl Direction {
	/// Moves `value` by `amount` in this direction, `None` on 64-bit overflow.
	pub fn checked_step(self, value: i64, amount: i64) -> Option<i64> {
		match self {
			Direction::Increment => value.checked_add(amount),
			Direction::Decrement => value.checked_sub(amount),
		}
	}

	pub fn wrapping_step(self, value: i64, amount: i64) -> i64 {
		match self {
			Direction::Increment => value.wrapping_add(amount),
			Direction::Decrement => value.wrapping_sub(amount),
		}
	}
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceFlags {
	pub direction: Direction,
	/// Restart at the opposite bound instead of failing on overflow.
	pub wrap: bool,
	/// `min`/`max` were chosen by the caller rather than defaulted.
	pub range_set: bool,
	/// Sticky. Without `wrap` the range is used up and every later
	/// reservation overflows. With `wrap` it records that a reservation ran
	/// past the 64-bit boundary and is never consulted.
	pub wrapped: bool,
}

impl SequenceFlags {
	pub fn to_bits(&self) -> u32 {
		let mut bits = match self.direction {
			Direction::Increment => INCREMENTING,
			Direction::Decrement => DECREMENTING,
		};
		if self.range_set {
			bits |= RANGE_EXPLICITLY_SET;
		}
		if self.wrap {
			bits |= WRAP_ON_LIMIT;
		}
		if self.wrapped {
			bits |= HAS_WRAPPED;
		}
		bits
	}

	/// Unknown bits are ignored; a record without a direction bit increments.
	pub fn from_bits(bits: u32) -> crate::Result<Self> {
		let direction = match (bits & INCREMENTING != 0, bits & DECREMENTING != 0) {
			(true, true) => return_error!(corrupt_flags(bits)),
			(false, true) => Direction::Decrement,
			_ => Direction::Increment,
		};

		Ok(Self {
			direction,
			wrap: bits & WRAP_ON_LIMIT != 0,
			range_set: bits & RANGE_EXPLICITLY_SET != 0,
			wrapped: bits & HAS_WRAPPED != 0,
		})
	}
}

/// The durable state of one sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceRecord {
	pub version: u32,
	pub flags: SequenceFlags,
	/// Next value to hand out.
	pub value: i64,
	pub min: i64,
	pub max: i64,
}

impl Default for SequenceRecord {
	fn default() -> Self {
		Self {
			version: CURRENT_VERSION,
			flags: SequenceFlags::default(),
			value: 0,
			min: i64::MIN,
			max: i64::MAX,
		}
	}
}

impl SequenceRecord {
	pub fn direction(&self) -> Direction {
		self.flags.direction
	}

	/// The limit the sequence runs towards.
	pub fn bound(&self) -> i64 {
		match self.flags.direction {
			Direction::Increment => self.max,
			Direction::Decrement => self.min,
		}
	}

	/// The limit a wrapping sequence restarts from.
	pub fn restart(&self) -> i64 {
		match self.flags.direction {
			Direction::Increment => self.min,
			Direction::Decrement => self.max,
		}
	}

	pub fn contains(&self, value: i64) -> bool {
		self.min <= value && value <= self.max
	}
}
