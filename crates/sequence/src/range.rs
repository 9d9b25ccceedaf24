// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::return_error;
use keyseq_type::error::diagnostic::sequence::{
	cache_larger_than_range, invalid_delta, negative_cache_size, sequence_overflow,
};

use crate::record::{Direction, SequenceRecord};

/// Distance between `min` and `max`, exact for the full `i64` range.
pub fn range_width(min: i64, max: i64) -> u64 {
	(max as u64).wrapping_sub(min as u64)
}

pub fn check_cache_size(cache_size: i32, min: i64, max: i64) -> crate::Result<()> {
	if cache_size < 0 {
		return_error!(negative_cache_size(cache_size));
	}
	if cache_size as u64 > range_width(min, max) {
		return_error!(cache_larger_than_range(cache_size, min, max));
	}
	Ok(())
}

/// A block of values taken from a record by one store round trip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reservation {
	/// First value of the block.
	pub start: i64,
	/// Last value of the block, inclusive.
	pub end: i64,
	/// Value to persist: the first value not handed out.
	pub successor: i64,
	/// Without wrap: the range is used up. With wrap: the block ended on
	/// the 64-bit boundary.
	pub wrapped: bool,
}

fn fits(direction: Direction, value: i64, adjust: i64, bound: i64) -> bool {
	match direction {
		Direction::Increment => value.checked_add(adjust - 1).is_some_and(|end| end <= bound),
		Direction::Decrement => value.checked_sub(adjust - 1).is_some_and(|end| end >= bound),
	}
}

/// Reserves `max(delta, cache_size)` values from `record`, or only `delta`
/// when the larger block would run out of range.
///
/// Without wrapping, running out of range is an overflow. With wrapping the
/// block restarts at the opposite bound. The successor always lies inside
/// `[min, max]`: a block ending on the bound is followed by the restart
/// value, or, without wrapping, by the bound itself marked `wrapped` so the
/// sequence stays exhausted.
pub fn reserve(record: &SequenceRecord, delta: i32, cache_size: i32) -> crate::Result<Reservation> {
	if delta <= 0 {
		return_error!(invalid_delta(delta));
	}

	let flags = record.flags;
	if flags.wrapped && !flags.wrap {
		return_error!(sequence_overflow());
	}

	let direction = flags.direction;
	let bound = record.bound();
	let delta = i64::from(delta);
	let mut adjust = delta.max(i64::from(cache_size));
	let mut value = record.value;

	// never wrap just to fill the cache
	if !fits(direction, value, adjust, bound) && adjust > delta {
		adjust = delta;
	}

	if !fits(direction, value, adjust, bound) {
		if !flags.wrap {
			return_error!(sequence_overflow());
		}
		value = record.restart();
		if !fits(direction, value, adjust, bound) {
			return_error!(sequence_overflow());
		}
	}

	let end = direction.wrapping_step(value, adjust - 1);
	let (successor, wrapped) = if end != bound {
		(direction.wrapping_step(end, 1), false)
	} else if flags.wrap {
		(record.restart(), direction.checked_step(end, 1).is_none())
	} else {
		(end, true)
	};

	Ok(Reservation {
		start: value,
		end,
		successor,
		wrapped,
	})
}

#[cfg(test)]
mod tests {
	use super::{Reservation, check_cache_size, range_width, reserve};
	use crate::record::{Direction, SequenceFlags, SequenceRecord};

	fn record(direction: Direction, wrap: bool, value: i64, min: i64, max: i64) -> SequenceRecord {
		SequenceRecord {
			flags: SequenceFlags {
				direction,
				wrap,
				range_set: true,
				wrapped: false,
			},
			value,
			min,
			max,
			..Default::default()
		}
	}

	#[test]
	fn test_range_width_full_range() {
		assert_eq!(range_width(i64::MIN, i64::MAX), u64::MAX);
		assert_eq!(range_width(0, 10), 10);
		assert_eq!(range_width(-10, -5), 5);
	}

	#[test]
	fn test_check_cache_size() {
		assert!(check_cache_size(0, 0, 1).is_ok());
		assert!(check_cache_size(10, 0, 10).is_ok());
		assert_eq!(check_cache_size(11, 0, 10).unwrap_err().code, "SEQUENCE_011");
		assert_eq!(check_cache_size(-1, 0, 10).unwrap_err().code, "SEQUENCE_010");
		assert!(check_cache_size(i32::MAX, i64::MIN, i64::MAX).is_ok());
		assert_eq!(check_cache_size(u64::MAX as i32, i64::MIN, i64::MAX).unwrap_err().code, "SEQUENCE_010");
	}

	#[test]
	fn test_reserve_fills_cache() {
		let r = reserve(&record(Direction::Increment, false, 10, 0, 100), 1, 5).unwrap();
		assert_eq!(
			r,
			Reservation {
				start: 10,
				end: 14,
				successor: 15,
				wrapped: false
			}
		);
	}

	#[test]
	fn test_reserve_shrinks_to_delta_near_bound() {
		let r = reserve(&record(Direction::Increment, true, 98, 0, 100), 2, 10).unwrap();
		assert_eq!(r.start, 98);
		assert_eq!(r.end, 99);
		assert_eq!(r.successor, 100);
	}

	#[test]
	fn test_reserve_successor_stays_in_range() {
		let r = reserve(&record(Direction::Increment, false, 0, 0, 2), 3, 0).unwrap();
		assert_eq!((r.start, r.end), (0, 2));
		assert_eq!(r.successor, 2);
		assert!(r.wrapped);

		let r = reserve(&record(Direction::Increment, true, 1, 0, 2), 2, 0).unwrap();
		assert_eq!(r.end, 2);
		assert_eq!(r.successor, 0);
		assert!(!r.wrapped);

		let r = reserve(&record(Direction::Decrement, true, 1, -1, 1), 3, 0).unwrap();
		assert_eq!(r.end, -1);
		assert_eq!(r.successor, 1);
		assert!(!r.wrapped);
	}

	#[test]
	fn test_reserve_wrapped_marker_ignored_when_wrapping() {
		let mut wrapped = record(Direction::Increment, true, 5, 0, 10);
		wrapped.flags.wrapped = true;
		let r = reserve(&wrapped, 1, 0).unwrap();
		assert_eq!(r.start, 5);
		assert_eq!(r.successor, 6);
	}

	#[test]
	fn test_reserve_overflow_without_wrap() {
		let err = reserve(&record(Direction::Increment, false, 3, 0, 2), 1, 0).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_018");
	}

	#[test]
	fn test_reserve_wraps_to_min() {
		let r = reserve(&record(Direction::Increment, true, 3, 0, 2), 1, 0).unwrap();
		assert_eq!(r.start, 0);
		assert_eq!(r.successor, 1);
	}

	#[test]
	fn test_reserve_decrement_wraps_to_max() {
		let r = reserve(&record(Direction::Decrement, true, -1, 0, 2), 1, 0).unwrap();
		assert_eq!(r.start, 2);
		assert_eq!(r.end, 2);
		assert_eq!(r.successor, 1);
	}

	#[test]
	fn test_reserve_decrement_block() {
		let r = reserve(&record(Direction::Decrement, false, 0, -100, 0), 1, 4).unwrap();
		assert_eq!(r.start, 0);
		assert_eq!(r.end, -3);
		assert_eq!(r.successor, -4);
	}

	#[test]
	fn test_reserve_at_i64_max_without_wrap_marks_exhausted() {
		let r = reserve(&record(Direction::Increment, false, i64::MAX, i64::MIN, i64::MAX), 1, 0).unwrap();
		assert_eq!(r.start, i64::MAX);
		assert_eq!(r.end, i64::MAX);
		assert_eq!(r.successor, i64::MAX);
		assert!(r.wrapped);

		let mut exhausted = record(Direction::Increment, false, i64::MAX, i64::MIN, i64::MAX);
		exhausted.flags.wrapped = true;
		assert_eq!(reserve(&exhausted, 1, 0).unwrap_err().code, "SEQUENCE_018");
	}

	#[test]
	fn test_reserve_at_i64_max_with_wrap_restarts() {
		let r = reserve(&record(Direction::Increment, true, i64::MAX - 1, i64::MIN, i64::MAX), 1, 2).unwrap();
		assert_eq!(r.start, i64::MAX - 1);
		assert_eq!(r.end, i64::MAX);
		assert_eq!(r.successor, i64::MIN);
		assert!(r.wrapped);

		let mut wrapped = record(Direction::Increment, true, i64::MIN, i64::MIN, i64::MAX);
		wrapped.flags.wrapped = true;
		assert_eq!(reserve(&wrapped, 1, 0).unwrap().start, i64::MIN);
	}

	#[test]
	fn test_reserve_at_i64_min_decrementing() {
		let r = reserve(&record(Direction::Decrement, false, i64::MIN, i64::MIN, i64::MAX), 1, 0).unwrap();
		assert_eq!(r.start, i64::MIN);
		assert_eq!(r.successor, i64::MIN);
		assert!(r.wrapped);
	}

	#[test]
	fn test_reserve_rejects_non_positive_delta() {
		let err = reserve(&record(Direction::Increment, false, 0, 0, 10), 0, 0).unwrap_err();
		assert_eq!(err.code, "SEQUENCE_016");
	}
}
