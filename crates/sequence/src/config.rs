// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Options for [`Sequence::open`](crate::Sequence::open).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OpenFlags {
	/// Create the record if the key holds none.
	pub create: bool,
	/// With `create`, fail if the record already exists.
	pub exclusive: bool,
	/// The handle may be shared between threads.
	pub thread_safe: bool,
}

impl OpenFlags {
	pub const NONE: Self = Self {
		create: false,
		exclusive: false,
		thread_safe: false,
	};
	pub const CREATE: Self = Self {
		create: true,
		..Self::NONE
	};
	pub const EXCLUSIVE: Self = Self {
		exclusive: true,
		..Self::NONE
	};
	pub const THREAD_SAFE: Self = Self {
		thread_safe: true,
		..Self::NONE
	};
}

impl BitOr for OpenFlags {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self {
			create: self.create || rhs.create,
			exclusive: self.exclusive || rhs.exclusive,
			thread_safe: self.thread_safe || rhs.thread_safe,
		}
	}
}

/// Behaviour flags of a sequence. Setting neither direction keeps the
/// current one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFlags {
	pub increment: bool,
	pub decrement: bool,
	pub wrap: bool,
}

impl SetFlags {
	pub const NONE: Self = Self {
		increment: false,
		decrement: false,
		wrap: false,
	};
	pub const INCREMENT: Self = Self {
		increment: true,
		..Self::NONE
	};
	pub const DECREMENT: Self = Self {
		decrement: true,
		..Self::NONE
	};
	pub const WRAP: Self = Self {
		wrap: true,
		..Self::NONE
	};
}

impl BitOr for SetFlags {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self {
			increment: self.increment || rhs.increment,
			decrement: self.decrement || rhs.decrement,
			wrap: self.wrap || rhs.wrap,
		}
	}
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GetFlags {
	/// Return the value most recently handed out instead of allocating.
	pub current: bool,
}

impl GetFlags {
	pub const NEXT: Self = Self {
		current: false,
	};
	pub const CURRENT: Self = Self {
		current: true,
	};
}

/// Settings applied to an unopened handle by
/// [`Sequence::with_config`](crate::Sequence::with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
	pub cache_size: i32,
	/// Inclusive `(min, max)`; unbounded when `None`.
	pub range: Option<(i64, i64)>,
	pub flags: SetFlags,
	pub initial_value: Option<i64>,
}

impl Default for SequenceConfig {
	fn default() -> Self {
		Self {
			cache_size: 0,
			range: None,
			flags: SetFlags::NONE,
			initial_value: None,
		}
	}
}
