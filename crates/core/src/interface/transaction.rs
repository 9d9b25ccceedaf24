// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl Display for TransactionId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "txn-{}", self.0)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
	Commit,
	Abort,
}

/// A store transaction. Dropping an unresolved transaction aborts it.
pub trait Transaction: Send {
	fn id(&self) -> TransactionId;

	fn commit(self) -> crate::Result<()>;

	fn abort(self) -> crate::Result<()>;

	fn resolve(self, resolution: Resolution) -> crate::Result<()>
	where
		Self: Sized,
	{
		match resolution {
			Resolution::Commit => self.commit(),
			Resolution::Abort => self.abort(),
		}
	}
}
