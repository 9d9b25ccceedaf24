// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	time::{Duration, Instant},
};

use keyseq_core::{EncodedKey, err, interface::TransactionId};
use keyseq_type::error::diagnostic::transaction::lock_timeout;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

/// Exclusive row locks, one owner per key.
#[derive(Default)]
pub(crate) struct LockTable {
	held: Mutex<HashMap<EncodedKey, TransactionId>>,
	released: Condvar,
}

impl LockTable {
	/// Blocks until `owner` holds the lock on `key`. Returns `true` when the
	/// lock was newly taken and `false` when `owner` already held it.
	pub(crate) fn acquire(
		&self,
		key: &EncodedKey,
		owner: TransactionId,
		timeout: Option<Duration>,
	) -> crate::Result<bool> {
		let deadline = timeout.map(|timeout| (Instant::now() + timeout, timeout));
		let mut held = self.held.lock();

		loop {
			match held.get(key).copied() {
				None => {
					held.insert(key.clone(), owner);
					return Ok(true);
				}
				Some(holder) if holder == owner => return Ok(false),
				Some(holder) => {
					trace!(key = %key, owner = %owner, holder = %holder, "waiting for row lock");
				}
			}

			match deadline {
				None => self.released.wait(&mut held),
				Some((deadline, timeout)) => {
					if self.released.wait_until(&mut held, deadline).timed_out()
						&& held.get(key).is_some_and(|holder| *holder != owner)
					{
						return err!(lock_timeout(key.to_string(), timeout));
					}
				}
			}
		}
	}

	pub(crate) fn release(&self, keys: &[EncodedKey], owner: TransactionId) {
		if keys.is_empty() {
			return;
		}

		let mut held = self.held.lock();
		for key in keys {
			if held.get(key) == Some(&owner) {
				held.remove(key);
			}
		}
		drop(held);

		self.released.notify_all();
	}

	#[cfg(test)]
	pub(crate) fn holder(&self, key: &EncodedKey) -> Option<TransactionId> {
		self.held.lock().get(key).copied()
	}
}
