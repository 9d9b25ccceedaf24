// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use keyseq_core::interface::SingleVersionStore;

/// Runs `f` in the caller's transaction. Without one, a transactional store
/// gets an implicit transaction that commits on success and aborts on
/// failure; other stores auto-commit each operation.
pub(crate) fn with_txn<S, F, R>(store: &S, txn: Option<&mut S::Transaction>, f: F) -> crate::Result<R>
where
	S: SingleVersionStore,
	F: FnOnce(Option<&mut S::Transaction>) -> crate::Result<R>,
{
	match txn {
		Some(txn) => f(Some(txn)),
		None if store.config().transactional => store.with_transaction(|txn| f(Some(txn))),
		None => f(None),
	}
}
