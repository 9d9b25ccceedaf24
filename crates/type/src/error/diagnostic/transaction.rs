// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use crate::error::diagnostic::Diagnostic;

/// Waiting for a row lock held by another transaction took too long
pub fn lock_timeout(key: impl Into<String>, waited: Duration) -> Diagnostic {
	Diagnostic {
		code: "TXN_001".to_string(),
		message: format!("timed out after {}ms waiting for the lock on key `{}`", waited.as_millis(), key.into()),
		label: None,
		help: Some("abort the transaction and retry".to_string()),
		notes: vec!["the lock is held by another transaction that may itself be waiting".to_string()],
		cause: None,
	}
}
