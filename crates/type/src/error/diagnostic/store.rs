// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Put with no-overwrite policy hit an existing key
pub fn key_exists(key: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_001".to_string(),
		message: format!("key `{}` already exists", key.into()),
		label: Some("no-overwrite put".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Delete of a key that is not stored
pub fn key_not_found(key: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_002".to_string(),
		message: format!("key `{}` not found", key.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Write against a read-only store
pub fn store_read_only(operation: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_003".to_string(),
		message: format!("`{}` attempted to write to a read-only store", operation),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// The store could not complete an I/O operation
pub fn io_failed(operation: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_004".to_string(),
		message: format!("store `{}` failed: {}", operation, reason.into()),
		label: None,
		help: Some("the enclosing transaction has to be aborted".to_string()),
		notes: vec![],
		cause: None,
	}
}
