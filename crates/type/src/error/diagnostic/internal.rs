// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Internal invariant violated, with the source location that detected it
pub fn internal_with_context(reason: impl Into<String>, file: &str, line: u32, module_path: &str) -> Diagnostic {
	let file_name = file.rsplit('/').next().unwrap_or(file);
	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("internal error: {}", reason.into()),
		label: Some(format!("invariant violated at {}:{}", file_name, line)),
		help: Some("this error should never occur in normal operation, please file a bug report".to_string()),
		notes: vec![format!("module: {}", module_path), format!("version: {}", env!("CARGO_PKG_VERSION"))],
		cause: None,
	}
}

/// Builds an internal-error diagnostic capturing the call site.
#[macro_export]
macro_rules! internal {
	($($arg:tt)*) => {
		$crate::error::diagnostic::internal::internal_with_context(
			format!($($arg)*),
			file!(),
			line!(),
			module_path!(),
		)
	};
}
