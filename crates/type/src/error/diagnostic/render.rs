// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use super::Diagnostic;

pub struct DefaultRenderer;

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		let mut out = String::new();
		Self::render(&mut out, diagnostic, 0);
		out
	}

	fn render(out: &mut String, diagnostic: &Diagnostic, depth: usize) {
		let indent = "  ".repeat(depth);

		let _ = writeln!(out, "{indent}Error {}", diagnostic.code);
		let _ = writeln!(out, "{indent}  {}", diagnostic.message);

		if let Some(label) = &diagnostic.label {
			let _ = writeln!(out, "{indent}  = {label}");
		}

		if let Some(help) = &diagnostic.help {
			let _ = writeln!(out, "{indent}help: {help}");
		}

		for note in &diagnostic.notes {
			let _ = writeln!(out, "{indent}note: {note}");
		}

		if let Some(cause) = &diagnostic.cause {
			let _ = writeln!(out, "{indent}caused by:");
			Self::render(out, cause, depth + 1);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::DefaultRenderer;
	use crate::error::diagnostic::{sequence::sequence_create_failed, store::key_exists};

	#[test]
	fn test_render_nested_cause() {
		let diagnostic = sequence_create_failed().with_cause(key_exists("6b6579"));
		let out = DefaultRenderer::render_string(&diagnostic);

		let lines: Vec<_> = out.lines().collect();
		assert_eq!(lines[0], "Error SEQUENCE_005");
		assert!(out.contains("caused by:"));
		assert!(out.contains("  Error STORE_001"));
		assert!(out.contains("6b6579"));
	}
}
