// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

pub mod internal;
pub mod render;
pub mod sequence;
pub mod store;
pub mod transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn with_cause(mut self, cause: Diagnostic) -> Self {
		self.cause = Some(Box::new(cause));
		self
	}

	/// Walks the cause chain, starting with `self`.
	pub fn chain(&self) -> impl Iterator<Item = &Diagnostic> {
		std::iter::successors(Some(self), |d| d.cause.as_deref())
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}
