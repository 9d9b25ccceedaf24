// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;

use diagnostic::{Diagnostic, render::DefaultRenderer};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	/// Wraps this error as the cause of `diagnostic`.
	pub fn context(self, diagnostic: Diagnostic) -> Self {
		Error(diagnostic.with_cause(self.0))
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(diagnostic)
	}
}

/// Builds an [`Error`] from a diagnostic.
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error($crate::IntoDiagnostic::into_diagnostic($diagnostic))
	};
}

/// Builds an `Err(Error)` from a diagnostic.
#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error!($diagnostic))
	};
}

/// Returns early with an `Err(Error)` built from a diagnostic.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return $crate::err!($diagnostic)
	};
}
