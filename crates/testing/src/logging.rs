// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a test-friendly fmt subscriber once per process. The filter is
/// read from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing() {
	INIT.get_or_init(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
		// another harness may already own the global subscriber
		let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
	});
}
