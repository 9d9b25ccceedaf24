// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod logging;
pub mod store;

pub use logging::init_tracing;
pub use store::InstrumentedStore;
