// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod cowvec;

pub mod hex;

pub use cowvec::CowVec;
