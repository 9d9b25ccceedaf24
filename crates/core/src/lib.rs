// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod interface;
pub mod key;

pub use key::{EncodableKey, EncodedKey, KeyKind, SequenceKey};
pub use keyseq_type::{CowVec, Diagnostic, Error, Result, err, error, internal, return_error};
