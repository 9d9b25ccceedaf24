// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Persistent sequence generator.
//!
//! A [`Sequence`] hands out unique, strictly ordered `i64` values backed by a
//! single record in a [`SingleVersionStore`](keyseq_core::interface::SingleVersionStore).
//! Values are reserved from the store a block at a time (the cache) and served
//! locally until the block runs out.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod codec;
pub mod config;
pub mod range;
pub mod record;
mod sequence;
pub mod stat;

pub use codec::{Endianness, RecordFormat, decode, detect_format, encode, encode_legacy};
pub use config::{GetFlags, OpenFlags, SequenceConfig, SetFlags};
pub use keyseq_type::Result;
pub use record::{Direction, SequenceFlags, SequenceRecord};
pub use sequence::Sequence;
pub use stat::SequenceStat;
