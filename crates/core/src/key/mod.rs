// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use keyseq_type::{CowVec, util::hex};
use serde::{Deserialize, Serialize};

mod sequence;

pub use sequence::SequenceKey;

#[derive(Debug, Clone, PartialOrd, Ord, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedKey(pub CowVec<u8>);

impl Deref for EncodedKey {
	type Target = CowVec<u8>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl EncodedKey {
	pub fn new(key: impl Into<Vec<u8>>) -> Self {
		Self(CowVec::new(key.into()))
	}

	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_slice()
	}
}

impl Display for EncodedKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&hex::encode(self.as_bytes()))
	}
}

impl From<&str> for EncodedKey {
	fn from(key: &str) -> Self {
		Self::new(key.as_bytes())
	}
}

impl From<Vec<u8>> for EncodedKey {
	fn from(key: Vec<u8>) -> Self {
		Self::new(key)
	}
}

impl From<&[u8]> for EncodedKey {
	fn from(key: &[u8]) -> Self {
		Self::new(key)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyKind {
	Sequence = 0x01,
}

impl TryFrom<u8> for KeyKind {
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0x01 => Ok(Self::Sequence),
			other => Err(other),
		}
	}
}

pub trait EncodableKey: Sized {
	const KIND: KeyKind;

	fn encode(&self) -> EncodedKey;

	fn decode(key: &EncodedKey) -> Option<Self>;
}
