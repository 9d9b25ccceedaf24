// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{EncodableKey, EncodedKey, KeyKind};

/// Namespaced key for a named sequence: `| version | kind | name bytes |`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceKey {
	pub name: String,
}

const VERSION: u8 = 1;

impl SequenceKey {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
		}
	}
}

impl EncodableKey for SequenceKey {
	const KIND: KeyKind = KeyKind::Sequence;

	fn encode(&self) -> EncodedKey {
		let mut out = Vec::with_capacity(2 + self.name.len());
		out.push(VERSION);
		out.push(Self::KIND as u8);
		out.extend(self.name.as_bytes());
		EncodedKey::new(out)
	}

	fn decode(key: &EncodedKey) -> Option<Self> {
		let bytes = key.as_bytes();
		if bytes.len() < 2 || bytes[0] != VERSION || KeyKind::try_from(bytes[1]).ok()? != Self::KIND {
			return None;
		}
		let name = String::from_utf8(bytes[2..].to_vec()).ok()?;
		Some(Self {
			name,
		})
	}
}
