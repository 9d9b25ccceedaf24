// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! On-disk layout of a [`SequenceRecord`].
//!
//! ```text
//! | version (u32) | flags (u32) | value (i64) | max (i64) | min (i64) |
//! ```
//!
//! Current records are little-endian. Legacy records (version 1) were written
//! in the byte order of the host that created them and are recognised in
//! either order.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use keyseq_core::return_error;
use keyseq_type::error::diagnostic::sequence::{bad_record_format, unsupported_version};

use crate::record::{CURRENT_VERSION, LEGACY_VERSION, RECORD_SIZE, SequenceFlags, SequenceRecord};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endianness {
	Little,
	Big,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecordFormat {
	Current,
	Legacy(Endianness),
}

impl RecordFormat {
	pub fn endianness(self) -> Endianness {
		match self {
			RecordFormat::Current => Endianness::Little,
			RecordFormat::Legacy(endianness) => endianness,
		}
	}

	pub fn is_legacy(self) -> bool {
		matches!(self, RecordFormat::Legacy(_))
	}
}

/// Identifies the layout of an encoded record from its version field.
pub fn detect_format(bytes: &[u8]) -> crate::Result<RecordFormat> {
	if bytes.len() < RECORD_SIZE {
		return_error!(bad_record_format(bytes.len(), RECORD_SIZE));
	}

	let version = [bytes[0], bytes[1], bytes[2], bytes[3]];
	match u32::from_le_bytes(version) {
		CURRENT_VERSION => Ok(RecordFormat::Current),
		LEGACY_VERSION => Ok(RecordFormat::Legacy(Endianness::Little)),
		other => {
			if u32::from_be_bytes(version) == LEGACY_VERSION {
				Ok(RecordFormat::Legacy(Endianness::Big))
			} else {
				return_error!(unsupported_version(other))
			}
		}
	}
}

/// Decodes a record, keeping the version it was stored with.
///
/// Bytes past the fixed record width are ignored.
pub fn decode(bytes: &[u8]) -> crate::Result<SequenceRecord> {
	let format = detect_format(bytes)?;
	let mut buf = &bytes[..RECORD_SIZE];

	let (version, flags, value, max, min) = match format.endianness() {
		Endianness::Little => {
			(buf.get_u32_le(), buf.get_u32_le(), buf.get_i64_le(), buf.get_i64_le(), buf.get_i64_le())
		}
		Endianness::Big => (buf.get_u32(), buf.get_u32(), buf.get_i64(), buf.get_i64(), buf.get_i64()),
	};

	Ok(SequenceRecord {
		version,
		flags: SequenceFlags::from_bits(flags)?,
		value,
		min,
		max,
	})
}

pub fn encode(record: &SequenceRecord) -> Bytes {
	let mut buf = BytesMut::with_capacity(RECORD_SIZE);
	buf.put_u32_le(record.version);
	buf.put_u32_le(record.flags.to_bits());
	buf.put_i64_le(record.value);
	buf.put_i64_le(record.max);
	buf.put_i64_le(record.min);
	buf.freeze()
}

/// Encodes `record` the way a legacy host of the given byte order stored it.
pub fn encode_legacy(record: &SequenceRecord, endianness: Endianness) -> Bytes {
	let mut buf = BytesMut::with_capacity(RECORD_SIZE);
	match endianness {
		Endianness::Little => {
			buf.put_u32_le(LEGACY_VERSION);
			buf.put_u32_le(record.flags.to_bits());
			buf.put_i64_le(record.value);
			buf.put_i64_le(record.max);
			buf.put_i64_le(record.min);
		}
		Endianness::Big => {
			buf.put_u32(LEGACY_VERSION);
			buf.put_u32(record.flags.to_bits());
			buf.put_i64(record.value);
			buf.put_i64(record.max);
			buf.put_i64(record.min);
		}
	}
	buf.freeze()
}
