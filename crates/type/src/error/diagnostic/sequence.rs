// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Sequence key has zero length
pub fn key_empty() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_001".to_string(),
		message: "zero length sequence key specified".to_string(),
		label: None,
		help: Some("every sequence is stored under a non-empty key".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Store is configured to keep several values per key
pub fn duplicates_not_supported() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_002".to_string(),
		message: "sequences are not supported in stores configured for duplicate data".to_string(),
		label: None,
		help: Some("open the sequence in a store with unique keys".to_string()),
		notes: vec!["a sequence requires exactly one record per key".to_string()],
		cause: None,
	}
}

/// Node or store may not write the sequence record
pub fn sequence_read_only(operation: &str) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_003".to_string(),
		message: format!("`{}` attempted to modify a sequence in a read-only store", operation),
		label: Some("write capability required".to_string()),
		help: Some("perform the operation on a node that is allowed to write".to_string()),
		notes: vec!["replication followers may open sequences but never allocate from them".to_string()],
		cause: None,
	}
}

/// Sequence value lies outside of the declared range
pub fn value_out_of_range(value: i64, min: i64, max: i64) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_004".to_string(),
		message: format!("sequence value `{}` out of range", value),
		label: Some(format!("allowed range is [{}, {}]", min, max)),
		help: Some("choose an initial value inside the range or widen the range".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Inserting a new sequence record failed
pub fn sequence_create_failed() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_005".to_string(),
		message: "sequence create failed".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Exclusive create found an existing record
pub fn sequence_already_exists(key: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_006".to_string(),
		message: format!("sequence `{}` already exists", key.into()),
		label: Some("exclusive create requested".to_string()),
		help: Some("open without the exclusive flag to reuse the existing sequence".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// No record stored under the key and create was not requested
pub fn sequence_not_found(key: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_007".to_string(),
		message: format!("sequence `{}` not found", key.into()),
		label: None,
		help: Some("open with the create flag to initialize a new sequence".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Stored record is shorter than the fixed record layout
pub fn bad_record_format(len: usize, expected: usize) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_008".to_string(),
		message: "bad sequence record format".to_string(),
		label: Some(format!("record has {} bytes, expected at least {}", len, expected)),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Stored record carries a format version this build cannot read
pub fn unsupported_version(version: u32) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_009".to_string(),
		message: format!("unsupported sequence version: {}", version),
		label: None,
		help: Some("the record was written by an incompatible release".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Cache size below zero
pub fn negative_cache_size(cache_size: i32) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_010".to_string(),
		message: format!("cache size must be >= 0, got {}", cache_size),
		label: None,
		help: Some("use 0 to disable caching".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Cache size exceeds the width of the sequence range
pub fn cache_larger_than_range(cache_size: i32, min: i64, max: i64) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_011".to_string(),
		message: "number of items to be cached is larger than the sequence range".to_string(),
		label: Some(format!("cache size {} for range [{}, {}]", cache_size, min, max)),
		help: Some("reduce the cache size or widen the range".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Range minimum not strictly below the maximum
pub fn invalid_range(min: i64, max: i64) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_012".to_string(),
		message: "minimum sequence value must be less than maximum sequence value".to_string(),
		label: Some(format!("got min {} and max {}", min, max)),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Both increment and decrement were requested
pub fn conflicting_direction() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_013".to_string(),
		message: "increment and decrement are mutually exclusive".to_string(),
		label: None,
		help: Some("set exactly one direction".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Configuration call on a handle that is already open
pub fn illegal_after_open(operation: &str) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_014".to_string(),
		message: format!("`{}` may not be called after the sequence is opened", operation),
		label: None,
		help: Some("configure the handle before calling open".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Operation that needs an opened handle
pub fn illegal_before_open(operation: &str) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_015".to_string(),
		message: format!("`{}` may not be called before the sequence is opened", operation),
		label: None,
		help: Some("open the sequence first".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Delta is negative, or zero without asking for the current value
pub fn invalid_delta(delta: i32) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_016".to_string(),
		message: format!("sequence delta must be greater than 0, got {}", delta),
		label: None,
		help: Some("a delta of 0 is only allowed together with the current flag".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Caller supplied a transaction to a caching handle
pub fn cache_with_transaction(cache_size: i32) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_017".to_string(),
		message: "sequence with non-zero cache may not specify transaction handle".to_string(),
		label: Some(format!("cache size is {}", cache_size)),
		help: Some("set the cache size to 0 to allocate inside caller transactions".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// No more values can be allocated within the declared bounds
pub fn sequence_overflow() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_018".to_string(),
		message: "sequence overflow".to_string(),
		label: Some("no more values can be generated".to_string()),
		help: Some("enable wrapping or widen the sequence range".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Writing the advanced sequence record failed
pub fn sequence_update_failed() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_019".to_string(),
		message: "sequence update failed".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Stored flags name both directions
pub fn corrupt_flags(flags: u32) -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_020".to_string(),
		message: format!("sequence record has conflicting flags {:#04x}", flags),
		label: Some("increment and decrement are both set".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Handle opened without thread support was used from two threads at once
pub fn concurrent_use_without_thread_safe() -> Diagnostic {
	Diagnostic {
		code: "SEQUENCE_021".to_string(),
		message: "sequence handle used concurrently but opened without thread support".to_string(),
		label: None,
		help: Some("open the sequence with the thread_safe flag to share it between threads".to_string()),
		notes: vec![],
		cause: None,
	}
}
