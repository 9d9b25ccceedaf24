// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Copy-on-write vector: cheap to clone, copies only when mutated while shared.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CowVec<T>
where
	T: Clone,
{
	inner: Arc<Vec<T>>,
}

impl<T> CowVec<T>
where
	T: Clone,
{
	pub fn new(vec: Vec<T>) -> Self {
		Self {
			inner: Arc::new(vec),
		}
	}

	/// Ensures unique ownership and returns a mutable reference to the inner Vec.
	pub fn make_mut(&mut self) -> &mut Vec<T> {
		Arc::make_mut(&mut self.inner)
	}

	pub fn as_slice(&self) -> &[T] {
		self.inner.as_slice()
	}

	pub fn is_shared(&self) -> bool {
		Arc::strong_count(&self.inner) > 1
	}

	pub fn to_vec(&self) -> Vec<T> {
		self.inner.as_ref().clone()
	}
}

impl<T> Deref for CowVec<T>
where
	T: Clone,
{
	type Target = [T];

	fn deref(&self) -> &Self::Target {
		self.as_slice()
	}
}

impl<T> AsRef<[T]> for CowVec<T>
where
	T: Clone,
{
	fn as_ref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T> From<Vec<T>> for CowVec<T>
where
	T: Clone,
{
	fn from(vec: Vec<T>) -> Self {
		Self::new(vec)
	}
}

impl From<&[u8]> for CowVec<u8> {
	fn from(bytes: &[u8]) -> Self {
		Self::new(bytes.to_vec())
	}
}

impl<T> Serialize for CowVec<T>
where
	T: Clone + Serialize,
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.as_slice().serialize(serializer)
	}
}

impl<'de, T> Deserialize<'de> for CowVec<T>
where
	T: Clone + Deserialize<'de>,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Vec::<T>::deserialize(deserializer).map(CowVec::new)
	}
}
