// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Dynamically typed collection values.
//!
//! Collection identity is erased on the wire: decoding a collection always
//! materializes one of the containers in this module, whatever concrete
//! container the writing side used. Equality on these types is structural
//! and, for the keyed/deduplicated shapes, order-insensitive.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Error;
use crate::streamable::{downcast_boxed, Streamable};

/// Decoded form of every List/Collection/Iterable-shaped value.
#[derive(Debug, Default, PartialEq)]
pub struct DynList(pub Vec<Option<Box<dyn Streamable>>>);

impl DynList {
    pub fn new() -> DynList {
        DynList::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, value: impl Streamable) {
        self.0.push(Some(Box::new(value)));
    }

    pub fn push_null(&mut self) {
        self.0.push(None);
    }

    pub fn get(&self, index: usize) -> Option<&dyn Streamable> {
        self.0.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&dyn Streamable>> {
        self.0.iter().map(|slot| slot.as_deref())
    }

    /// Converts into a homogeneous `Vec`, failing on nulls or foreign
    /// element types.
    pub fn try_into_vec<T: Streamable>(self) -> Result<Vec<T>, Error> {
        self.0
            .into_iter()
            .map(|slot| {
                let boxed = slot.ok_or_else(|| {
                    Error::malformed_payload("null element in a homogeneous list")
                })?;
                downcast_boxed::<T>(boxed)
            })
            .collect()
    }
}

/// Decoded form of every Set-shaped value. Element equality is `dyn_eq`.
#[derive(Debug, Default)]
pub struct DynSet(Vec<Box<dyn Streamable>>);

impl DynSet {
    pub fn new() -> DynSet {
        DynSet::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &dyn Streamable) -> bool {
        self.0.iter().any(|e| e.as_ref() == value)
    }

    /// Inserts unless an equal element is already present.
    pub fn insert(&mut self, value: Box<dyn Streamable>) -> bool {
        if self.contains(value.as_ref()) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn insert_value(&mut self, value: impl Streamable) -> bool {
        self.insert(Box::new(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Streamable> {
        self.0.iter().map(|e| e.as_ref())
    }
}

impl PartialEq for DynSet {
    fn eq(&self, other: &DynSet) -> bool {
        self.len() == other.len() && self.iter().all(|e| other.contains(e))
    }
}

/// Decoded form of every Map-shaped value. Keys are non-null and compared
/// with `dyn_eq`; values may be null.
#[derive(Debug, Default)]
pub struct DynMap(Vec<(Box<dyn Streamable>, Option<Box<dyn Streamable>>)>);

impl DynMap {
    pub fn new() -> DynMap {
        DynMap::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &dyn Streamable) -> Option<Option<&dyn Streamable>> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Inserts, replacing the value bound to an equal key.
    pub fn insert(&mut self, key: Box<dyn Streamable>, value: Option<Box<dyn Streamable>>) {
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| k.as_ref() == key.as_ref()) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn insert_value(&mut self, key: impl Streamable, value: impl Streamable) {
        self.insert(Box::new(key), Some(Box::new(value)));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&dyn Streamable, Option<&dyn Streamable>)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_deref()))
    }
}

impl PartialEq for DynMap {
    fn eq(&self, other: &DynMap) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

/// Decoded form of every Multiset-shaped value: distinct elements with
/// positive occurrence counts.
#[derive(Debug, Default)]
pub struct DynMultiset(Vec<(Box<dyn Streamable>, i32)>);

impl DynMultiset {
    pub fn new() -> DynMultiset {
        DynMultiset::default()
    }

    /// Number of distinct elements.
    pub fn distinct_len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, value: &dyn Streamable) -> i32 {
        self.0
            .iter()
            .find(|(e, _)| e.as_ref() == value)
            .map_or(0, |(_, n)| *n)
    }

    pub fn add(&mut self, value: Box<dyn Streamable>) {
        self.add_n(value, 1);
    }

    pub fn add_n(&mut self, value: Box<dyn Streamable>, occurrences: i32) {
        if occurrences <= 0 {
            return;
        }
        if let Some(entry) = self.0.iter_mut().find(|(e, _)| e.as_ref() == value.as_ref()) {
            entry.1 += occurrences;
        } else {
            self.0.push((value, occurrences));
        }
    }

    pub fn add_value(&mut self, value: impl Streamable) {
        self.add(Box::new(value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&dyn Streamable, i32)> {
        self.0.iter().map(|(e, n)| (e.as_ref(), *n))
    }
}

impl PartialEq for DynMultiset {
    fn eq(&self, other: &DynMultiset) -> bool {
        self.distinct_len() == other.distinct_len()
            && self.iter().all(|(e, n)| other.count(e) == n)
    }
}

/// A statically typed multiset: distinct elements with occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiset<T: Eq + Hash> {
    counts: HashMap<T, i32>,
}

impl<T: Eq + Hash> Default for Multiset<T> {
    fn default() -> Self {
        Multiset {
            counts: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash> Multiset<T> {
    pub fn new() -> Multiset<T> {
        Multiset::default()
    }

    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, value: &T) -> i32 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn add(&mut self, value: T) {
        self.add_n(value, 1);
    }

    pub fn add_n(&mut self, value: T, occurrences: i32) {
        if occurrences <= 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += occurrences;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, i32)> {
        self.counts.iter().map(|(e, n)| (e, *n))
    }
}
