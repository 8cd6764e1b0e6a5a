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

use std::sync::Arc;

use crate::containers::{DynList, DynMap, DynMultiset, DynSet};
use crate::ensure;
use crate::error::Error;
use crate::resolver::spec::{CollectionSpec, TypeSpec};
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

/// The collection shapes that survive on the wire, most- to
/// least-specific. A concrete container type is erased to the nearest of
/// these when it is registered; nothing else about it survives a round
/// trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionShape {
    List,
    Map,
    Set,
    Multiset,
    Collection,
    Iterable,
}

impl CollectionShape {
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            CollectionShape::List => "List",
            CollectionShape::Map => "Map",
            CollectionShape::Set => "Set",
            CollectionShape::Multiset => "Multiset",
            CollectionShape::Collection => "Collection",
            CollectionShape::Iterable => "Iterable",
        }
    }
}

/// Codec for every collection-shaped type. The write half came from the
/// type's registration; the read half is fixed per shape and always
/// materializes the matching dynamic container.
pub(crate) struct CollectionCodec {
    spec: Arc<TypeSpec>,
}

impl CollectionCodec {
    pub(crate) fn new(spec: Arc<TypeSpec>) -> CollectionCodec {
        CollectionCodec { spec }
    }

    fn collection(&self) -> &CollectionSpec {
        self.spec
            .collection_spec()
            .expect("collection codec built for a non-collection spec")
    }

    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        (self.collection().write)(value, enc)
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        match self.collection().shape {
            CollectionShape::List | CollectionShape::Collection | CollectionShape::Iterable => {
                read_list(dec)
            }
            CollectionShape::Set => read_set(dec),
            CollectionShape::Map => read_map(dec),
            CollectionShape::Multiset => read_multiset(dec),
        }
    }
}

/// Writes the count-prefixed element sequence shared by the List, Set,
/// Collection and Iterable shapes. Every element travels in full tagged
/// form: the declared element type at a collection boundary guarantees
/// nothing about the concrete classes inside.
pub(crate) fn write_items<'a, I>(items: I, len: usize, enc: &mut Encoder) -> Result<(), Error>
where
    I: IntoIterator<Item = Option<&'a dyn Streamable>>,
{
    enc.writer.write_count(len)?;
    for item in items {
        enc.write_object(item)?;
    }
    Ok(())
}

/// Writes the count-prefixed key/value pair sequence of the Map shape.
pub(crate) fn write_pairs<'a, I>(pairs: I, len: usize, enc: &mut Encoder) -> Result<(), Error>
where
    I: IntoIterator<Item = (&'a dyn Streamable, Option<&'a dyn Streamable>)>,
{
    enc.writer.write_count(len)?;
    for (key, value) in pairs {
        enc.write_object(Some(key))?;
        enc.write_object(value)?;
    }
    Ok(())
}

/// Writes the count-prefixed element/occurrence sequence of the Multiset
/// shape.
pub(crate) fn write_counted<'a, I>(entries: I, len: usize, enc: &mut Encoder) -> Result<(), Error>
where
    I: IntoIterator<Item = (&'a dyn Streamable, i32)>,
{
    enc.writer.write_count(len)?;
    for (elem, occurrences) in entries {
        enc.write_object(Some(elem))?;
        enc.writer.write_i32(occurrences);
    }
    Ok(())
}

fn read_len(dec: &mut Decoder, min_entry_bytes: usize) -> Result<usize, Error> {
    let count = dec.reader.read_count()?;
    ensure!(
        count.saturating_mul(min_entry_bytes) <= dec.reader.remaining(),
        Error::malformed_payload(format!(
            "declared collection of {} entries exceeds the {} remaining payload bytes",
            count,
            dec.reader.remaining()
        ))
    );
    Ok(count)
}

fn read_list(dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
    let count = read_len(dec, 2)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(dec.read_object()?);
    }
    Ok(Box::new(DynList(items)))
}

fn read_set(dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
    let count = read_len(dec, 2)?;
    let mut set = DynSet::new();
    for _ in 0..count {
        let elem = dec
            .read_object()?
            .ok_or_else(|| Error::malformed_payload("null element in a set"))?;
        set.insert(elem);
    }
    Ok(Box::new(set))
}

fn read_map(dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
    let count = read_len(dec, 4)?;
    let mut map = DynMap::new();
    for _ in 0..count {
        let key = dec
            .read_object()?
            .ok_or_else(|| Error::malformed_payload("null key in a map"))?;
        let value = dec.read_object()?;
        map.insert(key, value);
    }
    Ok(Box::new(map))
}

fn read_multiset(dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
    let count = read_len(dec, 6)?;
    let mut multiset = DynMultiset::new();
    for _ in 0..count {
        let elem = dec
            .read_object()?
            .ok_or_else(|| Error::malformed_payload("null element in a multiset"))?;
        let occurrences = dec.reader.read_i32()?;
        ensure!(
            occurrences > 0,
            Error::malformed_payload(format!("multiset occurrence count {}", occurrences))
        );
        multiset.add_n(elem, occurrences);
    }
    Ok(Box::new(multiset))
}
