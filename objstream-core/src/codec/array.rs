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

use crate::codec::Streamer;
use crate::ensure;
use crate::error::Error;
use crate::mask::ArrayMask;
use crate::resolver::spec::{ArraySpec, TypeShape, TypeSpec};
use crate::session::{Decoder, Encoder};
use crate::streamable::{downcast_ref, Streamable};

/// Upper bound on array length, fixed by the 18-bit index space the mask's
/// `u16` byte-length prefix can address.
pub const MAX_ARRAY_LEN: usize = 262_144;

/// Codec for arrays with an open element type
/// (`Vec<Option<Box<dyn Streamable>>>`): every element is written in full
/// tagged form, nulls as class code 0.
pub(crate) struct ArrayCodec;

impl ArrayCodec {
    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        let array = downcast_ref::<Vec<Option<Box<dyn Streamable>>>>(value)?;
        ensure!(
            array.len() <= MAX_ARRAY_LEN,
            Error::unsupported(format!("array of {} elements", array.len()))
        );
        enc.writer.write_count(array.len())?;
        for slot in array {
            enc.write_object(slot.as_deref())?;
        }
        Ok(())
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        let count = read_checked_len(dec, 2)?;
        let mut array: Vec<Option<Box<dyn Streamable>>> = Vec::with_capacity(count);
        for _ in 0..count {
            array.push(dec.read_object()?);
        }
        Ok(Box::new(array))
    }
}

/// Codec for arrays whose element type is one concrete registered type.
/// Per-element class tags would carry no information, so only a null mask
/// and the non-null payloads are written.
pub(crate) struct HomogeneousArrayCodec {
    spec: Arc<TypeSpec>,
    delegate: Arc<Streamer>,
}

impl HomogeneousArrayCodec {
    pub(crate) fn new(spec: Arc<TypeSpec>, delegate: Arc<Streamer>) -> HomogeneousArrayCodec {
        HomogeneousArrayCodec { spec, delegate }
    }

    fn array_spec(&self) -> &ArraySpec {
        match &self.spec.shape {
            TypeShape::HomogeneousArray(spec) => spec,
            _ => unreachable!("homogeneous array codec built for a non-array spec"),
        }
    }

    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        let array = self.array_spec();
        let len = (array.len)(value)?;
        ensure!(
            len <= MAX_ARRAY_LEN,
            Error::unsupported(format!("array of {} elements", len))
        );
        enc.writer.write_count(len)?;
        let mut mask = ArrayMask::new(len);
        for i in 0..len {
            if (array.get)(value, i)?.is_some() {
                mask.set(i);
            }
        }
        mask.write(&mut enc.writer)?;
        for i in 0..len {
            if let Some(elem) = (array.get)(value, i)? {
                self.delegate.write_bare(elem, enc)?;
            }
        }
        Ok(())
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        let array_spec = self.array_spec();
        let count = read_checked_len(dec, 0)?;
        let mask = ArrayMask::read(&mut dec.reader, count)?;
        let mut array = (array_spec.new_array)(count);
        for i in 0..count {
            let slot = if mask.get(i) {
                Some(self.delegate.read_bare(dec)?)
            } else {
                None
            };
            (array_spec.push)(&mut *array, slot)?;
        }
        Ok(array)
    }
}

fn read_checked_len(dec: &mut Decoder, min_elem_bytes: usize) -> Result<usize, Error> {
    let count = dec.reader.read_count()?;
    ensure!(
        count <= MAX_ARRAY_LEN,
        Error::malformed_payload(format!(
            "declared array of {} elements exceeds the {} limit",
            count, MAX_ARRAY_LEN
        ))
    );
    ensure!(
        count.saturating_mul(min_elem_bytes) <= dec.reader.remaining(),
        Error::malformed_payload(format!(
            "declared array of {} elements exceeds the {} remaining payload bytes",
            count,
            dec.reader.remaining()
        ))
    );
    Ok(count)
}
