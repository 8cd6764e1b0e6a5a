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

//! The built-in value codec table: boxed primitives, strings, runtime type
//! references and packed primitive arrays. Every registry pre-registers
//! all of these.

use crate::ensure;
use crate::error::Error;
use crate::session::{Decoder, Encoder};
use crate::streamable::{downcast_ref, ClassRef, Streamable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Bool,
    I8,
    I16,
    Char,
    I32,
    I64,
    F32,
    F64,
    Str,
    Class,
    BoolArray,
    I8Array,
    U8Array,
    I16Array,
    I32Array,
    I64Array,
    F32Array,
    F64Array,
    CharArray,
}

pub(crate) struct ValueCodec {
    kind: ValueKind,
}

impl ValueCodec {
    pub(crate) fn new(kind: ValueKind) -> ValueCodec {
        ValueCodec { kind }
    }

    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        match self.kind {
            ValueKind::Bool => enc.writer.write_bool(*downcast_ref::<bool>(value)?),
            ValueKind::I8 => enc.writer.write_i8(*downcast_ref::<i8>(value)?),
            ValueKind::I16 => enc.writer.write_i16(*downcast_ref::<i16>(value)?),
            ValueKind::Char => enc.writer.write_char(*downcast_ref::<char>(value)?),
            ValueKind::I32 => enc.writer.write_i32(*downcast_ref::<i32>(value)?),
            ValueKind::I64 => enc.writer.write_i64(*downcast_ref::<i64>(value)?),
            ValueKind::F32 => enc.writer.write_f32(*downcast_ref::<f32>(value)?),
            ValueKind::F64 => enc.writer.write_f64(*downcast_ref::<f64>(value)?),
            ValueKind::Str => enc.writer.write_utf(downcast_ref::<String>(value)?)?,
            ValueKind::Class => enc.writer.write_utf(&downcast_ref::<ClassRef>(value)?.0)?,
            ValueKind::BoolArray => {
                let array = downcast_ref::<Vec<bool>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_bool(*v);
                }
            }
            ValueKind::I8Array => {
                let array = downcast_ref::<Vec<i8>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_i8(*v);
                }
            }
            ValueKind::U8Array => {
                let array = downcast_ref::<Vec<u8>>(value)?;
                enc.writer.write_count(array.len())?;
                enc.writer.write_bytes(array);
            }
            ValueKind::I16Array => {
                let array = downcast_ref::<Vec<i16>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_i16(*v);
                }
            }
            ValueKind::I32Array => {
                let array = downcast_ref::<Vec<i32>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_i32(*v);
                }
            }
            ValueKind::I64Array => {
                let array = downcast_ref::<Vec<i64>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_i64(*v);
                }
            }
            ValueKind::F32Array => {
                let array = downcast_ref::<Vec<f32>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_f32(*v);
                }
            }
            ValueKind::F64Array => {
                let array = downcast_ref::<Vec<f64>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_f64(*v);
                }
            }
            ValueKind::CharArray => {
                let array = downcast_ref::<Vec<char>>(value)?;
                enc.writer.write_count(array.len())?;
                for v in array {
                    enc.writer.write_char(*v);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        Ok(match self.kind {
            ValueKind::Bool => Box::new(dec.reader.read_bool()?),
            ValueKind::I8 => Box::new(dec.reader.read_i8()?),
            ValueKind::I16 => Box::new(dec.reader.read_i16()?),
            ValueKind::Char => Box::new(dec.reader.read_char()?),
            ValueKind::I32 => Box::new(dec.reader.read_i32()?),
            ValueKind::I64 => Box::new(dec.reader.read_i64()?),
            ValueKind::F32 => Box::new(dec.reader.read_f32()?),
            ValueKind::F64 => Box::new(dec.reader.read_f64()?),
            ValueKind::Str => Box::new(dec.reader.read_utf()?),
            ValueKind::Class => {
                let name = dec.reader.read_utf()?;
                Box::new(ClassRef(dec.registry().rename_of(&name)))
            }
            ValueKind::BoolArray => {
                let count = read_array_count(dec, 1)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_bool()?);
                }
                Box::new(array)
            }
            ValueKind::I8Array => {
                let count = read_array_count(dec, 1)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_i8()?);
                }
                Box::new(array)
            }
            ValueKind::U8Array => {
                let count = read_array_count(dec, 1)?;
                Box::new(dec.reader.read_bytes(count)?.to_vec())
            }
            ValueKind::I16Array => {
                let count = read_array_count(dec, 2)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_i16()?);
                }
                Box::new(array)
            }
            ValueKind::I32Array => {
                let count = read_array_count(dec, 4)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_i32()?);
                }
                Box::new(array)
            }
            ValueKind::I64Array => {
                let count = read_array_count(dec, 8)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_i64()?);
                }
                Box::new(array)
            }
            ValueKind::F32Array => {
                let count = read_array_count(dec, 4)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_f32()?);
                }
                Box::new(array)
            }
            ValueKind::F64Array => {
                let count = read_array_count(dec, 8)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_f64()?);
                }
                Box::new(array)
            }
            ValueKind::CharArray => {
                let count = read_array_count(dec, 4)?;
                let mut array = Vec::with_capacity(count);
                for _ in 0..count {
                    array.push(dec.reader.read_char()?);
                }
                Box::new(array)
            }
        })
    }
}

fn read_array_count(dec: &mut Decoder, elem_size: usize) -> Result<usize, Error> {
    let count = dec.reader.read_count()?;
    ensure!(
        count.saturating_mul(elem_size) <= dec.reader.remaining(),
        Error::malformed_payload(format!(
            "declared array of {} elements exceeds the {} remaining payload bytes",
            count,
            dec.reader.remaining()
        ))
    );
    Ok(count)
}
