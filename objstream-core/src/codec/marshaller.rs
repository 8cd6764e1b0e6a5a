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
use crate::error::Error;
use crate::resolver::spec::{Accessor, FieldSpec, PrimitiveAccessor};
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

/// Streams the content of one declared field.
///
/// The strategy was fixed when the [`FieldSpec`] was built; this type only
/// carries it out against a live session. Errors are returned raw — the
/// owning field-wise codec attaches the `(type, field)` context.
pub(crate) struct FieldMarshaller {
    spec: Arc<FieldSpec>,
}

impl FieldMarshaller {
    pub(crate) fn new(spec: Arc<FieldSpec>) -> FieldMarshaller {
        FieldMarshaller { spec }
    }

    pub(crate) fn name(&self) -> &str {
        self.spec.name()
    }

    pub(crate) fn write(&self, owner: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        match &self.spec.access {
            Accessor::Primitive(accessor) => match accessor {
                PrimitiveAccessor::Bool(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_bool(v);
                    Ok(())
                }
                PrimitiveAccessor::I8(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_i8(v);
                    Ok(())
                }
                PrimitiveAccessor::I16(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_i16(v);
                    Ok(())
                }
                PrimitiveAccessor::Char(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_char(v);
                    Ok(())
                }
                PrimitiveAccessor::I32(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_i32(v);
                    Ok(())
                }
                PrimitiveAccessor::I64(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_i64(v);
                    Ok(())
                }
                PrimitiveAccessor::F32(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_f32(v);
                    Ok(())
                }
                PrimitiveAccessor::F64(gs) => {
                    let v = (gs.get)(owner)?;
                    enc.writer.write_f64(v);
                    Ok(())
                }
            },
            Accessor::Str(gs) => {
                let v = (gs.get)(owner)?;
                enc.write_intern(v.as_deref())
            }
            Accessor::Enum { elem, get, .. } => {
                let value = get(owner)?;
                let streamer = enc.registry().resolve(*elem)?;
                let Streamer::Enum(codec) = &*streamer else {
                    return Err(Error::unsupported(
                        "field declared as an enum resolves to a non-enum codec",
                    ));
                };
                codec.write_opt(value.as_deref(), enc)
            }
            Accessor::Object { get, .. } => enc.write_object(get(owner)?),
        }
    }

    pub(crate) fn read(&self, owner: &mut (dyn Streamable + 'static), dec: &mut Decoder) -> Result<(), Error> {
        match &self.spec.access {
            Accessor::Primitive(accessor) => match accessor {
                PrimitiveAccessor::Bool(gs) => {
                    let v = dec.reader.read_bool()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::I8(gs) => {
                    let v = dec.reader.read_i8()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::I16(gs) => {
                    let v = dec.reader.read_i16()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::Char(gs) => {
                    let v = dec.reader.read_char()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::I32(gs) => {
                    let v = dec.reader.read_i32()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::I64(gs) => {
                    let v = dec.reader.read_i64()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::F32(gs) => {
                    let v = dec.reader.read_f32()?;
                    (gs.set)(owner, v)
                }
                PrimitiveAccessor::F64(gs) => {
                    let v = dec.reader.read_f64()?;
                    (gs.set)(owner, v)
                }
            },
            Accessor::Str(gs) => {
                let v = dec.read_intern()?;
                (gs.set)(owner, v)
            }
            Accessor::Enum { elem, set, .. } => {
                let streamer = dec.registry().resolve(*elem)?;
                let Streamer::Enum(codec) = &*streamer else {
                    return Err(Error::unsupported(
                        "field declared as an enum resolves to a non-enum codec",
                    ));
                };
                let value = codec.read_opt(dec)?;
                set(owner, value)
            }
            Accessor::Object { set, .. } => {
                let value = dec.read_object()?;
                set(owner, value)
            }
        }
    }
}
