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

use crate::config::EnumPolicy;
use crate::ensure;
use crate::error::Error;
use crate::resolver::spec::{EnumShape, TypeSpec};
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OrdinalWidth {
    One,
    Two,
    Four,
}

impl OrdinalWidth {
    fn for_cardinality(count: usize) -> OrdinalWidth {
        if count <= 0x100 {
            OrdinalWidth::One
        } else if count <= 0x1_0000 {
            OrdinalWidth::Two
        } else {
            OrdinalWidth::Four
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnumEncoding {
    Name,
    Compact,
    Ordinal(OrdinalWidth),
}

/// Codec for a registered enum type. The wire encoding is fixed when the
/// codec is built, from the registry-wide policy and the constant universe
/// snapshotted at registration.
///
/// Ordinal and compact decoding look the stored index up in that snapshot;
/// if the constant order changed between encode and decode the lookup
/// silently lands on a different constant. That hazard is inherent to the
/// ordinal policy and deliberately left undefined.
pub(crate) struct EnumCodec {
    spec: Arc<TypeSpec>,
    encoding: EnumEncoding,
}

impl EnumCodec {
    pub(crate) fn new(spec: Arc<TypeSpec>, policy: EnumPolicy) -> EnumCodec {
        let encoding = {
            let shape = spec.enum_shape().expect("enum codec built for a non-enum spec");
            match policy {
                EnumPolicy::ByName => EnumEncoding::Name,
                EnumPolicy::ByCompactCode => {
                    if shape.codes.is_some() {
                        EnumEncoding::Compact
                    } else {
                        log::warn!(
                            "enum `{}` declares no compact codes; streaming it by name",
                            spec.name()
                        );
                        EnumEncoding::Name
                    }
                }
                EnumPolicy::ByOrdinal => {
                    EnumEncoding::Ordinal(OrdinalWidth::for_cardinality(shape.names.len()))
                }
            }
        };
        EnumCodec { spec, encoding }
    }

    fn shape(&self) -> &EnumShape {
        self.spec.enum_shape().expect("enum codec built for a non-enum spec")
    }

    pub(crate) fn write_value(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        self.write_opt(Some(value), enc)
    }

    /// Bare form with null support: null is a zero-length name under the
    /// by-name encoding and the sentinel `-1` under the fixed-width ones.
    pub(crate) fn write_opt(
        &self,
        value: Option<&dyn Streamable>,
        enc: &mut Encoder,
    ) -> Result<(), Error> {
        let shape = self.shape();
        match self.encoding {
            EnumEncoding::Name => match value {
                None => enc.writer.write_utf(""),
                Some(value) => {
                    let ordinal = (shape.ordinal_of)(value)?;
                    enc.writer.write_utf(&shape.names[ordinal])
                }
            },
            EnumEncoding::Compact => {
                let code = match value {
                    None => -1,
                    Some(value) => {
                        let ordinal = (shape.ordinal_of)(value)?;
                        shape.codes.as_ref().expect("compact encoding without codes")[ordinal]
                    }
                };
                enc.writer.write_i8(code);
                Ok(())
            }
            EnumEncoding::Ordinal(width) => {
                let ordinal: i64 = match value {
                    None => -1,
                    Some(value) => (shape.ordinal_of)(value)? as i64,
                };
                match width {
                    OrdinalWidth::One => enc.writer.write_i8(ordinal as i8),
                    OrdinalWidth::Two => enc.writer.write_i16(ordinal as i16),
                    OrdinalWidth::Four => enc.writer.write_i32(ordinal as i32),
                }
                Ok(())
            }
        }
    }

    pub(crate) fn read_value(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        self.read_opt(dec)?.ok_or_else(|| {
            Error::malformed_payload(format!(
                "null enum `{}` in a non-null context",
                self.spec.name()
            ))
        })
    }

    pub(crate) fn read_opt(&self, dec: &mut Decoder) -> Result<Option<Box<dyn Streamable>>, Error> {
        let shape = self.shape();
        let ordinal: i64 = match self.encoding {
            EnumEncoding::Name => {
                let name = dec.reader.read_utf()?;
                if name.is_empty() {
                    return Ok(None);
                }
                shape
                    .names
                    .iter()
                    .position(|n| n == &name)
                    .ok_or_else(|| {
                        Error::malformed_payload(format!(
                            "unknown constant `{}` of enum `{}`",
                            name,
                            self.spec.name()
                        ))
                    })? as i64
            }
            EnumEncoding::Compact => {
                let code = dec.reader.read_i8()?;
                if code == -1 {
                    return Ok(None);
                }
                let codes = shape.codes.as_ref().expect("compact encoding without codes");
                codes.iter().position(|c| *c == code).ok_or_else(|| {
                    Error::malformed_payload(format!(
                        "unknown compact code {} of enum `{}`",
                        code,
                        self.spec.name()
                    ))
                })? as i64
            }
            EnumEncoding::Ordinal(width) => {
                let stored = match width {
                    OrdinalWidth::One => dec.reader.read_i8()? as i64,
                    OrdinalWidth::Two => dec.reader.read_i16()? as i64,
                    OrdinalWidth::Four => dec.reader.read_i32()? as i64,
                };
                if stored == -1 {
                    return Ok(None);
                }
                stored
            }
        };
        ensure!(
            ordinal >= 0 && (ordinal as usize) < shape.names.len(),
            Error::malformed_payload(format!(
                "ordinal {} out of range for enum `{}`",
                ordinal,
                self.spec.name()
            ))
        );
        Ok(Some((shape.make)(ordinal as usize)))
    }
}
