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

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::buffer::Reader;
use crate::codec::Streamer;
use crate::ensure;
use crate::error::Error;
use crate::resolver::registry::TypeRegistry;
use crate::session::{ClassMapping, NULL_CODE};
use crate::streamable::{downcast_boxed, Streamable};

/// Decoder session: mirrors an [`Encoder`] over one byte stream, consuming
/// dictionary codes in the exact sequence the encoder produced them.
///
/// [`Encoder`]: crate::session::Encoder
pub struct Decoder<'r> {
    registry: &'r TypeRegistry,
    pub(crate) reader: Reader<'r>,
    classes: HashMap<i16, ClassMapping>,
    interns: HashMap<i16, String>,
}

impl<'r> Decoder<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry, bytes: &'r [u8]) -> Decoder<'r> {
        Decoder {
            registry,
            reader: Reader::new(bytes),
            classes: HashMap::new(),
            interns: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Reads a value in tagged form. A positive code must already be in
    /// the dictionary; a negative code defines a new entry from the class
    /// name that follows it, with the rename table applied before lookup.
    pub fn read_object(&mut self) -> Result<Option<Box<dyn Streamable>>, Error> {
        let code = self.reader.read_i16()?;
        if code == NULL_CODE {
            return Ok(None);
        }
        let streamer = if code > 0 {
            self.classes
                .get(&code)
                .ok_or_else(|| {
                    Error::stream_corruption(format!("class code {} has no dictionary entry", code))
                })?
                .streamer
                .clone()
        } else {
            ensure!(
                code != i16::MIN,
                Error::stream_corruption(format!("invalid class code {}", code))
            );
            let code = -code;
            ensure!(
                !self.classes.contains_key(&code),
                Error::stream_corruption(format!("class code {} defined twice", code))
            );
            let wire_name = self.reader.read_utf()?;
            let name = self.registry.rename_of(&wire_name);
            let type_id = self.registry.resolve_name(&name).ok_or_else(|| {
                Error::unsupported_type(format!(
                    "class `{}` in the stream is not registered",
                    wire_name
                ))
            })?;
            let mapping = ClassMapping {
                code,
                name: Arc::from(name),
                streamer: self.registry.resolve(type_id)?,
            };
            log::trace!("class dictionary: `{}` <- {}", mapping.name, mapping.code);
            let streamer = mapping.streamer.clone();
            self.classes.insert(code, mapping);
            streamer
        };
        streamer.read_bare(self).map(Some)
    }

    /// Reads a tagged value and downcasts it to `T`.
    pub fn read_object_as<T: Streamable>(&mut self) -> Result<Option<T>, Error> {
        match self.read_object()? {
            None => Ok(None),
            Some(boxed) => downcast_boxed::<T>(boxed).map(Some),
        }
    }

    /// Reads a payload in bare form as the statically known type `T`.
    pub fn read_bare_as<T: Streamable>(&mut self) -> Result<T, Error> {
        let type_id = TypeId::of::<T>();
        ensure!(
            self.registry.spec_of(type_id).is_some(),
            Error::unsupported_type(format!(
                "type `{}` is not registered",
                std::any::type_name::<T>()
            ))
        );
        let streamer = self.registry.resolve(type_id)?;
        downcast_boxed::<T>(streamer.read_bare(self)?)
    }

    /// Reads a pooled string through the intern dictionary.
    pub fn read_intern(&mut self) -> Result<Option<String>, Error> {
        let code = self.reader.read_i16()?;
        if code == NULL_CODE {
            return Ok(None);
        }
        if code > 0 {
            return self.interns.get(&code).cloned().map(Some).ok_or_else(|| {
                Error::stream_corruption(format!("intern code {} has no dictionary entry", code))
            });
        }
        ensure!(
            code != i16::MIN,
            Error::stream_corruption(format!("invalid intern code {}", code))
        );
        let code = -code;
        ensure!(
            !self.interns.contains_key(&code),
            Error::stream_corruption(format!("intern code {} defined twice", code))
        );
        let value = self.reader.read_utf()?;
        self.interns.insert(code, value.clone());
        Ok(Some(value))
    }

    /// Default field-wise behavior, for custom hooks that delegate part of
    /// their payload back to it. `value` must be of a composite type.
    pub fn read_fields(&mut self, value: &mut (dyn Streamable + 'static)) -> Result<(), Error> {
        let type_id = (*value).as_any().type_id();
        ensure!(
            self.registry.spec_of(type_id).is_some(),
            Error::unsupported_type(format!("type `{}` is not registered", (*value).type_name()))
        );
        let streamer = self.registry.resolve(type_id)?;
        match &*streamer {
            Streamer::Fieldwise(codec) => codec.read_into(value, self),
            Streamer::Hook(codec) => codec.fieldwise().read_into(value, self),
            _ => Err(Error::unsupported(format!(
                "default field streaming applies to composite types, `{}` is not one",
                (*value).type_name()
            ))),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.reader.read_bool()
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        self.reader.read_i8()
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.reader.read_i16()
    }

    pub fn read_char(&mut self) -> Result<char, Error> {
        self.reader.read_char()
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.reader.read_i32()
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.reader.read_i64()
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.reader.read_f32()
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.reader.read_f64()
    }

    pub fn read_utf(&mut self) -> Result<String, Error> {
        self.reader.read_utf()
    }
}
