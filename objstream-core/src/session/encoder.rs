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

use crate::buffer::Writer;
use crate::codec::Streamer;
use crate::ensure;
use crate::error::Error;
use crate::resolver::registry::TypeRegistry;
use crate::session::{ClassMapping, NULL_CODE};
use crate::streamable::Streamable;

/// Encoder session: writes an object graph to an owned byte buffer,
/// building the class and intern dictionaries as it goes.
///
/// Not for concurrent use; one session serves one stream, synchronously.
pub struct Encoder<'r> {
    registry: &'r TypeRegistry,
    pub(crate) writer: Writer,
    classes: HashMap<TypeId, ClassMapping>,
    next_class: i32,
    interns: HashMap<String, i16>,
    next_intern: i32,
}

impl<'r> Encoder<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry) -> Encoder<'r> {
        Encoder {
            registry,
            writer: Writer::new(),
            classes: HashMap::new(),
            next_class: 1,
            interns: HashMap::new(),
            next_intern: 1,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Writes a value in tagged form: a class-code header, then the
    /// payload. Null is the single code 0. The first sight of a class in
    /// this session emits `(-code, name)` and defines the code; later
    /// sights emit the bare positive code.
    pub fn write_object(&mut self, value: Option<&dyn Streamable>) -> Result<(), Error> {
        let value = match value {
            None => {
                self.writer.write_i16(NULL_CODE);
                return Ok(());
            }
            Some(value) => value,
        };
        let type_id = value.as_any().type_id();
        let reused = self
            .classes
            .get(&type_id)
            .map(|mapping| (mapping.code, mapping.streamer.clone()));
        let streamer = match reused {
            Some((code, streamer)) => {
                self.writer.write_i16(code);
                streamer
            }
            None => {
                let spec = self.registry.spec_of(type_id).ok_or_else(|| {
                    Error::unsupported_type(format!(
                        "type `{}` is not registered",
                        value.type_name()
                    ))
                })?;
                let streamer = self.registry.resolve(type_id)?;
                ensure!(
                    self.next_class <= i16::MAX as i32,
                    Error::code_space_exhausted(format!(
                        "more than {} distinct classes in one session",
                        i16::MAX
                    ))
                );
                let mapping = ClassMapping {
                    code: self.next_class as i16,
                    name: spec.name.clone(),
                    streamer,
                };
                self.next_class += 1;
                self.writer.write_i16(-mapping.code);
                self.writer.write_utf(&mapping.name)?;
                log::trace!("class dictionary: `{}` -> {}", mapping.name, mapping.code);
                let streamer = mapping.streamer.clone();
                self.classes.insert(type_id, mapping);
                streamer
            }
        };
        streamer.write_bare(value, self)
    }

    /// Writes a payload without its class-code header, for paths where the
    /// reader knows the concrete type out of band (array elements, hook
    /// internals).
    pub fn write_bare(&mut self, value: &dyn Streamable) -> Result<(), Error> {
        let type_id = value.as_any().type_id();
        ensure!(
            self.registry.spec_of(type_id).is_some(),
            Error::unsupported_type(format!("type `{}` is not registered", value.type_name()))
        );
        let streamer = self.registry.resolve(type_id)?;
        streamer.write_bare(value, self)
    }

    /// Writes a pooled string through the intern dictionary: the literal
    /// bytes travel once, every later occurrence is a bare code.
    pub fn write_intern(&mut self, value: Option<&str>) -> Result<(), Error> {
        let value = match value {
            None => {
                self.writer.write_i16(NULL_CODE);
                return Ok(());
            }
            Some(value) => value,
        };
        if let Some(&code) = self.interns.get(value) {
            self.writer.write_i16(code);
            return Ok(());
        }
        ensure!(
            self.next_intern <= i16::MAX as i32,
            Error::code_space_exhausted(format!(
                "more than {} interned strings in one session",
                i16::MAX
            ))
        );
        let code = self.next_intern as i16;
        self.next_intern += 1;
        self.interns.insert(value.to_owned(), code);
        self.writer.write_i16(-code);
        self.writer.write_utf(value)
    }

    /// Default field-wise behavior, for custom hooks that delegate part of
    /// their payload back to it. `value` must be of a composite type.
    pub fn write_fields(&mut self, value: &dyn Streamable) -> Result<(), Error> {
        let type_id = value.as_any().type_id();
        ensure!(
            self.registry.spec_of(type_id).is_some(),
            Error::unsupported_type(format!("type `{}` is not registered", value.type_name()))
        );
        let streamer = self.registry.resolve(type_id)?;
        match &*streamer {
            Streamer::Fieldwise(codec) => codec.write(value, self),
            Streamer::Hook(codec) => codec.fieldwise().write(value, self),
            _ => Err(Error::unsupported(format!(
                "default field streaming applies to composite types, `{}` is not one",
                value.type_name()
            ))),
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.writer.write_bool(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.writer.write_i8(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.writer.write_i16(value);
    }

    pub fn write_char(&mut self, value: char) {
        self.writer.write_char(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.writer.write_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.writer.write_i64(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.writer.write_f32(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.writer.write_f64(value);
    }

    pub fn write_utf(&mut self, value: &str) -> Result<(), Error> {
        self.writer.write_utf(value)
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        self.writer.as_slice()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}
