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

use crate::codec::marshaller::FieldMarshaller;
use crate::config::FieldOrder;
use crate::error::Error;
use crate::resolver::spec::TypeSpec;
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

/// Default codec for a composite type: each declared field streamed in a
/// fixed order that both sides compute locally from the registration data.
pub(crate) struct FieldwiseCodec {
    spec: Arc<TypeSpec>,
    fields: Vec<FieldMarshaller>,
}

impl FieldwiseCodec {
    pub(crate) fn new(spec: Arc<TypeSpec>, order: FieldOrder) -> FieldwiseCodec {
        let mut fields: Vec<FieldMarshaller> = spec
            .composite_fields()
            .unwrap_or(&[])
            .iter()
            .cloned()
            .map(FieldMarshaller::new)
            .collect();
        if order == FieldOrder::Alphabetical {
            fields.sort_by(|a, b| a.name().cmp(b.name()));
        }
        FieldwiseCodec { spec, fields }
    }

    pub(crate) fn type_name(&self) -> &str {
        self.spec.name()
    }

    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        for field in &self.fields {
            field
                .write(value, enc)
                .map_err(|e| Error::field_marshal(self.type_name(), field.name(), e))?;
        }
        Ok(())
    }

    /// Populates an existing instance. Stops early, without error, once the
    /// payload is exhausted: a stream written against an older schema with
    /// fewer trailing fields leaves the newer fields at their constructed
    /// defaults.
    pub(crate) fn read_into(
        &self,
        value: &mut (dyn Streamable + 'static),
        dec: &mut Decoder,
    ) -> Result<(), Error> {
        for field in &self.fields {
            if dec.reader.is_empty() {
                break;
            }
            field
                .read(value, dec)
                .map_err(|e| Error::field_marshal(self.type_name(), field.name(), e))?;
        }
        Ok(())
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        let mut value = self.spec.create_instance()?;
        self.read_into(&mut *value, dec)?;
        Ok(value)
    }
}
