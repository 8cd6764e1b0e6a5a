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
use std::sync::OnceLock;

use crate::codec::fieldwise::FieldwiseCodec;
use crate::config::FieldOrder;
use crate::error::Error;
use crate::resolver::spec::{DecodeHookFn, EncodeHookFn, TypeSpec};
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

/// Codec for a composite type that supplies both custom hooks. The hooks
/// own the payload; the inner field-wise codec is built only if a hook
/// ever delegates back to default field behavior.
pub(crate) struct CustomHookCodec {
    spec: Arc<TypeSpec>,
    order: FieldOrder,
    fieldwise: OnceLock<FieldwiseCodec>,
}

impl CustomHookCodec {
    pub(crate) fn new(spec: Arc<TypeSpec>, order: FieldOrder) -> CustomHookCodec {
        CustomHookCodec {
            spec,
            order,
            fieldwise: OnceLock::new(),
        }
    }

    fn hooks(&self) -> (&EncodeHookFn, &DecodeHookFn) {
        self.spec.hooks().expect("hook codec built without hooks")
    }

    pub(crate) fn fieldwise(&self) -> &FieldwiseCodec {
        self.fieldwise
            .get_or_init(|| FieldwiseCodec::new(self.spec.clone(), self.order))
    }

    pub(crate) fn write(&self, value: &dyn Streamable, enc: &mut Encoder) -> Result<(), Error> {
        (self.hooks().0)(value, enc)
    }

    pub(crate) fn read(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        let mut value = self.spec.create_instance()?;
        (self.hooks().1)(&mut *value, dec)?;
        Ok(value)
    }
}
