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

use std::any::Any;
use std::fmt::Debug;

use crate::error::Error;
use crate::session::{Decoder, Encoder};

/// Capability of being carried through an encoder/decoder session as a
/// dynamically typed value.
///
/// Blanket-implemented for every `T: Any + Debug + PartialEq`, so any
/// ordinary value can be handled as a `&dyn Streamable`. Whether a type can
/// actually be *encoded* is a separate question answered by the
/// [`TypeRegistry`] when the value's codec is resolved.
///
/// [`TypeRegistry`]: crate::resolver::registry::TypeRegistry
pub trait Streamable: Any + Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Structural equality across `dyn` boundaries: true iff `other` is the
    /// same concrete type and compares equal.
    fn dyn_eq(&self, other: &dyn Streamable) -> bool;

    /// The Rust type name, for diagnostics only (never on the wire).
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Debug + PartialEq> Streamable for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn dyn_eq(&self, other: &dyn Streamable) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl PartialEq for dyn Streamable {
    fn eq(&self, other: &dyn Streamable) -> bool {
        self.dyn_eq(other)
    }
}

/// Custom encode/decode hooks a composite type may supply in place of the
/// default field-wise behavior.
///
/// Hooks own the whole payload of the value. A hook that wants the default
/// behavior for part of it passes `self` back explicitly:
///
/// ```ignore
/// impl CustomStream for Chunk {
///     fn encode(&self, enc: &mut Encoder) -> Result<(), Error> {
///         enc.write_i32(self.version)?;
///         enc.write_fields(self)
///     }
///
///     fn decode(&mut self, dec: &mut Decoder) -> Result<(), Error> {
///         self.version = dec.read_i32()?;
///         dec.read_fields(self)
///     }
/// }
/// ```
pub trait CustomStream: Streamable {
    fn encode(&self, enc: &mut Encoder) -> Result<(), Error>;

    fn decode(&mut self, dec: &mut Decoder) -> Result<(), Error>;
}

/// A runtime type reference carried as a value.
///
/// Round-trips the registered class name; the decoder applies the rename
/// table to it like it does to class names in object headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef(pub String);

impl ClassRef {
    pub fn new(name: impl Into<String>) -> ClassRef {
        ClassRef(name.into())
    }
}

pub(crate) fn downcast_ref<T: Any>(value: &dyn Streamable) -> Result<&T, Error> {
    value.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::malformed_payload(format!(
            "value of type `{}` where `{}` was declared",
            value.type_name(),
            std::any::type_name::<T>()
        ))
    })
}

pub(crate) fn downcast_mut<'a, T: Any>(value: &'a mut (dyn Streamable + 'static)) -> Result<&'a mut T, Error> {
    let name = (*value).type_name();
    value.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
        Error::malformed_payload(format!(
            "value of type `{}` where `{}` was declared",
            name,
            std::any::type_name::<T>()
        ))
    })
}

pub(crate) fn downcast_boxed<T: Any>(value: Box<dyn Streamable>) -> Result<T, Error> {
    let name = value.type_name();
    value.into_any().downcast::<T>().map(|v| *v).map_err(|_| {
        Error::malformed_payload(format!(
            "value of type `{}` where `{}` was declared",
            name,
            std::any::type_name::<T>()
        ))
    })
}
