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

/// Wire encoding used for every enum streamed by a registry.
///
/// This is a protocol version switch, chosen once when the registry is
/// built: both ends of a stream must be configured with the same policy
/// out of band, because nothing on the wire identifies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumPolicy {
    /// Constants travel as their `u16`-length-prefixed UTF-8 name.
    ByName,
    /// Constants travel as the single-byte compact code declared at
    /// registration. Types that declared no codes fall back to [`ByName`].
    ///
    /// [`ByName`]: EnumPolicy::ByName
    ByCompactCode,
    /// Constants travel as a fixed-width index into the declared constant
    /// sequence; the width (1, 2 or 4 bytes) is picked from the enum's
    /// cardinality when its codec is built.
    ///
    /// Reordering an enum's constants between encode and decode makes the
    /// stored index land on a different constant. That hazard is inherent
    /// to this policy and deliberately left undefined.
    ByOrdinal,
}

/// Order in which a composite type's fields are streamed.
///
/// The order is computed independently on both sides from the same
/// registration data; it is never transmitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// Fields stream in the order they were registered.
    #[default]
    Declaration,
    /// Fields stream sorted by name.
    Alphabetical,
}

/// Configuration threaded into a [`TypeRegistry`] at construction.
///
/// ```
/// use objstream_core::config::{CodecConfig, EnumPolicy, FieldOrder};
///
/// let config = CodecConfig::default()
///     .enum_policy(EnumPolicy::ByOrdinal)
///     .field_order(FieldOrder::Alphabetical);
/// ```
///
/// [`TypeRegistry`]: crate::resolver::registry::TypeRegistry
#[derive(Clone, Debug)]
pub struct CodecConfig {
    enum_policy: EnumPolicy,
    field_order: FieldOrder,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            enum_policy: EnumPolicy::ByName,
            field_order: FieldOrder::Declaration,
        }
    }
}

impl CodecConfig {
    /// Sets the enum wire encoding. Returns `self` for chaining.
    pub fn enum_policy(mut self, policy: EnumPolicy) -> Self {
        self.enum_policy = policy;
        self
    }

    /// Sets the field streaming order. Returns `self` for chaining.
    pub fn field_order(mut self, order: FieldOrder) -> Self {
        self.field_order = order;
        self
    }

    pub fn get_enum_policy(&self) -> EnumPolicy {
        self.enum_policy
    }

    pub fn get_field_order(&self) -> FieldOrder {
        self.field_order
    }
}
