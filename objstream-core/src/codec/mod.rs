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

//! Codec variants. One [`Streamer`] is resolved per registered type and
//! cached for the lifetime of the registry; a streamer only describes how
//! values of its type are encoded and holds no session state.

pub mod array;
pub mod basic;
pub mod collection;
pub mod enum_;
pub mod fieldwise;
pub mod hook;
pub mod marshaller;

use crate::error::Error;
use crate::session::{Decoder, Encoder};
use crate::streamable::Streamable;

use self::array::{ArrayCodec, HomogeneousArrayCodec};
use self::basic::ValueCodec;
use self::collection::CollectionCodec;
use self::enum_::EnumCodec;
use self::fieldwise::FieldwiseCodec;
use self::hook::CustomHookCodec;

pub(crate) enum Streamer {
    Value(ValueCodec),
    Fieldwise(FieldwiseCodec),
    Hook(CustomHookCodec),
    Array(ArrayCodec),
    HomogeneousArray(HomogeneousArrayCodec),
    Enum(EnumCodec),
    Collection(CollectionCodec),
}

impl Streamer {
    /// Writes the payload of `value` without any class-code header.
    pub(crate) fn write_bare(
        &self,
        value: &dyn Streamable,
        enc: &mut Encoder,
    ) -> Result<(), Error> {
        match self {
            Streamer::Value(codec) => codec.write(value, enc),
            Streamer::Fieldwise(codec) => codec.write(value, enc),
            Streamer::Hook(codec) => codec.write(value, enc),
            Streamer::Array(codec) => codec.write(value, enc),
            Streamer::HomogeneousArray(codec) => codec.write(value, enc),
            Streamer::Enum(codec) => codec.write_value(value, enc),
            Streamer::Collection(codec) => codec.write(value, enc),
        }
    }

    /// Reads one payload in bare form, producing the decoded value.
    pub(crate) fn read_bare(&self, dec: &mut Decoder) -> Result<Box<dyn Streamable>, Error> {
        match self {
            Streamer::Value(codec) => codec.read(dec),
            Streamer::Fieldwise(codec) => codec.read(dec),
            Streamer::Hook(codec) => codec.read(dec),
            Streamer::Array(codec) => codec.read(dec),
            Streamer::HomogeneousArray(codec) => codec.read(dec),
            Streamer::Enum(codec) => codec.read_value(dec),
            Streamer::Collection(codec) => codec.read(dec),
        }
    }
}
