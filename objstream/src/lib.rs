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

//! # objstream
//!
//! A compact, session-scoped binary codec for application object graphs:
//! dynamic per-type codec resolution with a process-wide cache, a stateful
//! wire protocol with incremental class and string dictionaries, and
//! polymorphic encoding strategies for composite types, custom hooks,
//! arrays, enums and collections.
//!
//! ## Quick start
//!
//! Types opt in by registration: the [`TypeRegistry`] is told the wire
//! name, the constructor, and one accessor pair per streamed field. After
//! that any registered value — nested, collected, arrayed — round-trips
//! through an [`Encoder`]/[`Decoder`] pair.
//!
//! ```
//! use objstream::{CodecConfig, FieldSpec, TypeRegistry, TypeSpec};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Emitter {
//!     rate: f32,
//!     name: Option<String>,
//! }
//!
//! let registry = TypeRegistry::new(CodecConfig::default());
//! registry
//!     .register(
//!         TypeSpec::composite::<Emitter>("fx.Emitter")
//!             .field(FieldSpec::f32("rate", |e: &Emitter| e.rate, |e, v| e.rate = v))
//!             .field(FieldSpec::string(
//!                 "name",
//!                 |e: &Emitter| e.name.clone(),
//!                 |e, v| e.name = v,
//!             )),
//!     )
//!     .unwrap();
//!
//! let emitter = Emitter { rate: 44.0, name: Some("smoke".to_owned()) };
//! let bytes = registry.encode(&emitter).unwrap();
//! let back = registry.decode_as::<Emitter>(&bytes).unwrap();
//! assert_eq!(back, Some(emitter));
//! ```
//!
//! ## Sessions and dictionaries
//!
//! An encoder and the decoder that consumes its output form one session
//! pair. The first time a class or a pooled string is written, its name or
//! literal bytes travel once and get a small positive code; every later
//! occurrence is just that code. Codes are allocated in first-sight order
//! and are meaningless outside the pair — this is a transport format, not
//! a durable one.

pub use objstream_core::buffer;
pub use objstream_core::codec;
pub use objstream_core::config;
pub use objstream_core::containers;
pub use objstream_core::error;
pub use objstream_core::mask;
pub use objstream_core::resolver;
pub use objstream_core::session;
pub use objstream_core::streamable;

pub use objstream_core::{
    ArrayMask, ClassRef, CodecConfig, CollectionShape, CompositeBuilder, CustomStream, Decoder,
    DynList, DynMap, DynMultiset, DynSet, Encoder, EnumBuilder, EnumPolicy, Error, FieldOrder,
    FieldSpec, Multiset, Reader, Streamable, TypeRegistry, TypeSpec, Writer, MAX_ARRAY_LEN,
};
