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

//! # objstream Core
//!
//! Core engine of the objstream codec: a compact, session-scoped binary
//! format for arbitrary application object graphs.
//!
//! ## Architecture
//!
//! - **`buffer`**: big-endian binary buffer management with `Writer`/`Reader`
//! - **`mask`**: the null-slot bitset used by homogeneous arrays
//! - **`streamable`**: the dynamic value capability and custom-hook trait
//! - **`containers`**: the dynamic collection values decoding produces
//! - **`resolver`**: type registration descriptors and the `TypeRegistry`
//! - **`codec`**: the per-type codec variants (field-wise, hooks, arrays,
//!   enums, collections, built-in values)
//! - **`session`**: `Encoder`/`Decoder` sessions owning the class and
//!   intern dictionaries
//! - **`config`**: the registry-wide protocol switches
//! - **`error`**: error handling
//!
//! ## Key concepts
//!
//! A `TypeRegistry` is the process-wide service every session shares: it
//! maps runtime types to lazily resolved, cached codecs. Sessions are
//! cheap and single-use; their class and intern dictionaries make repeated
//! type names and pooled strings cost two bytes after first sight. Codes
//! are only meaningful inside one matched encoder/decoder pair — this is
//! not a durable storage format.
//!
//! ```
//! use objstream_core::config::CodecConfig;
//! use objstream_core::resolver::registry::TypeRegistry;
//! use objstream_core::resolver::spec::{FieldSpec, TypeSpec};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Particle {
//!     life: i32,
//!     texture: Option<String>,
//! }
//!
//! let registry = TypeRegistry::new(CodecConfig::default());
//! registry
//!     .register(
//!         TypeSpec::composite::<Particle>("fx.Particle")
//!             .field(FieldSpec::i32("life", |p: &Particle| p.life, |p, v| p.life = v))
//!             .field(FieldSpec::string(
//!                 "texture",
//!                 |p: &Particle| p.texture.clone(),
//!                 |p, v| p.texture = v,
//!             )),
//!     )
//!     .unwrap();
//!
//! let particle = Particle { life: 120, texture: Some("spark".to_owned()) };
//! let bytes = registry.encode(&particle).unwrap();
//! assert_eq!(registry.decode_as::<Particle>(&bytes).unwrap(), Some(particle));
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod containers;
pub mod error;
pub mod mask;
pub mod resolver;
pub mod session;
pub mod streamable;

pub use buffer::{Reader, Writer};
pub use codec::array::MAX_ARRAY_LEN;
pub use codec::collection::CollectionShape;
pub use config::{CodecConfig, EnumPolicy, FieldOrder};
pub use containers::{DynList, DynMap, DynMultiset, DynSet, Multiset};
pub use error::Error;
pub use mask::ArrayMask;
pub use resolver::registry::TypeRegistry;
pub use resolver::spec::{CompositeBuilder, EnumBuilder, FieldSpec, TypeSpec};
pub use session::{Decoder, Encoder};
pub use streamable::{ClassRef, CustomStream, Streamable};
