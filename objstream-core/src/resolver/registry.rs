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

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use crate::codec::array::{ArrayCodec, HomogeneousArrayCodec};
use crate::codec::basic::{ValueCodec, ValueKind};
use crate::codec::collection::{
    write_counted, write_items, write_pairs, CollectionCodec, CollectionShape,
};
use crate::codec::enum_::EnumCodec;
use crate::codec::fieldwise::FieldwiseCodec;
use crate::codec::hook::CustomHookCodec;
use crate::codec::Streamer;
use crate::config::CodecConfig;
use crate::containers::{DynList, DynMap, DynMultiset, DynSet, Multiset};
use crate::ensure;
use crate::error::Error;
use crate::resolver::spec::{
    ArraySpec, CollectionSpec, CollectionWriteFn, CompositeBuilder, EnumBuilder, TypeShape,
    TypeSpec,
};
use crate::session::{Decoder, Encoder};
use crate::streamable::{downcast_ref, ClassRef, Streamable};

/// The process-wide type service: registration tables, the class-name
/// rename table, and the codec cache.
///
/// A registry is built once, shared (typically behind an `Arc`) by every
/// encoder and decoder session, and holds no session state. Codec
/// resolution is lazy and tolerates concurrent first-resolutions of the
/// same type: the codec is built outside any lock and the first
/// publication wins.
///
/// ```
/// use objstream_core::config::CodecConfig;
/// use objstream_core::resolver::registry::TypeRegistry;
/// use objstream_core::resolver::spec::{FieldSpec, TypeSpec};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Vector3 {
///     x: f32,
///     y: f32,
///     z: f32,
/// }
///
/// let registry = TypeRegistry::new(CodecConfig::default());
/// registry
///     .register(
///         TypeSpec::composite::<Vector3>("geom.Vector3")
///             .field(FieldSpec::f32("x", |v: &Vector3| v.x, |v, x| v.x = x))
///             .field(FieldSpec::f32("y", |v: &Vector3| v.y, |v, y| v.y = y))
///             .field(FieldSpec::f32("z", |v: &Vector3| v.z, |v, z| v.z = z)),
///     )
///     .unwrap();
///
/// let v = Vector3 { x: 1.0, y: 2.0, z: 3.0 };
/// let bytes = registry.encode(&v).unwrap();
/// let back: Option<Vector3> = registry.decode_as(&bytes).unwrap();
/// assert_eq!(back, Some(v));
/// ```
pub struct TypeRegistry {
    config: CodecConfig,
    specs: RwLock<HashMap<TypeId, Arc<TypeSpec>>>,
    names: RwLock<HashMap<String, TypeId>>,
    renames: RwLock<HashMap<String, String>>,
    codecs: RwLock<HashMap<TypeId, Arc<Streamer>>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new(CodecConfig::default())
    }
}

impl TypeRegistry {
    pub fn new(config: CodecConfig) -> TypeRegistry {
        let registry = TypeRegistry {
            config,
            specs: RwLock::new(HashMap::new()),
            names: RwLock::new(HashMap::new()),
            renames: RwLock::new(HashMap::new()),
            codecs: RwLock::new(HashMap::new()),
        };
        registry
            .register_builtins()
            .expect("built-in type table registration");
        registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Registers a composite type from its builder.
    pub fn register<T: Streamable>(&self, builder: CompositeBuilder<T>) -> Result<(), Error> {
        self.insert_spec(builder.into_spec(), false)
    }

    /// Registers an enum type from its builder, snapshotting the constant
    /// universe.
    pub fn register_enum<E: Streamable + Clone + PartialEq + Send + Sync>(
        &self,
        builder: EnumBuilder<E>,
    ) -> Result<(), Error> {
        self.insert_spec(builder.into_spec()?, false)
    }

    /// Registers `Vec<Option<T>>` as a homogeneous array of the already
    /// registered element type `T`. `T` is concrete, so no per-element
    /// class tags are needed: null slots are tracked by a bit mask.
    pub fn register_array_of<T: Streamable + Debug + PartialEq>(&self) -> Result<(), Error> {
        let elem_name = self
            .spec_of(TypeId::of::<T>())
            .ok_or_else(|| {
                Error::registration(format!(
                    "array element type `{}` must be registered first",
                    std::any::type_name::<T>()
                ))
            })?
            .name
            .clone();
        self.insert_spec(
            TypeSpec {
                name: Arc::from(format!("{}[]", elem_name)),
                type_id: TypeId::of::<Vec<Option<T>>>(),
                shape: TypeShape::HomogeneousArray(ArraySpec::of::<T>()),
            },
            false,
        )
    }

    /// Registers `Vec<T>` under the List shape.
    pub fn register_list_of<T: Streamable>(&self) -> Result<(), Error> {
        self.insert_collection::<Vec<T>>(
            CollectionShape::List,
            Box::new(|value, enc| {
                let list = downcast_ref::<Vec<T>>(value)?;
                write_items(
                    list.iter().map(|item| Some(item as &dyn Streamable)),
                    list.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `HashSet<T>` under the Set shape.
    pub fn register_set_of<T: Streamable + Eq + Hash>(&self) -> Result<(), Error> {
        self.insert_collection::<HashSet<T>>(
            CollectionShape::Set,
            Box::new(|value, enc| {
                let set = downcast_ref::<HashSet<T>>(value)?;
                write_items(
                    set.iter().map(|item| Some(item as &dyn Streamable)),
                    set.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `BTreeSet<T>` under the Set shape.
    pub fn register_sorted_set_of<T: Streamable + Ord>(&self) -> Result<(), Error> {
        self.insert_collection::<BTreeSet<T>>(
            CollectionShape::Set,
            Box::new(|value, enc| {
                let set = downcast_ref::<BTreeSet<T>>(value)?;
                write_items(
                    set.iter().map(|item| Some(item as &dyn Streamable)),
                    set.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `HashMap<K, V>` under the Map shape.
    pub fn register_map_of<K: Streamable + Eq + Hash, V: Streamable>(&self) -> Result<(), Error> {
        self.insert_collection::<HashMap<K, V>>(
            CollectionShape::Map,
            Box::new(|value, enc| {
                let map = downcast_ref::<HashMap<K, V>>(value)?;
                write_pairs(
                    map.iter()
                        .map(|(k, v)| (k as &dyn Streamable, Some(v as &dyn Streamable))),
                    map.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `BTreeMap<K, V>` under the Map shape.
    pub fn register_sorted_map_of<K: Streamable + Ord, V: Streamable>(&self) -> Result<(), Error> {
        self.insert_collection::<BTreeMap<K, V>>(
            CollectionShape::Map,
            Box::new(|value, enc| {
                let map = downcast_ref::<BTreeMap<K, V>>(value)?;
                write_pairs(
                    map.iter()
                        .map(|(k, v)| (k as &dyn Streamable, Some(v as &dyn Streamable))),
                    map.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `Multiset<T>` under the Multiset shape.
    pub fn register_multiset_of<T: Streamable + Eq + Hash>(&self) -> Result<(), Error> {
        self.insert_collection::<Multiset<T>>(
            CollectionShape::Multiset,
            Box::new(|value, enc| {
                let multiset = downcast_ref::<Multiset<T>>(value)?;
                write_counted(
                    multiset.iter().map(|(elem, n)| (elem as &dyn Streamable, n)),
                    multiset.distinct_len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `LinkedList<T>` under the plain Collection shape.
    pub fn register_collection_of<T: Streamable>(&self) -> Result<(), Error> {
        self.insert_collection::<LinkedList<T>>(
            CollectionShape::Collection,
            Box::new(|value, enc| {
                let list = downcast_ref::<LinkedList<T>>(value)?;
                write_items(
                    list.iter().map(|item| Some(item as &dyn Streamable)),
                    list.len(),
                    enc,
                )
            }),
        )
    }

    /// Registers `VecDeque<T>` under the Iterable shape: the sequence is
    /// materialized to list form for writing.
    pub fn register_iterable_of<T: Streamable>(&self) -> Result<(), Error> {
        self.insert_collection::<VecDeque<T>>(
            CollectionShape::Iterable,
            Box::new(|value, enc| {
                let deque = downcast_ref::<VecDeque<T>>(value)?;
                write_items(
                    deque.iter().map(|item| Some(item as &dyn Streamable)),
                    deque.len(),
                    enc,
                )
            }),
        )
    }

    /// Maps a retired class name to the name it should resolve as. Applied
    /// to class names read from streams, before lookup.
    pub fn register_rename(&self, old: impl Into<String>, new: impl Into<String>) {
        self.renames.write().unwrap().insert(old.into(), new.into());
    }

    pub(crate) fn rename_of(&self, name: &str) -> String {
        self.renames
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_owned())
    }

    pub(crate) fn spec_of(&self, type_id: TypeId) -> Option<Arc<TypeSpec>> {
        self.specs.read().unwrap().get(&type_id).cloned()
    }

    pub(crate) fn resolve_name(&self, name: &str) -> Option<TypeId> {
        self.names.read().unwrap().get(name).copied()
    }

    /// Resolves the codec for a type. Idempotent; concurrent first
    /// resolutions may both build, the first to publish wins.
    pub(crate) fn resolve(&self, type_id: TypeId) -> Result<Arc<Streamer>, Error> {
        if let Some(streamer) = self.codecs.read().unwrap().get(&type_id) {
            return Ok(streamer.clone());
        }
        let spec = self
            .spec_of(type_id)
            .ok_or_else(|| Error::unsupported_type("type is not registered"))?;
        let streamer = Arc::new(self.build_streamer(&spec)?);
        let mut codecs = self.codecs.write().unwrap();
        Ok(codecs.entry(type_id).or_insert(streamer).clone())
    }

    fn build_streamer(&self, spec: &Arc<TypeSpec>) -> Result<Streamer, Error> {
        match &spec.shape {
            TypeShape::Collection(_) => Ok(Streamer::Collection(CollectionCodec::new(spec.clone()))),
            TypeShape::HomogeneousArray(array) => {
                let delegate = self.resolve(array.elem).map_err(|_| {
                    Error::unsupported_type(format!(
                        "element type of array `{}` has no resolvable codec",
                        spec.name
                    ))
                })?;
                Ok(Streamer::HomogeneousArray(HomogeneousArrayCodec::new(
                    spec.clone(),
                    delegate,
                )))
            }
            TypeShape::DynArray => Ok(Streamer::Array(ArrayCodec)),
            TypeShape::Enum(_) => Ok(Streamer::Enum(EnumCodec::new(
                spec.clone(),
                self.config.get_enum_policy(),
            ))),
            TypeShape::Composite {
                encode_hook,
                decode_hook,
                ..
            } => {
                match (encode_hook.is_some(), decode_hook.is_some()) {
                    (true, true) => Ok(Streamer::Hook(CustomHookCodec::new(
                        spec.clone(),
                        self.config.get_field_order(),
                    ))),
                    (false, false) => Ok(Streamer::Fieldwise(FieldwiseCodec::new(
                        spec.clone(),
                        self.config.get_field_order(),
                    ))),
                    _ => {
                        log::warn!(
                            "type `{}` declares only one custom stream hook; streaming it field-wise",
                            spec.name
                        );
                        Ok(Streamer::Fieldwise(FieldwiseCodec::new(
                            spec.clone(),
                            self.config.get_field_order(),
                        )))
                    }
                }
            }
            TypeShape::Value(kind) => Ok(Streamer::Value(ValueCodec::new(*kind))),
        }
    }

    /// Opens an encoder session over a fresh output buffer.
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(self)
    }

    /// Opens a decoder session over `bytes`.
    pub fn decoder<'a>(&'a self, bytes: &'a [u8]) -> Decoder<'a> {
        Decoder::new(self, bytes)
    }

    /// One-shot encode of a single top-level value.
    pub fn encode(&self, value: &dyn Streamable) -> Result<Vec<u8>, Error> {
        let mut enc = self.encoder();
        enc.write_object(Some(value))?;
        Ok(enc.into_bytes())
    }

    /// One-shot decode of a single top-level value.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<Box<dyn Streamable>>, Error> {
        self.decoder(bytes).read_object()
    }

    /// One-shot decode downcast to a concrete type.
    pub fn decode_as<T: Streamable>(&self, bytes: &[u8]) -> Result<Option<T>, Error> {
        self.decoder(bytes).read_object_as::<T>()
    }

    fn insert_value<T: Any>(&self, name: &str, kind: ValueKind) -> Result<(), Error> {
        self.insert_spec(
            TypeSpec {
                name: Arc::from(name),
                type_id: TypeId::of::<T>(),
                shape: TypeShape::Value(kind),
            },
            false,
        )
    }

    fn insert_collection<C: Any>(
        &self,
        shape: CollectionShape,
        write: CollectionWriteFn,
    ) -> Result<(), Error> {
        self.insert_spec(
            TypeSpec {
                name: Arc::from(shape.wire_name()),
                type_id: TypeId::of::<C>(),
                shape: TypeShape::Collection(CollectionSpec { shape, write }),
            },
            true,
        )
    }

    /// Collection registrations share their shape's wire name; everything
    /// else must claim an unused one.
    fn insert_spec(&self, spec: TypeSpec, shared_name: bool) -> Result<(), Error> {
        let mut specs = self.specs.write().unwrap();
        let mut names = self.names.write().unwrap();
        ensure!(
            !specs.contains_key(&spec.type_id),
            Error::registration(format!("type `{}` is already registered", spec.name))
        );
        match names.get(spec.name.as_ref()) {
            Some(_) if shared_name => {}
            Some(_) => {
                return Err(Error::registration(format!(
                    "class name `{}` is already registered",
                    spec.name
                )))
            }
            None => {
                names.insert(spec.name.to_string(), spec.type_id);
            }
        }
        specs.insert(spec.type_id, Arc::new(spec));
        Ok(())
    }

    fn register_builtins(&self) -> Result<(), Error> {
        self.insert_value::<bool>("bool", ValueKind::Bool)?;
        self.insert_value::<i8>("i8", ValueKind::I8)?;
        self.insert_value::<i16>("i16", ValueKind::I16)?;
        self.insert_value::<char>("char", ValueKind::Char)?;
        self.insert_value::<i32>("i32", ValueKind::I32)?;
        self.insert_value::<i64>("i64", ValueKind::I64)?;
        self.insert_value::<f32>("f32", ValueKind::F32)?;
        self.insert_value::<f64>("f64", ValueKind::F64)?;
        self.insert_value::<String>("String", ValueKind::Str)?;
        self.insert_value::<ClassRef>("Class", ValueKind::Class)?;

        self.insert_value::<Vec<bool>>("bool[]", ValueKind::BoolArray)?;
        self.insert_value::<Vec<i8>>("i8[]", ValueKind::I8Array)?;
        self.insert_value::<Vec<u8>>("u8[]", ValueKind::U8Array)?;
        self.insert_value::<Vec<i16>>("i16[]", ValueKind::I16Array)?;
        self.insert_value::<Vec<i32>>("i32[]", ValueKind::I32Array)?;
        self.insert_value::<Vec<i64>>("i64[]", ValueKind::I64Array)?;
        self.insert_value::<Vec<f32>>("f32[]", ValueKind::F32Array)?;
        self.insert_value::<Vec<f64>>("f64[]", ValueKind::F64Array)?;
        self.insert_value::<Vec<char>>("char[]", ValueKind::CharArray)?;

        self.insert_spec(
            TypeSpec {
                name: Arc::from("any[]"),
                type_id: TypeId::of::<Vec<Option<Box<dyn Streamable>>>>(),
                shape: TypeShape::DynArray,
            },
            false,
        )?;

        self.insert_collection::<DynList>(
            CollectionShape::List,
            Box::new(|value, enc| {
                let list = downcast_ref::<DynList>(value)?;
                write_items(list.iter(), list.len(), enc)
            }),
        )?;
        self.insert_collection::<DynSet>(
            CollectionShape::Set,
            Box::new(|value, enc| {
                let set = downcast_ref::<DynSet>(value)?;
                write_items(set.iter().map(Some), set.len(), enc)
            }),
        )?;
        self.insert_collection::<DynMap>(
            CollectionShape::Map,
            Box::new(|value, enc| {
                let map = downcast_ref::<DynMap>(value)?;
                write_pairs(map.iter(), map.len(), enc)
            }),
        )?;
        self.insert_collection::<DynMultiset>(
            CollectionShape::Multiset,
            Box::new(|value, enc| {
                let multiset = downcast_ref::<DynMultiset>(value)?;
                write_counted(multiset.iter(), multiset.distinct_len(), enc)
            }),
        )?;
        Ok(())
    }
}
