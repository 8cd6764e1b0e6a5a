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

//! Registration descriptors.
//!
//! A [`TypeSpec`] captures everything the engine would otherwise learn by
//! reflection: the wire name, how to construct a blank instance, how to
//! reach each declared field, and which encoding shape the type has. The
//! descriptors are built once at registration and shared behind `Arc` by
//! the codecs resolved from them.

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::basic::ValueKind;
use crate::codec::collection::CollectionShape;
use crate::error::Error;
use crate::session::{Decoder, Encoder};
use crate::streamable::{downcast_boxed, downcast_mut, downcast_ref, CustomStream, Streamable};

pub(crate) type CreateFn = Box<dyn Fn() -> Box<dyn Streamable> + Send + Sync>;
pub(crate) type EncodeHookFn =
    Box<dyn Fn(&dyn Streamable, &mut Encoder) -> Result<(), Error> + Send + Sync>;
pub(crate) type DecodeHookFn =
    Box<dyn Fn(&mut (dyn Streamable + 'static), &mut Decoder) -> Result<(), Error> + Send + Sync>;
pub(crate) type CollectionWriteFn =
    Box<dyn Fn(&dyn Streamable, &mut Encoder) -> Result<(), Error> + Send + Sync>;
pub(crate) type ObjectGetFn = Box<
    dyn for<'a> Fn(&'a dyn Streamable) -> Result<Option<&'a dyn Streamable>, Error> + Send + Sync,
>;
pub(crate) type ElemGetFn = Box<
    dyn for<'a> Fn(&'a dyn Streamable, usize) -> Result<Option<&'a dyn Streamable>, Error>
        + Send
        + Sync,
>;

/// Funnels keeping the compiler's higher-ranked lifetime inference on the
/// rails when boxing closures that return borrows of their input.
fn object_get<F>(f: F) -> ObjectGetFn
where
    F: for<'a> Fn(&'a dyn Streamable) -> Result<Option<&'a dyn Streamable>, Error>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn elem_get<F>(f: F) -> ElemGetFn
where
    F: for<'a> Fn(&'a dyn Streamable, usize) -> Result<Option<&'a dyn Streamable>, Error>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

/// Getter/setter pair for one primitively typed field.
pub(crate) struct GetSet<V> {
    pub(crate) get: Box<dyn Fn(&dyn Streamable) -> Result<V, Error> + Send + Sync>,
    pub(crate) set: Box<dyn Fn(&mut (dyn Streamable + 'static), V) -> Result<(), Error> + Send + Sync>,
}

pub(crate) enum PrimitiveAccessor {
    Bool(GetSet<bool>),
    I8(GetSet<i8>),
    I16(GetSet<i16>),
    Char(GetSet<char>),
    I32(GetSet<i32>),
    I64(GetSet<i64>),
    F32(GetSet<f32>),
    F64(GetSet<f64>),
}

/// Resolved strategy for reaching and streaming one declared field.
pub(crate) enum Accessor {
    Primitive(PrimitiveAccessor),
    /// Pooled string: travels through the session's intern dictionary.
    Str(GetSet<Option<String>>),
    /// Enum-typed field: travels through the enum codec's nullable bare
    /// form (sentinel encodes null), no class tag.
    Enum {
        elem: TypeId,
        get: Box<dyn Fn(&dyn Streamable) -> Result<Option<Box<dyn Streamable>>, Error> + Send + Sync>,
        set: Box<dyn Fn(&mut (dyn Streamable + 'static), Option<Box<dyn Streamable>>) -> Result<(), Error> + Send + Sync>,
    },
    /// Nested streamable: travels in full tagged form, null as code 0.
    Object {
        get: ObjectGetFn,
        set: Box<dyn Fn(&mut (dyn Streamable + 'static), Option<Box<dyn Streamable>>) -> Result<(), Error> + Send + Sync>,
    },
}

/// One declared, streamable field of a composite type.
///
/// The constructor chosen here *is* the marshalling strategy for the
/// field: it fixes, from the field's declared type, how the content
/// travels on the wire.
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) access: Accessor,
}

macro_rules! primitive_field {
    ($fn_name:ident, $ty:ty, $variant:ident) => {
        #[doc = concat!("A `", stringify!($ty), "` field.")]
        pub fn $fn_name<T: Streamable>(
            name: impl Into<String>,
            get: fn(&T) -> $ty,
            set: fn(&mut T, $ty),
        ) -> FieldSpec {
            FieldSpec {
                name: name.into(),
                access: Accessor::Primitive(PrimitiveAccessor::$variant(GetSet {
                    get: Box::new(move |owner| Ok(get(downcast_ref::<T>(owner)?))),
                    set: Box::new(move |owner, value| {
                        set(downcast_mut::<T>(owner)?, value);
                        Ok(())
                    }),
                })),
            }
        }
    };
}

impl FieldSpec {
    primitive_field!(bool, bool, Bool);
    primitive_field!(i8, i8, I8);
    primitive_field!(i16, i16, I16);
    primitive_field!(char, char, Char);
    primitive_field!(i32, i32, I32);
    primitive_field!(i64, i64, I64);
    primitive_field!(f32, f32, F32);
    primitive_field!(f64, f64, F64);

    /// A nullable string field, pooled through the session's intern
    /// dictionary.
    pub fn string<T: Streamable>(
        name: impl Into<String>,
        get: fn(&T) -> Option<String>,
        set: fn(&mut T, Option<String>),
    ) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            access: Accessor::Str(GetSet {
                get: Box::new(move |owner| Ok(get(downcast_ref::<T>(owner)?))),
                set: Box::new(move |owner, value| {
                    set(downcast_mut::<T>(owner)?, value);
                    Ok(())
                }),
            }),
        }
    }

    /// A nullable field of a registered enum type.
    pub fn enum_of<T: Streamable, E: Streamable + Clone>(
        name: impl Into<String>,
        get: fn(&T) -> Option<E>,
        set: fn(&mut T, Option<E>),
    ) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            access: Accessor::Enum {
                elem: TypeId::of::<E>(),
                get: Box::new(move |owner| {
                    Ok(get(downcast_ref::<T>(owner)?)
                        .map(|value| Box::new(value) as Box<dyn Streamable>))
                }),
                set: Box::new(move |owner, value| {
                    let value = match value {
                        None => None,
                        Some(boxed) => Some(downcast_boxed::<E>(boxed)?),
                    };
                    set(downcast_mut::<T>(owner)?, value);
                    Ok(())
                }),
            },
        }
    }

    /// A nullable field holding a nested streamable of concrete type `V`.
    pub fn object<T: Streamable, V: Streamable>(
        name: impl Into<String>,
        get: fn(&T) -> Option<&V>,
        set: fn(&mut T, Option<V>),
    ) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            access: Accessor::Object {
                get: object_get(move |owner| {
                    Ok(get(downcast_ref::<T>(owner)?).map(|value| value as &dyn Streamable))
                }),
                set: Box::new(move |owner, value| {
                    let value = match value {
                        None => None,
                        Some(boxed) => Some(downcast_boxed::<V>(boxed)?),
                    };
                    set(downcast_mut::<T>(owner)?, value);
                    Ok(())
                }),
            },
        }
    }

    /// A nullable field holding any streamable value (open element type):
    /// the runtime class of the content is tagged on the wire.
    pub fn dyn_object<T: Streamable>(
        name: impl Into<String>,
        get: for<'a> fn(&'a T) -> Option<&'a dyn Streamable>,
        set: fn(&mut T, Option<Box<dyn Streamable>>),
    ) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            access: Accessor::Object {
                get: object_get(move |owner| Ok(get(downcast_ref::<T>(owner)?))),
                set: Box::new(move |owner, value| {
                    set(downcast_mut::<T>(owner)?, value);
                    Ok(())
                }),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Monomorphized access to a homogeneous array value (`Vec<Option<T>>`).
pub(crate) struct ArraySpec {
    pub(crate) elem: TypeId,
    pub(crate) len: Box<dyn Fn(&dyn Streamable) -> Result<usize, Error> + Send + Sync>,
    pub(crate) get: ElemGetFn,
    pub(crate) new_array: Box<dyn Fn(usize) -> Box<dyn Streamable> + Send + Sync>,
    pub(crate) push: Box<dyn Fn(&mut (dyn Streamable + 'static), Option<Box<dyn Streamable>>) -> Result<(), Error> + Send + Sync>,
}

impl ArraySpec {
    pub(crate) fn of<T: Streamable + std::fmt::Debug + PartialEq>() -> ArraySpec {
        ArraySpec {
            elem: TypeId::of::<T>(),
            len: Box::new(|value| Ok(downcast_ref::<Vec<Option<T>>>(value)?.len())),
            get: elem_get(|value, index| {
                Ok(downcast_ref::<Vec<Option<T>>>(value)?[index]
                    .as_ref()
                    .map(|elem| elem as &dyn Streamable))
            }),
            new_array: Box::new(|capacity| {
                Box::new(Vec::<Option<T>>::with_capacity(capacity)) as Box<dyn Streamable>
            }),
            push: Box::new(|array, slot| {
                let array = downcast_mut::<Vec<Option<T>>>(array)?;
                let slot = match slot {
                    None => None,
                    Some(boxed) => Some(downcast_boxed::<T>(boxed)?),
                };
                array.push(slot);
                Ok(())
            }),
        }
    }
}

/// Streamed variant universe of a registered enum type, snapshotted at
/// registration.
pub(crate) struct EnumShape {
    pub(crate) names: Vec<String>,
    pub(crate) codes: Option<Vec<i8>>,
    pub(crate) ordinal_of: Box<dyn Fn(&dyn Streamable) -> Result<usize, Error> + Send + Sync>,
    pub(crate) make: Box<dyn Fn(usize) -> Box<dyn Streamable> + Send + Sync>,
}

/// Write half of a registered collection type; the read half is fixed per
/// shape (collection identity is erased on the wire).
pub(crate) struct CollectionSpec {
    pub(crate) shape: CollectionShape,
    pub(crate) write: CollectionWriteFn,
}

pub(crate) enum TypeShape {
    Composite {
        create: CreateFn,
        fields: Vec<Arc<FieldSpec>>,
        encode_hook: Option<EncodeHookFn>,
        decode_hook: Option<DecodeHookFn>,
    },
    Enum(EnumShape),
    HomogeneousArray(ArraySpec),
    DynArray,
    Collection(CollectionSpec),
    Value(ValueKind),
}

/// A registered type: wire name, runtime identity and encoding shape.
pub struct TypeSpec {
    pub(crate) name: Arc<str>,
    pub(crate) type_id: TypeId,
    pub(crate) shape: TypeShape,
}

impl TypeSpec {
    /// Starts the descriptor of a composite (field-wise streamed) type
    /// whose blank instances come from `Default`.
    pub fn composite<T: Streamable + Default>(name: impl Into<String>) -> CompositeBuilder<T> {
        Self::composite_with(name, || T::default())
    }

    /// Starts the descriptor of a composite type with an explicit
    /// constructor. Resolved once, here.
    pub fn composite_with<T: Streamable>(
        name: impl Into<String>,
        create: fn() -> T,
    ) -> CompositeBuilder<T> {
        CompositeBuilder {
            name: name.into(),
            create: Box::new(move || Box::new(create()) as Box<dyn Streamable>),
            fields: Vec::new(),
            encode_hook: None,
            decode_hook: None,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn create_instance(&self) -> Result<Box<dyn Streamable>, Error> {
        match &self.shape {
            TypeShape::Composite { create, .. } => Ok(create()),
            _ => Err(Error::unsupported(format!(
                "type `{}` has no field-wise instantiation strategy",
                self.name
            ))),
        }
    }

    pub(crate) fn composite_fields(&self) -> Option<&[Arc<FieldSpec>]> {
        match &self.shape {
            TypeShape::Composite { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub(crate) fn hooks(&self) -> Option<(&EncodeHookFn, &DecodeHookFn)> {
        match &self.shape {
            TypeShape::Composite {
                encode_hook: Some(encode),
                decode_hook: Some(decode),
                ..
            } => Some((encode, decode)),
            _ => None,
        }
    }

    pub(crate) fn enum_shape(&self) -> Option<&EnumShape> {
        match &self.shape {
            TypeShape::Enum(shape) => Some(shape),
            _ => None,
        }
    }

    pub(crate) fn collection_spec(&self) -> Option<&CollectionSpec> {
        match &self.shape {
            TypeShape::Collection(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Builder for the descriptor of a composite type.
pub struct CompositeBuilder<T> {
    name: String,
    create: CreateFn,
    fields: Vec<Arc<FieldSpec>>,
    encode_hook: Option<EncodeHookFn>,
    decode_hook: Option<DecodeHookFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Streamable> CompositeBuilder<T> {
    /// Appends a declared field. Declaration order is the registration
    /// order of these calls.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    /// Installs both custom hooks from the type's [`CustomStream`] impl.
    pub fn hooks(self) -> Self
    where
        T: CustomStream,
    {
        self.encode_hook(|value, enc| value.encode(enc))
            .decode_hook(|value, dec| value.decode(dec))
    }

    /// Installs only the encode hook. A type that ends up with exactly one
    /// hook streams field-wise, with a warning.
    pub fn encode_hook(
        mut self,
        hook: fn(&T, &mut Encoder) -> Result<(), Error>,
    ) -> Self {
        self.encode_hook = Some(Box::new(move |value, enc| {
            hook(downcast_ref::<T>(value)?, enc)
        }));
        self
    }

    /// Installs only the decode hook. See [`CompositeBuilder::encode_hook`].
    pub fn decode_hook(
        mut self,
        hook: fn(&mut T, &mut Decoder) -> Result<(), Error>,
    ) -> Self {
        self.decode_hook = Some(Box::new(move |value, dec| {
            hook(downcast_mut::<T>(value)?, dec)
        }));
        self
    }

    pub(crate) fn into_spec(self) -> TypeSpec {
        TypeSpec {
            name: Arc::from(self.name),
            type_id: TypeId::of::<T>(),
            shape: TypeShape::Composite {
                create: self.create,
                fields: self.fields,
                encode_hook: self.encode_hook,
                decode_hook: self.decode_hook,
            },
        }
    }
}

/// Builder for the descriptor of an enum type: the ordered constant
/// universe, with optional single-byte compact codes.
pub struct EnumBuilder<E> {
    name: String,
    variants: Vec<(String, E, Option<i8>)>,
}

impl<E: Streamable + Clone + PartialEq + Send + Sync> EnumBuilder<E> {
    pub fn new(name: impl Into<String>) -> EnumBuilder<E> {
        EnumBuilder {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Appends a constant. Ordinal order is the order of these calls.
    pub fn variant(mut self, name: impl Into<String>, value: E) -> Self {
        self.variants.push((name.into(), value, None));
        self
    }

    /// Appends a constant carrying a compact code in `0..=127`.
    pub fn variant_with_code(mut self, name: impl Into<String>, value: E, code: i8) -> Self {
        self.variants.push((name.into(), value, Some(code)));
        self
    }

    pub(crate) fn into_spec(self) -> Result<TypeSpec, Error> {
        if self.variants.is_empty() {
            return Err(Error::registration(format!(
                "enum `{}` declares no constants",
                self.name
            )));
        }
        let mut names = Vec::with_capacity(self.variants.len());
        let mut values = Vec::with_capacity(self.variants.len());
        let mut codes = Vec::new();
        for (name, value, code) in self.variants {
            if name.is_empty() {
                return Err(Error::registration(format!(
                    "enum `{}` declares a constant with an empty name",
                    self.name
                )));
            }
            if names.contains(&name) {
                return Err(Error::registration(format!(
                    "enum `{}` declares constant `{}` twice",
                    self.name, name
                )));
            }
            if values.contains(&value) {
                return Err(Error::registration(format!(
                    "enum `{}` declares two constants with equal values",
                    self.name
                )));
            }
            if let Some(code) = code {
                if code < 0 {
                    return Err(Error::registration(format!(
                        "compact code {} of `{}::{}` is negative",
                        code, self.name, name
                    )));
                }
                if codes.contains(&code) {
                    return Err(Error::registration(format!(
                        "enum `{}` declares compact code {} twice",
                        self.name, code
                    )));
                }
                codes.push(code);
            }
            names.push(name);
            values.push(value);
        }
        if !codes.is_empty() && codes.len() != names.len() {
            return Err(Error::registration(format!(
                "enum `{}` declares compact codes for only some constants",
                self.name
            )));
        }
        let codes = if codes.is_empty() { None } else { Some(codes) };

        let universe = values.clone();
        let type_name = self.name.clone();
        let ordinal_of = Box::new(move |value: &dyn Streamable| {
            let value = downcast_ref::<E>(value)?;
            values.iter().position(|v| v == value).ok_or_else(|| {
                Error::unsupported(format!(
                    "value is not a declared constant of enum `{}`",
                    type_name
                ))
            })
        });
        let make = Box::new(move |ordinal: usize| {
            Box::new(universe[ordinal].clone()) as Box<dyn Streamable>
        });

        Ok(TypeSpec {
            name: Arc::from(self.name),
            type_id: TypeId::of::<E>(),
            shape: TypeShape::Enum(EnumShape {
                names,
                codes,
                ordinal_of,
                make,
            }),
        })
    }
}
