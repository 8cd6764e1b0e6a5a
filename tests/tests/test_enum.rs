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

use objstream::error::Error;
use objstream::{
    CodecConfig, EnumBuilder, EnumPolicy, FieldSpec, Streamable, TypeRegistry, TypeSpec,
};

#[derive(Debug, Clone, PartialEq)]
enum Blend {
    Alpha,
    Additive,
    Multiply,
}

fn register_blend(registry: &TypeRegistry) {
    registry
        .register_enum(
            EnumBuilder::<Blend>::new("fx.Blend")
                .variant("ALPHA", Blend::Alpha)
                .variant("ADDITIVE", Blend::Additive)
                .variant("MULTIPLY", Blend::Multiply),
        )
        .unwrap();
}

fn register_blend_with_codes(registry: &TypeRegistry) {
    registry
        .register_enum(
            EnumBuilder::<Blend>::new("fx.Blend")
                .variant_with_code("ALPHA", Blend::Alpha, 10)
                .variant_with_code("ADDITIVE", Blend::Additive, 20)
                .variant_with_code("MULTIPLY", Blend::Multiply, 30),
        )
        .unwrap();
}

fn round_trip(registry: &TypeRegistry, value: Blend) {
    let bytes = registry.encode(&value).unwrap();
    assert_eq!(registry.decode_as::<Blend>(&bytes).unwrap(), Some(value));
}

#[test]
fn by_name_round_trip() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByName));
    register_blend(&registry);
    round_trip(&registry, Blend::Alpha);
    round_trip(&registry, Blend::Additive);
    round_trip(&registry, Blend::Multiply);
}

#[test]
fn by_compact_code_round_trip() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByCompactCode));
    register_blend_with_codes(&registry);
    round_trip(&registry, Blend::Alpha);
    round_trip(&registry, Blend::Multiply);

    // Re-pooled class code (2) + one compact byte.
    let mut enc = registry.encoder();
    enc.write_object(Some(&Blend::Alpha as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&Blend::Multiply as &dyn Streamable)).unwrap();
    assert_eq!(enc.len() - first_len, 3);
}

#[test]
fn compact_policy_without_codes_falls_back_to_names() {
    let writer = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByCompactCode));
    let reader = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByCompactCode));
    register_blend(&writer);
    register_blend(&reader);

    let bytes = writer.encode(&Blend::Additive).unwrap();
    assert_eq!(reader.decode_as::<Blend>(&bytes).unwrap(), Some(Blend::Additive));

    // The payload is the constant name, not a single byte.
    let mut enc = writer.encoder();
    enc.write_object(Some(&Blend::Additive as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&Blend::Additive as &dyn Streamable)).unwrap();
    assert_eq!(enc.len() - first_len, 2 + 2 + "ADDITIVE".len());
}

#[test]
fn by_ordinal_round_trip() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByOrdinal));
    register_blend(&registry);
    round_trip(&registry, Blend::Alpha);
    round_trip(&registry, Blend::Multiply);
}

#[derive(Debug, Clone, PartialEq)]
struct Tiny(u8);

#[derive(Debug, Clone, PartialEq)]
struct Shade(u16);

#[test]
fn ordinal_width_follows_cardinality() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByOrdinal));
    registry
        .register_enum(
            EnumBuilder::<Tiny>::new("demo.Tiny")
                .variant("ZERO", Tiny(0))
                .variant("ONE", Tiny(1)),
        )
        .unwrap();
    let mut builder = EnumBuilder::<Shade>::new("demo.Shade");
    for i in 0..300u16 {
        builder = builder.variant(format!("S{}", i), Shade(i));
    }
    registry.register_enum(builder).unwrap();

    // Two constants: one payload byte per re-pooled write.
    let mut enc = registry.encoder();
    enc.write_object(Some(&Tiny(0) as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&Tiny(1) as &dyn Streamable)).unwrap();
    assert_eq!(enc.len() - first_len, 2 + 1);

    // 300 constants: two payload bytes.
    let mut enc = registry.encoder();
    enc.write_object(Some(&Shade(0) as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&Shade(299) as &dyn Streamable)).unwrap();
    assert_eq!(enc.len() - first_len, 2 + 2);

    // Both still decode to the right constant by ordinal lookup.
    let bytes = registry.encode(&Tiny(1)).unwrap();
    assert_eq!(registry.decode_as::<Tiny>(&bytes).unwrap(), Some(Tiny(1)));
    let bytes = registry.encode(&Shade(299)).unwrap();
    assert_eq!(registry.decode_as::<Shade>(&bytes).unwrap(), Some(Shade(299)));
}

#[derive(Debug, Default, PartialEq)]
struct Layer {
    blend: Option<Blend>,
}

fn register_layer(registry: &TypeRegistry) {
    registry
        .register(
            TypeSpec::composite::<Layer>("fx.Layer").field(FieldSpec::enum_of(
                "blend",
                |l: &Layer| l.blend.clone(),
                |l, v| l.blend = v,
            )),
        )
        .unwrap();
}

#[test]
fn null_enum_field_uses_the_width_sentinel() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByOrdinal));
    register_blend(&registry);
    register_layer(&registry);

    let some = Layer {
        blend: Some(Blend::Multiply),
    };
    let bytes = registry.encode(&some).unwrap();
    // Header (2 + 2 + 8) + one ordinal byte: no class tag for the field.
    assert_eq!(bytes.len(), 2 + 2 + 8 + 1);
    assert_eq!(registry.decode_as::<Layer>(&bytes).unwrap(), Some(some));

    let none = Layer { blend: None };
    let bytes = registry.encode(&none).unwrap();
    assert_eq!(bytes.len(), 2 + 2 + 8 + 1);
    assert_eq!(bytes[bytes.len() - 1], 0xff);
    assert_eq!(registry.decode_as::<Layer>(&bytes).unwrap(), Some(none));
}

#[test]
fn null_enum_field_by_name_is_an_empty_name() {
    let registry = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByName));
    register_blend(&registry);
    register_layer(&registry);

    let none = Layer { blend: None };
    let bytes = registry.encode(&none).unwrap();
    assert_eq!(registry.decode_as::<Layer>(&bytes).unwrap(), Some(none));

    let some = Layer {
        blend: Some(Blend::Alpha),
    };
    let bytes = registry.encode(&some).unwrap();
    assert_eq!(registry.decode_as::<Layer>(&bytes).unwrap(), Some(some));
}

#[test]
fn unknown_constant_name_is_malformed() {
    let writer = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByName));
    writer
        .register_enum(
            EnumBuilder::<Blend>::new("fx.Blend")
                .variant("ALPHA", Blend::Alpha)
                .variant("RETIRED", Blend::Additive)
                .variant("MULTIPLY", Blend::Multiply),
        )
        .unwrap();
    let reader = TypeRegistry::new(CodecConfig::default().enum_policy(EnumPolicy::ByName));
    register_blend(&reader);

    let bytes = writer.encode(&Blend::Additive).unwrap();
    assert!(matches!(
        reader.decode(&bytes).unwrap_err(),
        Error::MalformedPayload(_)
    ));
}

#[test]
fn partial_compact_codes_are_rejected() {
    let registry = TypeRegistry::default();
    let result = registry.register_enum(
        EnumBuilder::<Blend>::new("fx.Blend")
            .variant_with_code("ALPHA", Blend::Alpha, 1)
            .variant("ADDITIVE", Blend::Additive)
            .variant("MULTIPLY", Blend::Multiply),
    );
    assert!(matches!(result.unwrap_err(), Error::Registration(_)));
}
