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

//! Appended trailing fields are the one supported schema change: a stream
//! written against an older registration of a class decodes against a
//! newer one with extra trailing fields, which keep their constructed
//! defaults.

use objstream::error::Error;
use objstream::{FieldSpec, TypeRegistry, TypeSpec};

#[derive(Debug, Default, PartialEq)]
struct SlotV1 {
    id: i32,
}

#[derive(Debug, PartialEq)]
struct SlotV2 {
    id: i32,
    label: Option<String>,
    weight: f32,
}

impl Default for SlotV2 {
    fn default() -> Self {
        SlotV2 {
            id: 0,
            label: None,
            weight: 1.5,
        }
    }
}

fn registry_v1() -> TypeRegistry {
    let registry = TypeRegistry::default();
    registry
        .register(
            TypeSpec::composite::<SlotV1>("game.Slot")
                .field(FieldSpec::i32("id", |s: &SlotV1| s.id, |s, v| s.id = v)),
        )
        .unwrap();
    registry
}

fn registry_v2() -> TypeRegistry {
    let registry = TypeRegistry::default();
    registry
        .register(
            TypeSpec::composite::<SlotV2>("game.Slot")
                .field(FieldSpec::i32("id", |s: &SlotV2| s.id, |s, v| s.id = v))
                .field(FieldSpec::string(
                    "label",
                    |s: &SlotV2| s.label.clone(),
                    |s, v| s.label = v,
                ))
                .field(FieldSpec::f32("weight", |s: &SlotV2| s.weight, |s, v| s.weight = v)),
        )
        .unwrap();
    registry
}

#[test]
fn old_stream_fills_new_trailing_fields_with_defaults() {
    let bytes = registry_v1().encode(&SlotV1 { id: 7 }).unwrap();

    let back = registry_v2().decode_as::<SlotV2>(&bytes).unwrap().unwrap();
    assert_eq!(
        back,
        SlotV2 {
            id: 7,
            label: None,
            weight: 1.5,
        }
    );
}

#[test]
fn new_stream_decodes_against_the_new_schema() {
    let registry = registry_v2();
    let slot = SlotV2 {
        id: 3,
        label: Some("sword".to_owned()),
        weight: 8.25,
    };
    let bytes = registry.encode(&slot).unwrap();
    assert_eq!(registry.decode_as::<SlotV2>(&bytes).unwrap(), Some(slot));
}

#[test]
fn truncation_inside_a_field_is_fatal_with_context() {
    let registry = registry_v2();
    let slot = SlotV2 {
        id: 3,
        label: Some("sword".to_owned()),
        weight: 8.25,
    };
    let mut bytes = registry.encode(&slot).unwrap();
    // Cut into the trailing f32: the stream ends inside a field, not at a
    // field boundary, so this is not tail tolerance.
    bytes.truncate(bytes.len() - 2);

    match registry.decode_as::<SlotV2>(&bytes).unwrap_err() {
        Error::FieldMarshal {
            type_name, field, ..
        } => {
            assert_eq!(type_name, "game.Slot");
            assert_eq!(field, "weight");
        }
        other => panic!("expected a field marshal error, got {:?}", other),
    }
}
