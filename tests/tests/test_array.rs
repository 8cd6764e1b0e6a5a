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

use objstream::{FieldSpec, Streamable, TypeRegistry, TypeSpec};

#[derive(Debug, Default, PartialEq)]
struct Cell {
    value: i32,
}

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::default();
    registry
        .register(
            TypeSpec::composite::<Cell>("grid.Cell")
                .field(FieldSpec::i32("value", |c: &Cell| c.value, |c, v| c.value = v)),
        )
        .unwrap();
    registry.register_array_of::<Cell>().unwrap();
    registry
}

#[test]
fn homogeneous_array_round_trip() {
    let registry = registry();
    let array: Vec<Option<Cell>> = vec![
        Some(Cell { value: 1 }),
        None,
        Some(Cell { value: -7 }),
        None,
        None,
        Some(Cell { value: 99 }),
    ];
    let bytes = registry.encode(&array).unwrap();
    let back = registry.decode_as::<Vec<Option<Cell>>>(&bytes).unwrap();
    assert_eq!(back, Some(array));
}

#[test]
fn null_slots_write_no_payload() {
    let registry = registry();
    let empty: Vec<Option<Cell>> = vec![None, None, None, None];
    let bytes = registry.encode(&empty).unwrap();

    // Header: code (2) + name "grid.Cell[]" (2 + 11). Payload: count (4)
    // + mask (2 + 1). Nothing at all for the four null slots.
    assert_eq!(bytes.len(), 2 + 2 + 11 + 4 + 2 + 1);
    assert_eq!(registry.decode_as::<Vec<Option<Cell>>>(&bytes).unwrap(), Some(empty));
}

#[test]
fn mask_matches_null_pattern() {
    let registry = registry();
    let array: Vec<Option<Cell>> = (0..19)
        .map(|i| {
            if i % 3 == 0 {
                Some(Cell { value: i })
            } else {
                None
            }
        })
        .collect();
    let bytes = registry.encode(&array).unwrap();

    // Mask bytes sit right after the header (15 bytes) and count (4).
    let mask = &bytes[2 + 2 + 11 + 4 + 2..2 + 2 + 11 + 4 + 2 + 3];
    for i in 0..19usize {
        let bit = mask[i / 8] & (1 << (i % 8)) != 0;
        assert_eq!(bit, i % 3 == 0, "slot {}", i);
    }

    let back = registry
        .decode_as::<Vec<Option<Cell>>>(&bytes)
        .unwrap()
        .unwrap();
    assert_eq!(back, array);
}

#[test]
fn bare_elements_carry_no_class_tags() {
    let registry = registry();
    let array: Vec<Option<Cell>> = vec![Some(Cell { value: 5 }), Some(Cell { value: 6 })];
    let bytes = registry.encode(&array).unwrap();
    // Two non-null elements are 2 * 4 payload bytes, nothing more.
    assert_eq!(bytes.len(), 2 + 2 + 11 + 4 + 2 + 1 + 8);
}

#[test]
fn open_element_array_tags_each_element() {
    let registry = registry();
    let array: Vec<Option<Box<dyn Streamable>>> = vec![
        Some(Box::new(5i32)),
        None,
        Some(Box::new("mixed".to_owned())),
        Some(Box::new(Cell { value: 2 })),
    ];
    let bytes = registry.encode(&array).unwrap();
    let back = registry
        .decode_as::<Vec<Option<Box<dyn Streamable>>>>(&bytes)
        .unwrap()
        .unwrap();
    assert_eq!(back, array);
}

#[test]
fn array_element_type_must_be_registered_first() {
    #[derive(Debug, Default, PartialEq)]
    struct Loose;

    let registry = TypeRegistry::default();
    assert!(registry.register_array_of::<Loose>().is_err());
}

#[test]
fn primitive_arrays_round_trip() {
    let registry = TypeRegistry::default();

    let ints: Vec<i32> = vec![1, -2, 3_000_000];
    let bytes = registry.encode(&ints).unwrap();
    assert_eq!(registry.decode_as::<Vec<i32>>(&bytes).unwrap(), Some(ints));

    let raw: Vec<u8> = vec![0, 1, 254, 255];
    let bytes = registry.encode(&raw).unwrap();
    assert_eq!(registry.decode_as::<Vec<u8>>(&bytes).unwrap(), Some(raw));

    let flags: Vec<bool> = vec![true, false, true];
    let bytes = registry.encode(&flags).unwrap();
    assert_eq!(registry.decode_as::<Vec<bool>>(&bytes).unwrap(), Some(flags));

    let floats: Vec<f64> = vec![0.5, -1.25];
    let bytes = registry.encode(&floats).unwrap();
    assert_eq!(registry.decode_as::<Vec<f64>>(&bytes).unwrap(), Some(floats));
}
