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
use objstream::{FieldSpec, Streamable, TypeRegistry, TypeSpec};
use objstream_tests::count_subslices;

#[derive(Debug, Default, PartialEq)]
struct Slot {
    id: i32,
}

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::default();
    registry
        .register(
            TypeSpec::composite::<Slot>("game.Slot")
                .field(FieldSpec::i32("id", |s: &Slot| s.id, |s, v| s.id = v)),
        )
        .unwrap();
    registry
}

#[test]
fn class_name_travels_once() {
    let registry = registry();
    let mut enc = registry.encoder();
    enc.write_object(Some(&Slot { id: 1 } as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&Slot { id: 2 } as &dyn Streamable)).unwrap();
    let bytes = enc.into_bytes();

    // Second occurrence: a 2-byte positive code plus the 4-byte payload.
    assert_eq!(bytes.len() - first_len, 6);
    assert_eq!(count_subslices(&bytes, b"game.Slot"), 1);

    let mut dec = registry.decoder(&bytes);
    assert_eq!(dec.read_object_as::<Slot>().unwrap(), Some(Slot { id: 1 }));
    assert_eq!(dec.read_object_as::<Slot>().unwrap(), Some(Slot { id: 2 }));
}

#[test]
fn first_sight_header_is_negative_code_and_name() {
    let registry = registry();
    let bytes = registry.encode(&Slot { id: 3 }).unwrap();
    // -1 as big-endian i16, then the u16-prefixed class name.
    assert_eq!(&bytes[..4], &[0xff, 0xff, 0x00, 0x09]);
    assert_eq!(&bytes[4..13], b"game.Slot");
}

#[test]
fn codes_allocate_in_first_write_order() {
    #[derive(Debug, Default, PartialEq)]
    struct Other {
        n: i8,
    }

    let registry = registry();
    registry
        .register(
            TypeSpec::composite::<Other>("game.Other")
                .field(FieldSpec::i8("n", |o: &Other| o.n, |o, v| o.n = v)),
        )
        .unwrap();

    let mut enc = registry.encoder();
    enc.write_object(Some(&Slot { id: 1 } as &dyn Streamable)).unwrap();
    enc.write_object(Some(&Other { n: 2 } as &dyn Streamable)).unwrap();
    enc.write_object(Some(&Slot { id: 3 } as &dyn Streamable)).unwrap();
    enc.write_object(Some(&Other { n: 4 } as &dyn Streamable)).unwrap();
    let bytes = enc.into_bytes();

    let mut dec = registry.decoder(&bytes);
    assert_eq!(dec.read_object_as::<Slot>().unwrap(), Some(Slot { id: 1 }));
    assert_eq!(dec.read_object_as::<Other>().unwrap(), Some(Other { n: 2 }));
    assert_eq!(dec.read_object_as::<Slot>().unwrap(), Some(Slot { id: 3 }));
    assert_eq!(dec.read_object_as::<Other>().unwrap(), Some(Other { n: 4 }));
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn unknown_code_is_stream_corruption() {
    let registry = registry();
    // Positive code 5 was never defined in this session.
    let err = registry.decode(&[0, 5]).unwrap_err();
    assert!(matches!(err, Error::StreamCorruption(_)));
}

#[test]
fn unknown_class_name_is_unsupported() {
    let writer = registry();
    let bytes = writer.encode(&Slot { id: 1 }).unwrap();

    let reader = TypeRegistry::default();
    let err = reader.decode(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn truncated_stream_is_corruption() {
    let registry = registry();
    let bytes = registry.encode(&Slot { id: 1 }).unwrap();
    let err = registry.decode(&bytes[..bytes.len() - 2]).unwrap_err();
    assert!(matches!(
        err,
        Error::FieldMarshal { .. } | Error::StreamCorruption(_)
    ));
}
