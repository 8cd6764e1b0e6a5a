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
use objstream::{Streamable, TypeRegistry};
use objstream_tests::count_subslices;

#[test]
fn pooled_string_travels_once() {
    let registry = TypeRegistry::default();
    let mut enc = registry.encoder();
    enc.write_intern(Some("common/path")).unwrap();
    let first_len = enc.len();
    enc.write_intern(Some("common/path")).unwrap();
    enc.write_intern(Some("other")).unwrap();
    enc.write_intern(Some("common/path")).unwrap();
    let bytes = enc.into_bytes();

    // Re-pooled occurrences are a bare 2-byte code.
    assert_eq!(count_subslices(&bytes, b"common/path"), 1);
    assert_eq!(count_subslices(&bytes, b"other"), 1);
    assert!(bytes.len() > first_len);

    let mut dec = registry.decoder(&bytes);
    assert_eq!(dec.read_intern().unwrap().as_deref(), Some("common/path"));
    assert_eq!(dec.read_intern().unwrap().as_deref(), Some("common/path"));
    assert_eq!(dec.read_intern().unwrap().as_deref(), Some("other"));
    assert_eq!(dec.read_intern().unwrap().as_deref(), Some("common/path"));
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn reuse_costs_two_bytes() {
    let registry = TypeRegistry::default();
    let mut enc = registry.encoder();
    enc.write_intern(Some("abc")).unwrap();
    let first_len = enc.len();
    enc.write_intern(Some("abc")).unwrap();
    assert_eq!(enc.len() - first_len, 2);
}

#[test]
fn null_string_is_code_zero() {
    let registry = TypeRegistry::default();
    let mut enc = registry.encoder();
    enc.write_intern(None).unwrap();
    let bytes = enc.into_bytes();
    assert_eq!(bytes, vec![0, 0]);

    let mut dec = registry.decoder(&bytes);
    assert_eq!(dec.read_intern().unwrap(), None);
}

#[test]
fn unknown_intern_code_is_stream_corruption() {
    let registry = TypeRegistry::default();
    let mut dec = registry.decoder(&[0, 9]);
    assert!(matches!(
        dec.read_intern().unwrap_err(),
        Error::StreamCorruption(_)
    ));
}

#[test]
fn intern_and_class_code_spaces_are_independent() {
    use objstream::{FieldSpec, TypeSpec};

    #[derive(Debug, Default, PartialEq)]
    struct Named {
        name: Option<String>,
    }

    let registry = TypeRegistry::default();
    registry
        .register(
            TypeSpec::composite::<Named>("demo.Named").field(FieldSpec::string(
                "name",
                |n: &Named| n.name.clone(),
                |n, v| n.name = v,
            )),
        )
        .unwrap();

    // Class code 1 and intern code 1 coexist in one session.
    let a = Named {
        name: Some("alpha".to_owned()),
    };
    let b = Named {
        name: Some("alpha".to_owned()),
    };
    let mut enc = registry.encoder();
    enc.write_object(Some(&a as &dyn Streamable)).unwrap();
    let first_len = enc.len();
    enc.write_object(Some(&b as &dyn Streamable)).unwrap();
    let bytes = enc.into_bytes();

    // Second object: class code reuse (2) + intern code reuse (2).
    assert_eq!(bytes.len() - first_len, 4);
    assert_eq!(count_subslices(&bytes, b"alpha"), 1);

    let mut dec = registry.decoder(&bytes);
    assert_eq!(dec.read_object_as::<Named>().unwrap(), Some(a));
    assert_eq!(dec.read_object_as::<Named>().unwrap(), Some(b));
}
