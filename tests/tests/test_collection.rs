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

use std::collections::{BTreeMap, HashMap, HashSet, LinkedList, VecDeque};

use objstream::{
    DynList, DynMap, DynMultiset, DynSet, Multiset, Streamable, TypeRegistry,
};
use objstream_tests::count_subslices;

#[test]
fn list_then_map_in_one_session() {
    let registry = TypeRegistry::default();
    registry.register_list_of::<String>().unwrap();
    registry.register_map_of::<String, i32>().unwrap();

    let list: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    let mut map: HashMap<String, i32> = HashMap::new();
    map.insert("x".to_owned(), 1);
    map.insert("y".to_owned(), 2);

    let mut enc = registry.encoder();
    enc.write_object(Some(&list as &dyn Streamable)).unwrap();
    enc.write_object(Some(&map as &dyn Streamable)).unwrap();
    let bytes = enc.into_bytes();

    let mut dec = registry.decoder(&bytes);
    let decoded_list = dec.read_object_as::<DynList>().unwrap().unwrap();
    assert_eq!(decoded_list.len(), 3);
    assert_eq!(decoded_list.try_into_vec::<String>().unwrap(), list);

    let decoded_map = dec.read_object_as::<DynMap>().unwrap().unwrap();
    assert_eq!(decoded_map.len(), 2);
    assert_eq!(
        decoded_map.get(&"x".to_owned()).unwrap(),
        Some(&1i32 as &dyn Streamable)
    );
    assert_eq!(
        decoded_map.get(&"y".to_owned()).unwrap(),
        Some(&2i32 as &dyn Streamable)
    );
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn concrete_container_identity_is_erased() {
    let registry = TypeRegistry::default();
    registry.register_map_of::<String, i32>().unwrap();
    registry.register_sorted_map_of::<String, i32>().unwrap();

    let mut hash: HashMap<String, i32> = HashMap::new();
    hash.insert("k".to_owned(), 5);
    let mut btree: BTreeMap<String, i32> = BTreeMap::new();
    btree.insert("k".to_owned(), 5);

    let mut enc = registry.encoder();
    enc.write_object(Some(&hash as &dyn Streamable)).unwrap();
    enc.write_object(Some(&btree as &dyn Streamable)).unwrap();
    let bytes = enc.into_bytes();

    // Both concrete types write the same erased shape name; each claims
    // its own dictionary entry, so the name appears once per type.
    assert_eq!(count_subslices(&bytes, b"Map"), 2);

    let mut dec = registry.decoder(&bytes);
    let first = dec.read_object_as::<DynMap>().unwrap().unwrap();
    let second = dec.read_object_as::<DynMap>().unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn set_round_trip() {
    let registry = TypeRegistry::default();
    registry.register_set_of::<String>().unwrap();

    let mut set: HashSet<String> = HashSet::new();
    set.insert("north".to_owned());
    set.insert("south".to_owned());
    set.insert("east".to_owned());

    let bytes = registry.encode(&set).unwrap();
    let back = registry.decode_as::<DynSet>(&bytes).unwrap().unwrap();
    assert_eq!(back.len(), 3);
    for name in &set {
        assert!(back.contains(name));
    }
}

#[test]
fn dyn_set_round_trip_preserves_membership() {
    let registry = TypeRegistry::default();
    let mut set = DynSet::new();
    set.insert_value("tile".to_owned());
    set.insert_value(42i32);
    set.insert_value(false);

    let bytes = registry.encode(&set).unwrap();
    let back = registry.decode_as::<DynSet>(&bytes).unwrap().unwrap();
    assert_eq!(back, set);
}

#[test]
fn multiset_round_trip() {
    let registry = TypeRegistry::default();
    registry.register_multiset_of::<String>().unwrap();

    let mut multiset: Multiset<String> = Multiset::new();
    multiset.add_n("arrow".to_owned(), 64);
    multiset.add("bow".to_owned());

    let bytes = registry.encode(&multiset).unwrap();
    let back = registry.decode_as::<DynMultiset>(&bytes).unwrap().unwrap();
    assert_eq!(back.distinct_len(), 2);
    assert_eq!(back.count(&"arrow".to_owned()), 64);
    assert_eq!(back.count(&"bow".to_owned()), 1);
}

#[test]
fn collection_and_iterable_shapes_decode_as_lists() {
    let registry = TypeRegistry::default();
    registry.register_collection_of::<i32>().unwrap();
    registry.register_iterable_of::<String>().unwrap();

    let mut linked: LinkedList<i32> = LinkedList::new();
    linked.push_back(4);
    linked.push_back(5);
    let deque: VecDeque<String> = vec!["q".to_owned(), "r".to_owned()].into();

    let bytes = registry.encode(&linked).unwrap();
    let back = registry.decode_as::<DynList>(&bytes).unwrap().unwrap();
    assert_eq!(back.try_into_vec::<i32>().unwrap(), vec![4, 5]);

    let bytes = registry.encode(&deque).unwrap();
    let back = registry.decode_as::<DynList>(&bytes).unwrap().unwrap();
    assert_eq!(
        back.try_into_vec::<String>().unwrap(),
        vec!["q".to_owned(), "r".to_owned()]
    );
}

#[test]
fn dyn_list_with_nulls_and_mixed_elements() {
    let registry = TypeRegistry::default();
    let mut list = DynList::new();
    list.push(1i64);
    list.push_null();
    list.push("mid".to_owned());
    list.push(2.5f64);

    let bytes = registry.encode(&list).unwrap();
    let back = registry.decode_as::<DynList>(&bytes).unwrap().unwrap();
    assert_eq!(back, list);
}

#[test]
fn element_tags_are_pooled_across_one_session() {
    let registry = TypeRegistry::default();
    registry.register_list_of::<String>().unwrap();

    let list: Vec<String> = vec!["a".into(), "b".into(), "c".into(), "d".into()];
    let bytes = registry.encode(&list).unwrap();
    // One "List" tag, one "String" tag, however many elements.
    assert_eq!(count_subslices(&bytes, b"String"), 1);
    assert_eq!(count_subslices(&bytes, b"List"), 1);
}
