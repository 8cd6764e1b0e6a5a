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

use crate::buffer::{Reader, Writer};
use crate::ensure;
use crate::error::Error;

/// Compact bitset marking which slots of a fixed-length array are non-null.
///
/// Bit `i` lives in byte `i / 8` at value `1 << (i % 8)`. On the wire the
/// mask is a `u16` byte-length prefix followed by the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMask {
    bits: Vec<u8>,
    len: usize,
}

impl ArrayMask {
    pub fn new(len: usize) -> ArrayMask {
        ArrayMask {
            bits: vec![0; len.div_ceil(8)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "mask index out of range");
        self.bits[index / 8] |= 1 << (index % 8);
    }

    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "mask index out of range");
        self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    pub(crate) fn write(&self, writer: &mut Writer) -> Result<(), Error> {
        ensure!(
            self.bits.len() <= u16::MAX as usize,
            Error::unsupported(format!("array mask of {} bytes", self.bits.len()))
        );
        writer.write_u16(self.bits.len() as u16);
        writer.write_bytes(&self.bits);
        Ok(())
    }

    pub(crate) fn read(reader: &mut Reader, len: usize) -> Result<ArrayMask, Error> {
        let byte_len = reader.read_u16()? as usize;
        ensure!(
            byte_len == len.div_ceil(8),
            Error::malformed_payload(format!(
                "mask of {} bytes does not cover {} array slots",
                byte_len, len
            ))
        );
        let bits = reader.read_bytes(byte_len)?.to_vec();
        Ok(ArrayMask { bits, len })
    }
}
