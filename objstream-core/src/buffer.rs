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

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::ensure;
use crate::error::Error;

/// Maximum byte length of a length-prefixed UTF-8 string on the wire.
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Growable output buffer. All multi-byte values are big-endian.
#[derive(Default)]
pub struct Writer {
    bf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Writer {
        Writer::default()
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn write_bytes(&mut self, v: &[u8]) {
        self.bf.extend_from_slice(v);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bf.write_u8(value).unwrap();
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bf.write_i8(value).unwrap();
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bf.write_u16::<BigEndian>(value).unwrap();
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bf.write_i16::<BigEndian>(value).unwrap();
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bf.write_u32::<BigEndian>(value).unwrap();
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bf.write_i32::<BigEndian>(value).unwrap();
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bf.write_i64::<BigEndian>(value).unwrap();
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bf.write_f32::<BigEndian>(value).unwrap();
    }

    pub fn write_f64(&mut self, value: f64) {
        self.bf.write_f64::<BigEndian>(value).unwrap();
    }

    pub fn write_char(&mut self, value: char) {
        self.write_u32(value as u32);
    }

    /// Writes a `u16`-length-prefixed UTF-8 string.
    pub fn write_utf(&mut self, s: &str) -> Result<(), Error> {
        ensure!(
            s.len() <= MAX_UTF_LEN,
            Error::unsupported(format!(
                "string of {} bytes exceeds the u16 length prefix",
                s.len()
            ))
        );
        self.write_u16(s.len() as u16);
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Writes a non-negative element count as an `i32`.
    pub fn write_count(&mut self, count: usize) -> Result<(), Error> {
        ensure!(
            count <= i32::MAX as usize,
            Error::unsupported(format!("count {} exceeds the i32 range", count))
        );
        self.write_i32(count as i32);
        Ok(())
    }
}

/// Input cursor over a borrowed byte slice. Mirrors [`Writer`].
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &[u8]) -> Reader<'_> {
        Reader { bf, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        ensure!(
            len <= self.remaining(),
            Error::stream_corruption(format!(
                "unexpected end of stream: need {} bytes, {} remain",
                len,
                self.remaining()
            ))
        );
        let slice = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.take(len).map(|_| ())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.take(len)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    pub fn read_char(&mut self) -> Result<char, Error> {
        let v = self.read_u32()?;
        char::from_u32(v)
            .ok_or_else(|| Error::malformed_payload(format!("invalid char scalar {:#x}", v)))
    }

    /// Reads a `u16`-length-prefixed UTF-8 string.
    pub fn read_utf(&mut self) -> Result<String, Error> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::malformed_payload("invalid utf-8 in string payload"))
    }

    /// Reads an `i32` element count, rejecting negative values.
    pub fn read_count(&mut self) -> Result<usize, Error> {
        let count = self.read_i32()?;
        ensure!(
            count >= 0,
            Error::malformed_payload(format!("negative count {}", count))
        );
        Ok(count as usize)
    }
}
