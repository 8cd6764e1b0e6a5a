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

//! Encoder and decoder sessions.
//!
//! A session owns the class and intern dictionaries for one uninterrupted
//! byte stream. Codes are only meaningful inside one matched
//! encoder/decoder pair: both sides allocate them monotonically in
//! first-sight order and must consume them in the identical sequence.

mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use std::sync::Arc;

use crate::codec::Streamer;

/// Class code reserved for null references.
pub(crate) const NULL_CODE: i16 = 0;

/// One session-scoped dictionary entry: the wire code, the class name and
/// the resolved codec.
pub(crate) struct ClassMapping {
    pub(crate) code: i16,
    pub(crate) name: Arc<str>,
    pub(crate) streamer: Arc<Streamer>,
}
