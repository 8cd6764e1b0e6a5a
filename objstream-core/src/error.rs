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

use std::borrow::Cow;

use thiserror::Error;

/// Error type for all encode/decode operations.
///
/// Every variant is terminal for the operation that raised it: a failed
/// stream is no longer usable and must not be resynchronized or retried.
/// Construct variants through the static constructor functions, which
/// accept anything convertible into a `Cow<'static, str>`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A value's type has no resolvable codec. Raised at first resolution.
    #[error("unsupported type: {0}")]
    UnsupportedType(Cow<'static, str>),

    /// A referenced class or intern code has no dictionary entry, or the
    /// stream ended mid-value: the reader and writer have desynchronized.
    #[error("stream corrupted: {0}")]
    StreamCorruption(Cow<'static, str>),

    /// More distinct classes or interned strings than the 16-bit positive
    /// code space allows in one session.
    #[error("code space exhausted: {0}")]
    CodeSpaceExhausted(Cow<'static, str>),

    /// A failure while reading or writing one specific field, annotated
    /// with the owning type and the field name.
    #[error("failed to stream field `{field}` of `{type_name}`: {source}")]
    FieldMarshal {
        type_name: Cow<'static, str>,
        field: Cow<'static, str>,
        #[source]
        source: Box<Error>,
    },

    /// A structurally impossible declared size or value in the payload.
    #[error("malformed payload: {0}")]
    MalformedPayload(Cow<'static, str>),

    /// A valid type carrying a value shape the codec refuses to encode.
    #[error("unsupported value: {0}")]
    Unsupported(Cow<'static, str>),

    /// A duplicate or inconsistent type registration.
    #[error("invalid registration: {0}")]
    Registration(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::UnsupportedType`].
    #[cold]
    #[track_caller]
    pub fn unsupported_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::UnsupportedType(s.into())
    }

    /// Creates a new [`Error::StreamCorruption`].
    #[cold]
    #[track_caller]
    pub fn stream_corruption<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::StreamCorruption(s.into())
    }

    /// Creates a new [`Error::CodeSpaceExhausted`].
    #[cold]
    #[track_caller]
    pub fn code_space_exhausted<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::CodeSpaceExhausted(s.into())
    }

    /// Wraps `source` with the owning type and field name it was raised for.
    #[cold]
    #[track_caller]
    pub fn field_marshal(type_name: &str, field: &str, source: Error) -> Self {
        Error::FieldMarshal {
            type_name: Cow::Owned(type_name.to_owned()),
            field: Cow::Owned(field.to_owned()),
            source: Box::new(source),
        }
    }

    /// Creates a new [`Error::MalformedPayload`].
    #[cold]
    #[track_caller]
    pub fn malformed_payload<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::MalformedPayload(s.into())
    }

    /// Creates a new [`Error::Unsupported`].
    #[cold]
    #[track_caller]
    pub fn unsupported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Unsupported(s.into())
    }

    /// Creates a new [`Error::Registration`].
    #[cold]
    #[track_caller]
    pub fn registration<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Error::Registration(s.into())
    }
}

/// Ensures a condition holds; otherwise returns the given [`enum@Error`].
///
/// # Examples
/// ```
/// use objstream_core::ensure;
/// use objstream_core::error::Error;
///
/// fn check(n: i32) -> Result<(), Error> {
///     ensure!(n >= 0, Error::malformed_payload("negative count"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with the given [`enum@Error`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($err)
    };
}
