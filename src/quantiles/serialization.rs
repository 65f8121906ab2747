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

use std::io;
use std::io::Read;
use std::io::Write;

use crate::codec::SketchReader;
use crate::codec::SketchWriter;
use crate::error::Error;

/// Classifies a stream failure for a named field: end-of-input means the
/// encoded summary was truncated, anything else is a stream error.
pub(crate) fn make_error(tag: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::insufficient_data(tag)
        } else {
            Error::from(err).with_context("field", tag)
        }
    }
}

/// Trait for serializing and deserializing summary element values.
///
/// The summary wire format is parameterized by the element encoding; a
/// summary of `T` can be encoded iff `T` implements this trait. The
/// summary's own encoding is deterministic exactly when the element
/// encoding is.
///
/// Implementations are provided for `i32`, `u32`, `i64`, `u64` and `f64`
/// (fixed-width big-endian) and for `String` (big-endian `u32` byte
/// length followed by UTF-8 bytes).
pub trait QuantileValue: Sized + Clone {
    /// Serializes the value into the given writer.
    fn serialize_value<W: Write>(&self, writer: &mut SketchWriter<'_, W>) -> Result<(), Error>;
    /// Deserializes a value from the given reader.
    fn deserialize_value<R: Read>(reader: &mut SketchReader<'_, R>) -> Result<Self, Error>;
}

impl QuantileValue for String {
    fn serialize_value<W: Write>(&self, writer: &mut SketchWriter<'_, W>) -> Result<(), Error> {
        let bs = self.as_bytes();
        writer
            .write_u32_be(bs.len() as u32)
            .map_err(Error::from)?;
        writer.write(bs).map_err(Error::from)
    }

    fn deserialize_value<R: Read>(reader: &mut SketchReader<'_, R>) -> Result<Self, Error> {
        let len = reader
            .read_u32_be()
            .map_err(make_error("string element length"))?;

        let mut bytes = vec![0; len as usize];
        reader
            .read_exact(&mut bytes)
            .map_err(make_error("string element bytes"))?;

        String::from_utf8(bytes).map_err(|_| Error::deserial("invalid UTF-8 string payload"))
    }
}

macro_rules! impl_primitive {
    ($name:ty, $read:ident, $write:ident) => {
        impl QuantileValue for $name {
            fn serialize_value<W: Write>(
                &self,
                writer: &mut SketchWriter<'_, W>,
            ) -> Result<(), Error> {
                writer.$write(*self).map_err(Error::from)
            }

            fn deserialize_value<R: Read>(
                reader: &mut SketchReader<'_, R>,
            ) -> Result<Self, Error> {
                reader
                    .$read()
                    .map_err(make_error(concat!(stringify!($name), " element")))
            }
        }
    };
}

impl_primitive!(i32, read_i32_be, write_i32_be);
impl_primitive!(u32, read_u32_be, write_u32_be);
impl_primitive!(i64, read_i64_be, write_i64_be);
impl_primitive!(u64, read_u64_be, write_u64_be);
impl_primitive!(f64, read_f64_be, write_f64_be);

/// Writes a length-prefixed element list: big-endian `i32` count followed
/// by the elements in order.
pub(crate) fn serialize_list<T: QuantileValue, W: Write>(
    items: &[T],
    writer: &mut SketchWriter<'_, W>,
) -> Result<(), Error> {
    let len = i32::try_from(items.len())
        .map_err(|_| Error::invalid_argument(format!("list too long to encode: {}", items.len())))?;
    writer.write_i32_be(len).map_err(Error::from)?;
    for item in items {
        item.serialize_value(writer)?;
    }
    Ok(())
}

/// Reads a length-prefixed element list written by [`serialize_list`].
pub(crate) fn deserialize_list<T: QuantileValue, R: Read>(
    reader: &mut SketchReader<'_, R>,
) -> Result<Vec<T>, Error> {
    let len = reader.read_i32_be().map_err(make_error("list length"))?;
    if len < 0 {
        return Err(Error::deserial(format!(
            "list length cannot be negative, got {len}"
        )));
    }
    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        items.push(T::deserialize_value(reader)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_round_trip() {
        let mut bytes = Vec::new();
        {
            let mut writer = SketchWriter::new(&mut bytes);
            42_i64.serialize_value(&mut writer).unwrap();
        }
        assert_eq!(bytes, 42_i64.to_be_bytes());

        let mut cursor = bytes.as_slice();
        let mut reader = SketchReader::new(&mut cursor);
        assert_eq!(i64::deserialize_value(&mut reader).unwrap(), 42);
    }

    #[test]
    fn test_string_round_trip() {
        let mut bytes = Vec::new();
        {
            let mut writer = SketchWriter::new(&mut bytes);
            "héllo".to_string().serialize_value(&mut writer).unwrap();
        }

        let mut cursor = bytes.as_slice();
        let mut reader = SketchReader::new(&mut cursor);
        assert_eq!(String::deserialize_value(&mut reader).unwrap(), "héllo");
    }

    #[test]
    fn test_list_round_trip_preserves_order() {
        let items = vec![3_i32, 1, 4, 1, 5];
        let mut bytes = Vec::new();
        {
            let mut writer = SketchWriter::new(&mut bytes);
            serialize_list(&items, &mut writer).unwrap();
        }

        let mut cursor = bytes.as_slice();
        let mut reader = SketchReader::new(&mut cursor);
        let decoded: Vec<i32> = deserialize_list(&mut reader).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_truncated_list_is_invalid_data() {
        let items = vec![7_i64, 8, 9];
        let mut bytes = Vec::new();
        {
            let mut writer = SketchWriter::new(&mut bytes);
            serialize_list(&items, &mut writer).unwrap();
        }
        bytes.truncate(bytes.len() - 3);

        let mut cursor = bytes.as_slice();
        let mut reader = SketchReader::new(&mut cursor);
        let err = deserialize_list::<i64, _>(&mut reader).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidData);
    }

    #[test]
    fn test_negative_list_length_is_invalid_data() {
        let bytes = (-1_i32).to_be_bytes();
        let mut cursor = bytes.as_slice();
        let mut reader = SketchReader::new(&mut cursor);
        let err = deserialize_list::<i64, _>(&mut reader).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidData);
    }
}
