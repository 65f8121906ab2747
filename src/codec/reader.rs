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

use byteorder::BigEndian;
use byteorder::ReadBytesExt;

/// A wrapper around an input stream that provides methods for reading the
/// fixed-width values used by the summary wire format.
pub struct SketchReader<'a, R: Read> {
    reader: &'a mut R,
}

impl<'a, R: Read> SketchReader<'a, R> {
    /// Creates a new `SketchReader` over the given stream.
    pub fn new(reader: &'a mut R) -> Self {
        SketchReader { reader }
    }

    /// Reads exactly `buf.len()` bytes from the stream into `buf`.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.reader.read_exact(buf)
    }

    /// Reads a 32-bit signed integer in big-endian byte order.
    pub fn read_i32_be(&mut self) -> io::Result<i32> {
        self.reader.read_i32::<BigEndian>()
    }

    /// Reads a 32-bit unsigned integer in big-endian byte order.
    pub fn read_u32_be(&mut self) -> io::Result<u32> {
        self.reader.read_u32::<BigEndian>()
    }

    /// Reads a 64-bit signed integer in big-endian byte order.
    pub fn read_i64_be(&mut self) -> io::Result<i64> {
        self.reader.read_i64::<BigEndian>()
    }

    /// Reads a 64-bit unsigned integer in big-endian byte order.
    pub fn read_u64_be(&mut self) -> io::Result<u64> {
        self.reader.read_u64::<BigEndian>()
    }

    /// Reads a 64-bit floating-point number in big-endian byte order.
    pub fn read_f64_be(&mut self) -> io::Result<f64> {
        self.reader.read_f64::<BigEndian>()
    }
}
