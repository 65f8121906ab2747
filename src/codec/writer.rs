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
use std::io::Write;

use byteorder::BigEndian;
use byteorder::WriteBytesExt;

/// A wrapper around an output stream that provides methods for writing the
/// fixed-width values used by the summary wire format.
pub struct SketchWriter<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> SketchWriter<'a, W> {
    /// Creates a new `SketchWriter` over the given stream.
    pub fn new(writer: &'a mut W) -> Self {
        SketchWriter { writer }
    }

    /// Writes the given byte slice to the stream.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    /// Writes a 32-bit signed integer in big-endian byte order.
    pub fn write_i32_be(&mut self, n: i32) -> io::Result<()> {
        self.writer.write_i32::<BigEndian>(n)
    }

    /// Writes a 32-bit unsigned integer in big-endian byte order.
    pub fn write_u32_be(&mut self, n: u32) -> io::Result<()> {
        self.writer.write_u32::<BigEndian>(n)
    }

    /// Writes a 64-bit signed integer in big-endian byte order.
    pub fn write_i64_be(&mut self, n: i64) -> io::Result<()> {
        self.writer.write_i64::<BigEndian>(n)
    }

    /// Writes a 64-bit unsigned integer in big-endian byte order.
    pub fn write_u64_be(&mut self, n: u64) -> io::Result<()> {
        self.writer.write_u64::<BigEndian>(n)
    }

    /// Writes a 64-bit floating-point number in big-endian byte order.
    pub fn write_f64_be(&mut self, n: f64) -> io::Result<()> {
        self.writer.write_f64::<BigEndian>(n)
    }
}
