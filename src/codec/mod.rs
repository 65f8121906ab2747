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

//! Byte-level primitives for encoding and decoding summaries.
//!
//! The wrappers in this module adapt a caller-supplied [`std::io::Write`]
//! or [`std::io::Read`] to the fixed-width big-endian operations the
//! summary wire format is built from. They deliberately return
//! [`std::io::Result`]; classifying a failure as truncated data versus a
//! stream error is left to the decoding call sites, which know which
//! field they were reading.

mod reader;
mod writer;

pub use self::reader::SketchReader;
pub use self::writer::SketchWriter;
