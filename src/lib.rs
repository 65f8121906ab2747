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

//! # Approximate quantile summaries
//!
//! Mergeable, bounded-memory summaries of the distribution of a stream of
//! ordered elements. A summary ingests elements one at a time, can absorb
//! summaries built independently on other shards, and on demand produces a
//! fixed-size sorted list of approximate `N`-tiles. Summaries have a
//! deterministic binary encoding so they can be shipped between workers of
//! a distributed aggregation.
//!
//! See the [`quantiles`] module for the algorithm, its error bound, and
//! usage examples.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod codec;
pub mod error;
pub mod quantiles;
