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

//! Mergeable approximate quantile summaries over an ordered element domain.
//!
//! The implementation follows the "New Algorithm" described in
//! [Approximate Medians and other Quantiles in One Pass and with Limited
//! Memory][paper] by Manku, Rajagopalan and Lindsay (MRL98): incoming
//! elements accumulate in a small unbuffered tail, full tails become
//! sorted weight-1 buffers, and whenever the number of buffers exceeds
//! the budget the lowest-level group is *collapsed* into a single buffer
//! of summed weight by down-sampling its weighted sorted union. The
//! summary tracks the exact minimum and maximum separately, so the first
//! and last output values are always exact.
//!
//! A few properties worth knowing:
//!
//! * For a configured `(epsilon, max_input_size)`, any value reported for
//!   rank `c` has true rank `c'` with `|c - c'| <= epsilon * N`, provided
//!   `N <= max_input_size`. The default `epsilon` is `1 / num_quantiles`,
//!   and in practice accuracy is much better than the bound.
//! * Summaries built on independent shards can be merged; the bound above
//!   also holds for the merged result. Merging is not commutative at the
//!   byte level (the rounding-jitter state and tail replay order differ),
//!   but outputs of either merge order satisfy the same bound.
//! * Memory is bounded by `O(b * k)` elements for the derived buffer
//!   count `b` and buffer size `k`, regardless of stream length.
//!
//! Elements are opaque to the summary: ordering is injected as a
//! [`Comparator`] value and serialization as a [`QuantileValue`]
//! implementation, so the summary can be used with domain types the crate
//! knows nothing about.
//!
//! # Examples
//!
//! ```
//! use approx_quantiles::quantiles::QuantileSketch;
//!
//! let mut sketch = QuantileSketch::new(5);
//! for value in 1..=1000_i64 {
//!     sketch.update(value);
//! }
//! let quartiles = sketch.quantiles();
//! assert_eq!(quartiles.len(), 5);
//! assert_eq!(quartiles[0], 1);
//! assert_eq!(quartiles[4], 1000);
//! ```
//!
//! [paper]: https://doi.org/10.1145/276304.276342

mod builder;
mod compare;
mod serialization;
mod sketch;

pub use self::builder::QuantileSketchBuilder;
pub use self::compare::Comparator;
pub use self::compare::F64Order;
pub use self::compare::NaturalOrder;
pub use self::serialization::QuantileValue;
pub use self::sketch::QuantileSketch;
