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

use std::io::Read;

use crate::error::Error;
use crate::quantiles::compare::NaturalOrder;
use crate::quantiles::serialization::QuantileValue;
use crate::quantiles::sketch::DEFAULT_MAX_INPUT_SIZE;
use crate::quantiles::sketch::QuantileSketch;

/// Builder for creating [`QuantileSketch`] instances.
///
/// The plain constructors ([`QuantileSketch::new`] and friends) cover the
/// common case; the builder exists to adjust the accuracy knobs and to
/// inject a comparator for element types without a natural ordering.
///
/// # Examples
///
/// ```
/// # use approx_quantiles::quantiles::QuantileSketchBuilder;
/// let sketch = QuantileSketchBuilder::new(11)
///     .epsilon(0.005)
///     .max_input_size(50_000_000)
///     .build::<i64>();
/// assert_eq!(sketch.epsilon(), 0.005);
/// ```
#[derive(Debug, Clone)]
pub struct QuantileSketchBuilder<C = NaturalOrder> {
    num_quantiles: usize,
    epsilon: Option<f64>,
    max_input_size: u64,
    compare: C,
}

impl QuantileSketchBuilder<NaturalOrder> {
    /// Creates a builder for a sketch producing `num_quantiles` output
    /// values, with the natural ordering and the default accuracy
    /// (`epsilon = 1 / num_quantiles`, sized for 10^9 elements).
    pub fn new(num_quantiles: usize) -> Self {
        QuantileSketchBuilder {
            num_quantiles,
            epsilon: None,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            compare: NaturalOrder,
        }
    }
}

impl<C> QuantileSketchBuilder<C> {
    /// Sets the rank-error bound.
    ///
    /// For any requested rank `c` the reported value's true rank `c'`
    /// satisfies `|c - c'| <= epsilon * N`, as long as no more than
    /// `max_input_size` elements are summarized.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Sets the number of elements the sketch is sized for.
    ///
    /// The error bound only holds while the summarized count stays at or
    /// below this value; overshooting the true count merely costs memory,
    /// and only logarithmically. The configured epsilon is kept as is.
    pub fn max_input_size(mut self, max_input_size: u64) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    /// Replaces the comparator that orders elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::F64Order;
    /// # use approx_quantiles::quantiles::QuantileSketchBuilder;
    /// let mut sketch = QuantileSketchBuilder::new(3)
    ///     .comparator(F64Order)
    ///     .build::<f64>();
    /// sketch.update(1.5);
    /// assert_eq!(sketch.min_value(), Some(&1.5));
    /// ```
    pub fn comparator<C2>(self, compare: C2) -> QuantileSketchBuilder<C2> {
        QuantileSketchBuilder {
            num_quantiles: self.num_quantiles,
            epsilon: self.epsilon,
            max_input_size: self.max_input_size,
            compare,
        }
    }

    /// Builds the sketch.
    ///
    /// The fallible version of this method is
    /// [`try_build`](QuantileSketchBuilder::try_build).
    ///
    /// # Panics
    ///
    /// Panics if `num_quantiles` is less than 2, the epsilon is not
    /// positive and finite, or `max_input_size` is zero.
    pub fn build<T>(self) -> QuantileSketch<T, C> {
        self.try_build().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Builds the sketch.
    ///
    /// The panicking version of this method is
    /// [`build`](QuantileSketchBuilder::build).
    ///
    /// # Errors
    ///
    /// Returns
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `num_quantiles` is less than 2, the epsilon is not positive and
    /// finite, or `max_input_size` is zero.
    pub fn try_build<T>(self) -> Result<QuantileSketch<T, C>, Error> {
        let epsilon = self
            .epsilon
            .unwrap_or(1.0 / self.num_quantiles as f64);
        QuantileSketch::make(self.num_quantiles, epsilon, self.max_input_size, self.compare)
    }

    /// Builds an empty sketch with this configuration and populates it
    /// from an encoded summary.
    ///
    /// The configuration is not part of the encoding; decoding with a
    /// configuration different from the encoding side's produces a
    /// summary whose behavior is unspecified (though never unsafe).
    ///
    /// # Errors
    ///
    /// Returns
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// for an invalid configuration,
    /// [`ErrorKind::InvalidData`](crate::error::ErrorKind::InvalidData)
    /// for truncated or malformed bytes, and
    /// [`ErrorKind::Io`](crate::error::ErrorKind::Io) if the stream
    /// fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// # use approx_quantiles::quantiles::QuantileSketchBuilder;
    /// let mut sketch = QuantileSketch::new(5);
    /// sketch.update(1_i64);
    /// sketch.update(2);
    /// let bytes = sketch.serialize().unwrap();
    ///
    /// let decoded = QuantileSketchBuilder::new(5)
    ///     .decode::<i64, _>(&mut bytes.as_slice())
    ///     .unwrap();
    /// assert_eq!(decoded.quantiles(), sketch.quantiles());
    /// ```
    pub fn decode<T: QuantileValue, R: Read>(
        self,
        reader: &mut R,
    ) -> Result<QuantileSketch<T, C>, Error> {
        let mut sketch = self.try_build()?;
        sketch.read_state(reader)?;
        Ok(sketch)
    }
}
