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

use std::cmp::Ordering;

/// A total order over element values, carried in the summary as a plain
/// value.
///
/// A comparator must be cheap to clone and reconstructible on a remote
/// worker without shipping code; in practice that means a zero-sized or
/// small `Clone` type. The order it defines must be total: for any two
/// elements exactly one of less / equal / greater holds, consistently
/// across calls.
pub trait Comparator<T> {
    /// Compares two elements, returning their relative order.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural ordering of elements that implement [`Ord`].
///
/// This is the default comparator; being zero-sized and [`Default`], any
/// worker can reconstruct it symbolically.
///
/// # Examples
///
/// ```
/// # use std::cmp::Ordering;
/// # use approx_quantiles::quantiles::Comparator;
/// # use approx_quantiles::quantiles::NaturalOrder;
/// assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// IEEE-754 total ordering for `f64` elements.
///
/// `f64` has no natural [`Ord`]; this comparator uses
/// [`f64::total_cmp`], which orders NaN after infinity and
/// distinguishes signed zeros.
///
/// # Examples
///
/// ```
/// # use approx_quantiles::quantiles::F64Order;
/// # use approx_quantiles::quantiles::QuantileSketchBuilder;
/// let mut sketch = QuantileSketchBuilder::new(3)
///     .comparator(F64Order)
///     .build::<f64>();
/// sketch.update(2.5);
/// sketch.update(0.5);
/// assert_eq!(sketch.quantiles(), vec![0.5, 0.5, 2.5]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F64Order;

impl Comparator<f64> for F64Order {
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}
