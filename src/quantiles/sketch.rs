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
use std::io::Read;
use std::io::Write;

use crate::codec::SketchReader;
use crate::codec::SketchWriter;
use crate::error::Error;
use crate::quantiles::compare::Comparator;
use crate::quantiles::compare::NaturalOrder;
use crate::quantiles::serialization;
use crate::quantiles::serialization::QuantileValue;
use crate::quantiles::serialization::make_error;

/// The default bound on the number of elements a summary is sized for.
///
/// Cost in time and space to reach a given accuracy grows with the total
/// number of elements summarized. If no estimate is configured this upper
/// bound is used; the impact of overshooting is logarithmic, so the
/// default is fine for most uses.
pub(crate) const DEFAULT_MAX_INPUT_SIZE: u64 = 1_000_000_000;

/// A single buffer of the summary: a sorted run of elements standing in
/// for `weight` original elements each, at a collapse depth of `level`.
#[derive(Debug, Clone)]
struct QuantileBuffer<T> {
    level: u32,
    weight: u64,
    elements: Vec<T>,
}

/// An element reference tagged with its buffer's weight, used transiently
/// while interpolating.
struct WeightedElement<'a, T> {
    weight: u64,
    value: &'a T,
}

/// Mergeable bounded-memory summary of the distribution of a stream.
///
/// The sketch ingests elements one at a time via
/// [`update`](QuantileSketch::update), absorbs summaries built on other
/// shards via [`merge`](QuantileSketch::merge), and produces its
/// `num_quantiles` approximate N-tiles (exact minimum, `num_quantiles - 2`
/// evenly spaced intermediate values, exact maximum) via
/// [`quantiles`](QuantileSketch::quantiles).
///
/// See the [module level documentation](super) for the algorithm and its
/// error bound.
#[derive(Debug, Clone)]
pub struct QuantileSketch<T, C = NaturalOrder> {
    num_quantiles: usize,
    epsilon: f64,
    max_input_size: u64,
    /// Buffer capacity, k in the paper.
    buffer_size: usize,
    /// Buffer budget, b in the paper.
    max_buffers: usize,
    compare: C,

    min: Option<T>,
    max: Option<T>,
    /// Elements not yet flushed into a buffer, in insertion order.
    unbuffered: Vec<T>,
    /// Level-ascending; arrival order is stable among equal levels.
    buffers: Vec<QuantileBuffer<T>>,
    /// Alternates between 0 and 2 to balance rounding on even-weight
    /// collapses.
    offset_jitter: u64,
}

impl<T> QuantileSketch<T, NaturalOrder> {
    /// Creates a sketch producing `num_quantiles` output values under the
    /// natural ordering of `T`, with the default accuracy
    /// (`epsilon = 1 / num_quantiles`, sized for 10^9 elements).
    ///
    /// The fallible version of this method is [`QuantileSketch::try_new`];
    /// other orderings and accuracies go through
    /// [`QuantileSketchBuilder`](super::QuantileSketchBuilder).
    ///
    /// # Panics
    ///
    /// Panics if `num_quantiles` is less than 2.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let sketch = QuantileSketch::<i64>::new(11);
    /// assert_eq!(sketch.num_quantiles(), 11);
    /// assert!(sketch.is_empty());
    /// ```
    pub fn new(num_quantiles: usize) -> Self {
        Self::try_new(num_quantiles).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a sketch producing `num_quantiles` output values under the
    /// natural ordering of `T`.
    ///
    /// The panicking version of this method is [`QuantileSketch::new`].
    ///
    /// # Errors
    ///
    /// If `num_quantiles` is less than 2, returns
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument).
    pub fn try_new(num_quantiles: usize) -> Result<Self, Error> {
        let epsilon = 1.0 / num_quantiles as f64;
        Self::make(num_quantiles, epsilon, DEFAULT_MAX_INPUT_SIZE, NaturalOrder)
    }
}

impl<T, C> QuantileSketch<T, C> {
    pub(crate) fn make(
        num_quantiles: usize,
        epsilon: f64,
        max_input_size: u64,
        compare: C,
    ) -> Result<Self, Error> {
        if num_quantiles < 2 {
            return Err(Error::invalid_argument(format!(
                "num_quantiles must be at least 2, got {num_quantiles}"
            )));
        }
        if !(epsilon > 0.0) || !epsilon.is_finite() {
            return Err(Error::invalid_argument(format!(
                "epsilon must be positive and finite, got {epsilon}"
            )));
        }
        if max_input_size < 1 {
            return Err(Error::invalid_argument(
                "max_input_size must be at least 1",
            ));
        }

        let (buffer_size, max_buffers) = derive_buffer_parameters(epsilon, max_input_size);
        debug_assert!(buffer_size >= 2, "derived buffer size below 2");
        debug_assert!(max_buffers >= 2, "derived buffer budget below 2");

        Ok(QuantileSketch {
            num_quantiles,
            epsilon,
            max_input_size,
            buffer_size,
            max_buffers,
            compare,
            min: None,
            max: None,
            unbuffered: Vec::new(),
            buffers: Vec::new(),
            offset_jitter: 0,
        })
    }

    /// Returns true if the sketch has not seen any data.
    pub fn is_empty(&self) -> bool {
        self.unbuffered.is_empty() && self.buffers.is_empty()
    }

    /// Returns the number of original elements this sketch represents.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let mut sketch = QuantileSketch::new(5);
    /// for value in 0..100_i64 {
    ///     sketch.update(value);
    /// }
    /// assert_eq!(sketch.total_count(), 100);
    /// ```
    pub fn total_count(&self) -> u64 {
        let buffered: u64 = self
            .buffers
            .iter()
            .map(|buffer| self.buffer_size as u64 * buffer.weight)
            .sum();
        self.unbuffered.len() as u64 + buffered
    }

    /// Returns the smallest element seen; `None` if the sketch is empty.
    pub fn min_value(&self) -> Option<&T> {
        self.min.as_ref()
    }

    /// Returns the largest element seen; `None` if the sketch is empty.
    pub fn max_value(&self) -> Option<&T> {
        self.max.as_ref()
    }

    /// Returns the size of the output list, including both endpoints.
    pub fn num_quantiles(&self) -> usize {
        self.num_quantiles
    }

    /// Returns the configured rank-error bound.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the element-count bound the sketch was sized for.
    pub fn max_input_size(&self) -> u64 {
        self.max_input_size
    }

    /// Returns the derived buffer capacity (k in the paper).
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the derived buffer budget (b in the paper).
    pub fn max_buffers(&self) -> usize {
        self.max_buffers
    }

    /// Returns the number of buffers currently held; never exceeds
    /// [`max_buffers`](QuantileSketch::max_buffers) after a public
    /// operation returns.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Keeps `buffers` level-ascending with stable arrival order among
    /// equal levels.
    fn insert_buffer(&mut self, buffer: QuantileBuffer<T>) {
        let pos = self.buffers.partition_point(|held| held.level <= buffer.level);
        self.buffers.insert(pos, buffer);
    }
}

impl<T: Clone, C: Comparator<T>> QuantileSketch<T, C> {
    /// Adds one element to the collection being summarized.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let mut sketch = QuantileSketch::new(3);
    /// sketch.update(7_i64);
    /// sketch.update(3);
    /// assert_eq!(sketch.min_value(), Some(&3));
    /// assert_eq!(sketch.max_value(), Some(&7));
    /// ```
    pub fn update(&mut self, elem: T) {
        if self.is_empty() {
            self.min = Some(elem.clone());
            self.max = Some(elem.clone());
        } else if self.is_new_min(&elem) {
            self.min = Some(elem.clone());
        } else if self.is_new_max(&elem) {
            self.max = Some(elem.clone());
        }
        self.add_unbuffered(elem);
    }

    /// Updates this sketch as if it had also seen every element the other
    /// sketch has seen.
    ///
    /// Both sketches must have been created with the same configuration
    /// (`num_quantiles`, accuracy, comparator).
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let mut left = QuantileSketch::new(5);
    /// let mut right = QuantileSketch::new(5);
    /// left.update(1_i64);
    /// right.update(2_i64);
    /// left.merge(right);
    /// assert_eq!(left.total_count(), 2);
    /// ```
    pub fn merge(&mut self, other: QuantileSketch<T, C>) {
        debug_assert_eq!(
            self.buffer_size, other.buffer_size,
            "merged sketches must share a configuration"
        );
        if other.is_empty() {
            return;
        }

        let QuantileSketch {
            min,
            max,
            unbuffered,
            buffers,
            ..
        } = other;
        if let Some(other_min) = min {
            if self.is_new_min(&other_min) {
                self.min = Some(other_min);
            }
        }
        if let Some(other_max) = max {
            if self.is_new_max(&other_max) {
                self.max = Some(other_max);
            }
        }

        // The other tail replays through the regular single-element path
        // first (it can flush a buffer of its own); only then are the
        // other's buffers absorbed, so the final collapse sees a
        // consistent set.
        for elem in unbuffered {
            self.add_unbuffered(elem);
        }
        for buffer in buffers {
            self.insert_buffer(buffer);
        }
        self.collapse_if_needed();
    }

    /// Returns the approximate N-tiles of the elements seen so far: the
    /// minimum, `num_quantiles - 2` evenly spaced intermediate values, and
    /// the maximum, in sorted order.
    ///
    /// Returns an empty list if the sketch is empty. If fewer than
    /// `num_quantiles` elements were added, the list still has
    /// `num_quantiles` entries, with the endpoints repeated as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let mut sketch = QuantileSketch::new(5);
    /// for value in [1_i64, 2, 3, 4, 5] {
    ///     sketch.update(value);
    /// }
    /// assert_eq!(sketch.quantiles(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn quantiles(&self) -> Vec<T> {
        if self.is_empty() {
            return Vec::new();
        }
        let total_count = self.total_count();

        let remainder;
        let mut all: Vec<&QuantileBuffer<T>> = self.buffers.iter().collect();
        if !self.unbuffered.is_empty() {
            let mut elements = self.unbuffered.clone();
            elements.sort_by(|a, b| self.compare.compare(a, b));
            remainder = QuantileBuffer {
                level: 0,
                weight: 1,
                elements,
            };
            all.push(&remainder);
        }

        let spacing = (self.num_quantiles - 1) as f64;
        let step = total_count as f64 / spacing;
        let offset = (total_count as f64 - 1.0) / spacing;

        let mut result = Vec::with_capacity(self.num_quantiles);
        if let Some(min) = &self.min {
            result.push(min.clone());
        }
        result.extend(self.interpolate(&all, self.num_quantiles - 2, step, offset));
        if let Some(max) = &self.max {
            result.push(max.clone());
        }
        result
    }

    fn is_new_min(&self, elem: &T) -> bool {
        match &self.min {
            None => true,
            Some(min) => self.compare.compare(elem, min) == Ordering::Less,
        }
    }

    fn is_new_max(&self, elem: &T) -> bool {
        match &self.max {
            None => true,
            Some(max) => self.compare.compare(elem, max) == Ordering::Greater,
        }
    }

    /// Appends to the unbuffered tail, flushing it into a new sorted
    /// level-0 weight-1 buffer once full.
    fn add_unbuffered(&mut self, elem: T) {
        self.unbuffered.push(elem);
        if self.unbuffered.len() == self.buffer_size {
            let mut elements =
                std::mem::replace(&mut self.unbuffered, Vec::with_capacity(self.buffer_size));
            elements.sort_by(|a, b| self.compare.compare(a, b));
            self.insert_buffer(QuantileBuffer {
                level: 0,
                weight: 1,
                elements,
            });
            self.collapse_if_needed();
        }
    }

    fn collapse_if_needed(&mut self) {
        while self.buffers.len() > self.max_buffers {
            let mut group = Vec::new();
            group.push(self.buffers.remove(0));
            group.push(self.buffers.remove(0));
            let min_level = group[1].level;
            while self
                .buffers
                .first()
                .is_some_and(|buffer| buffer.level == min_level)
            {
                group.push(self.buffers.remove(0));
            }
            let collapsed = self.collapse(group);
            self.insert_buffer(collapsed);
        }
    }

    /// Replaces a group of buffers with one buffer of their summed weight
    /// by down-sampling their weighted sorted union at stride `weight`.
    fn collapse(&mut self, group: Vec<QuantileBuffer<T>>) -> QuantileBuffer<T> {
        let mut new_level = 0;
        let mut new_weight = 0u64;
        for buffer in &group {
            // All buffers of a group share a level in the single-stream
            // setting, but combining shard summaries can violate that;
            // take the max.
            new_level = new_level.max(buffer.level + 1);
            new_weight += buffer.weight;
        }
        let offset = self.offset(new_weight);

        let refs: Vec<&QuantileBuffer<T>> = group.iter().collect();
        let elements = self.interpolate(&refs, self.buffer_size, new_weight as f64, offset as f64);
        QuantileBuffer {
            level: new_level,
            weight: new_weight,
            elements,
        }
    }

    /// An even collapse weight has no middle element to keep, so the
    /// stride start must round up or down; alternating between the two
    /// avoids a systematic rank bias.
    fn offset(&mut self, new_weight: u64) -> u64 {
        if new_weight % 2 == 1 {
            (new_weight + 1) / 2
        } else {
            self.offset_jitter = 2 - self.offset_jitter;
            (new_weight + self.offset_jitter) / 2
        }
    }

    /// Takes the ordered union of the buffers' elements, each repeated
    /// according to its buffer's weight, and picks out the
    /// `(j * step + offset)`-th elements of that virtual list for
    /// `0 <= j < count`.
    ///
    /// If the union runs out first, the last picked element is repeated
    /// for the remaining positions.
    fn interpolate(
        &self,
        buffers: &[&QuantileBuffer<T>],
        count: usize,
        step: f64,
        offset: f64,
    ) -> Vec<T> {
        let total: usize = buffers.iter().map(|buffer| buffer.elements.len()).sum();
        let mut weighted = Vec::with_capacity(total);
        for buffer in buffers {
            for value in &buffer.elements {
                weighted.push(WeightedElement {
                    weight: buffer.weight,
                    value,
                });
            }
        }
        // Each buffer is already sorted, so the stable sort keeps
        // per-buffer order; cross-buffer ties resolve by push order,
        // which is fine because tied values are interchangeable.
        weighted.sort_by(|a, b| self.compare.compare(a.value, b.value));

        let mut picks = Vec::with_capacity(count);
        let mut iter = weighted.iter();
        let Some(first) = iter.next() else {
            return picks;
        };
        let mut picked = first.value;
        let mut current = first.weight as f64;
        for j in 0..count {
            let target = j as f64 * step + offset;
            while current <= target {
                match iter.next() {
                    Some(next) => {
                        picked = next.value;
                        current += next.weight as f64;
                    }
                    None => break,
                }
            }
            picks.push(picked.clone());
        }
        picks
    }
}

impl<T: QuantileValue, C> QuantileSketch<T, C> {
    /// Encodes this summary into the given stream.
    ///
    /// The encoding is deterministic iff the element encoding is. The
    /// rounding-jitter state is intentionally not part of the encoding:
    /// the error bound does not require reproducing it, but callers that
    /// need bit-identical replays must keep collapses within one process.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// for an empty summary (the wire format has no representation for
    /// absent extrema) and
    /// [`ErrorKind::Io`](crate::error::ErrorKind::Io) if the stream
    /// fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// let mut sketch = QuantileSketch::new(5);
    /// sketch.update(42_i64);
    /// let mut bytes = Vec::new();
    /// sketch.encode(&mut bytes).unwrap();
    /// assert!(!bytes.is_empty());
    /// ```
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        let (min, max) = match (&self.min, &self.max) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(Error::invalid_argument(
                    "cannot encode an empty summary: the wire format has no \
                     representation for absent extrema",
                ));
            }
        };

        let mut writer = SketchWriter::new(writer);
        min.serialize_value(&mut writer)?;
        max.serialize_value(&mut writer)?;
        serialization::serialize_list(&self.unbuffered, &mut writer)?;
        writer
            .write_i32_be(self.buffers.len() as i32)
            .map_err(Error::from)?;
        for buffer in &self.buffers {
            writer
                .write_i32_be(buffer.level as i32)
                .map_err(Error::from)?;
            writer
                .write_i64_be(buffer.weight as i64)
                .map_err(Error::from)?;
            serialization::serialize_list(&buffer.elements, &mut writer)?;
        }
        Ok(())
    }

    /// Encodes this summary into a freshly allocated byte vector.
    ///
    /// See [`encode`](QuantileSketch::encode).
    ///
    /// # Examples
    ///
    /// ```
    /// # use approx_quantiles::quantiles::QuantileSketch;
    /// # use approx_quantiles::quantiles::QuantileSketchBuilder;
    /// let mut sketch = QuantileSketch::new(5);
    /// sketch.update(42_i64);
    /// let bytes = sketch.serialize().unwrap();
    /// let decoded = QuantileSketchBuilder::new(5)
    ///     .decode::<i64, _>(&mut bytes.as_slice())
    ///     .unwrap();
    /// assert_eq!(decoded.total_count(), 1);
    /// ```
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes)?;
        Ok(bytes)
    }

    /// Populates this (empty, freshly configured) sketch from an encoded
    /// summary.
    pub(crate) fn read_state<R: Read>(&mut self, reader: &mut R) -> Result<(), Error> {
        let mut reader = SketchReader::new(reader);
        self.min = Some(T::deserialize_value(&mut reader)?);
        self.max = Some(T::deserialize_value(&mut reader)?);
        // The tail keeps its insertion order so that later updates replay
        // the same way they would have on the encoding side.
        self.unbuffered = serialization::deserialize_list(&mut reader)?;

        let buffer_count = reader.read_i32_be().map_err(make_error("buffer count"))?;
        if buffer_count < 0 {
            return Err(Error::deserial(format!(
                "buffer count cannot be negative, got {buffer_count}"
            )));
        }
        for _ in 0..buffer_count {
            let level = reader.read_i32_be().map_err(make_error("buffer level"))?;
            if level < 0 {
                return Err(Error::deserial(format!(
                    "buffer level cannot be negative, got {level}"
                )));
            }
            let weight = reader.read_i64_be().map_err(make_error("buffer weight"))?;
            if weight < 1 {
                return Err(Error::deserial(format!(
                    "buffer weight must be at least 1, got {weight}"
                )));
            }
            let elements = serialization::deserialize_list(&mut reader)?;
            self.insert_buffer(QuantileBuffer {
                level: level as u32,
                weight: weight as u64,
                elements,
            });
        }
        Ok(())
    }
}

/// Derives the buffer size (k) and buffer budget (b) that make the rank
/// error at most `epsilon * n` for any `n <= max_input_size`: the largest
/// `b >= 2` with `(b - 2) * 2^(b - 2) < epsilon * max_input_size`, and
/// `k = max(2, ceil(max_input_size / 2^(b - 1)))`.
fn derive_buffer_parameters(epsilon: f64, max_input_size: u64) -> (usize, usize) {
    let target = epsilon * max_input_size as f64;
    let mut b: u32 = 2;
    while ((b - 2) as f64) * (b as f64 - 2.0).exp2() < target {
        b += 1;
    }
    b -= 1;
    // The loop can exit without ever entering when the target is tiny,
    // leaving b = 1; the budget must stay at least 2.
    let b = b.max(2);

    let k = (max_input_size as f64 / (b as f64 - 1.0).exp2()).ceil() as u64;
    let k = k.max(2);
    (k as usize, b as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantiles::QuantileSketchBuilder;

    /// A sketch with buffer size 2 and budget 3, small enough to force
    /// collapses with a handful of elements.
    fn tiny_sketch() -> QuantileSketch<i64> {
        let sketch = QuantileSketchBuilder::new(2)
            .epsilon(0.5)
            .max_input_size(8)
            .build::<i64>();
        assert_eq!(sketch.buffer_size(), 2);
        assert_eq!(sketch.max_buffers(), 3);
        sketch
    }

    #[test]
    fn test_derive_buffer_parameters() {
        // epsilon 1/5 over the default input bound
        assert_eq!(derive_buffer_parameters(0.2, 1_000_000_000), (60, 25));
        // epsilon 1/11 over the default input bound
        assert_eq!(
            derive_buffer_parameters(1.0 / 11.0, 1_000_000_000),
            (239, 23)
        );
        // small streams derive the minimum geometry
        assert_eq!(derive_buffer_parameters(0.5, 4), (2, 2));
        // the while/decrement shape would leave b = 1 here without the guard
        assert_eq!(derive_buffer_parameters(1e-9, 1).1, 2);
    }

    #[test]
    fn test_offset_is_exact_on_odd_weights() {
        let mut sketch = QuantileSketch::<i64>::new(5);
        assert_eq!(sketch.offset(5), 3);
        assert_eq!(sketch.offset(7), 4);
        // odd weights never touch the jitter state
        assert_eq!(sketch.offset_jitter, 0);
    }

    #[test]
    fn test_offset_alternates_on_even_weights() {
        let mut sketch = QuantileSketch::<i64>::new(5);
        // first even collapse rounds up, the next rounds down
        assert_eq!(sketch.offset(4), 3);
        assert_eq!(sketch.offset(4), 2);
        assert_eq!(sketch.offset(4), 3);
        // odd calls in between leave the alternation where it was
        assert_eq!(sketch.offset(5), 3);
        assert_eq!(sketch.offset(6), 3);
    }

    #[test]
    fn test_flush_creates_level_zero_buffers() {
        let mut sketch = tiny_sketch();
        sketch.update(2);
        assert_eq!(sketch.buffer_count(), 0);
        assert_eq!(sketch.unbuffered, vec![2]);
        sketch.update(1);
        assert_eq!(sketch.buffer_count(), 1);
        assert!(sketch.unbuffered.is_empty());
        assert_eq!(sketch.buffers[0].level, 0);
        assert_eq!(sketch.buffers[0].weight, 1);
        // flushed tails are sorted
        assert_eq!(sketch.buffers[0].elements, vec![1, 2]);
    }

    #[test]
    fn test_collapse_preserves_weight_and_raises_level() {
        let mut sketch = tiny_sketch();
        for value in 1..=8 {
            sketch.update(value);
        }
        // four level-0 buffers collapse into one of weight 4 at level 1,
        // picked at stride 4 from [1..8] with the rounded-up offset 3
        assert_eq!(sketch.buffer_count(), 1);
        assert_eq!(sketch.buffers[0].level, 1);
        assert_eq!(sketch.buffers[0].weight, 4);
        assert_eq!(sketch.buffers[0].elements, vec![4, 8]);
        assert_eq!(sketch.total_count(), 8);
    }

    #[test]
    fn test_collapse_takes_max_level_plus_one() {
        let mut sketch = tiny_sketch();
        let group = vec![
            QuantileBuffer {
                level: 0,
                weight: 1,
                elements: vec![1, 2],
            },
            QuantileBuffer {
                level: 3,
                weight: 4,
                elements: vec![3, 4],
            },
        ];
        let collapsed = sketch.collapse(group);
        assert_eq!(collapsed.level, 4);
        assert_eq!(collapsed.weight, 5);
        assert_eq!(collapsed.elements.len(), 2);
    }

    #[test]
    fn test_buffer_budget_holds_throughout_a_stream() {
        let mut sketch = tiny_sketch();
        for value in 0..1000 {
            sketch.update(value);
            assert!(sketch.buffer_count() <= sketch.max_buffers());
            for buffer in &sketch.buffers {
                assert_eq!(buffer.elements.len(), sketch.buffer_size());
            }
        }
        assert_eq!(sketch.total_count(), 1000);
    }

    #[test]
    fn test_interpolate_handles_short_buffers() {
        let sketch = tiny_sketch();
        let heavy = QuantileBuffer {
            level: 1,
            weight: 3,
            elements: vec![10, 20],
        };
        let short = QuantileBuffer {
            level: 0,
            weight: 1,
            elements: vec![15],
        };
        // virtual union: 10 10 10 15 20 20 20
        let picks = sketch.interpolate(&[&heavy, &short], 3, 2.0, 1.0);
        assert_eq!(picks, vec![10, 15, 20]);
    }

    #[test]
    fn test_interpolate_repeats_last_pick_when_exhausted() {
        let sketch = tiny_sketch();
        let buffer = QuantileBuffer {
            level: 0,
            weight: 1,
            elements: vec![1, 2],
        };
        let picks = sketch.interpolate(&[&buffer], 4, 5.0, 0.0);
        assert_eq!(picks, vec![1, 2, 2, 2]);
    }

    #[test]
    fn test_interpolate_with_zero_count_is_empty() {
        let sketch = tiny_sketch();
        let buffer = QuantileBuffer {
            level: 0,
            weight: 1,
            elements: vec![1, 2],
        };
        assert!(sketch.interpolate(&[&buffer], 0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_merge_replays_tail_before_absorbing_buffers() {
        let mut left = tiny_sketch();
        let mut right = tiny_sketch();
        left.update(1);
        for value in [5, 6, 3] {
            right.update(value);
        }
        // right: one flushed buffer [5, 6] and an unbuffered [3]
        assert_eq!(right.buffer_count(), 1);
        assert_eq!(right.unbuffered, vec![3]);

        left.merge(right);
        // the replayed 3 joins left's 1 and flushes; [5, 6] is absorbed
        assert_eq!(left.buffer_count(), 2);
        assert_eq!(left.buffers[0].elements, vec![1, 3]);
        assert_eq!(left.buffers[1].elements, vec![5, 6]);
        assert_eq!(left.min_value(), Some(&1));
        assert_eq!(left.max_value(), Some(&6));
        assert_eq!(left.total_count(), 4);
    }

    #[test]
    fn test_merge_with_empty_is_a_no_op() {
        let mut sketch = tiny_sketch();
        sketch.update(1);
        let snapshot = sketch.clone();
        sketch.merge(tiny_sketch());
        assert_eq!(sketch.unbuffered, snapshot.unbuffered);
        assert_eq!(sketch.buffer_count(), snapshot.buffer_count());
        assert_eq!(sketch.min_value(), snapshot.min_value());
        assert_eq!(sketch.max_value(), snapshot.max_value());
    }

    #[test]
    fn test_quantiles_does_not_disturb_the_tail() {
        let mut sketch = QuantileSketch::new(3);
        for value in [9_i64, 1, 5] {
            sketch.update(value);
        }
        let _ = sketch.quantiles();
        // the unbuffered tail keeps insertion order across extraction
        assert_eq!(sketch.unbuffered, vec![9, 1, 5]);
    }

    #[test]
    fn test_encode_rejects_empty_summary() {
        let sketch = QuantileSketch::<i64>::new(5);
        let err = sketch.serialize().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_reencode_is_byte_identical() {
        let mut sketch = tiny_sketch();
        for value in 0..37 {
            sketch.update(value);
        }
        let bytes = sketch.serialize().unwrap();
        let decoded = QuantileSketchBuilder::new(2)
            .epsilon(0.5)
            .max_input_size(8)
            .decode::<i64, _>(&mut bytes.as_slice())
            .unwrap();
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }
}
