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

//! Defines [`ArraySorter`], a reusable comparator driven sort of arrays

use crate::accessor::SortAccessor;
use crate::comparator::NullsLastComparator;
use crate::positions::PositionIndex;
use crate::region::OutputRegion;
use crate::sort::try_sort_unstable_by;
use arrow_array::ArrayRef;
use arrow_schema::{ArrowError, DataType};
use std::fmt::Formatter;
use tracing::debug;

/// Default number of positions an [`ArraySorter`] preallocates
pub const DEFAULT_INITIAL_POSITIONS: usize = 128;

/// Default number of elements an output region holds before it is reset
pub const DEFAULT_REGION_CAPACITY: usize = 8192;

/// Options that tune the scratch space of an [`ArraySorter`].
///
/// These only affect memory use, never the result of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArraySortOptions {
    /// Number of positions to allocate up front
    pub initial_positions: usize,
    /// Number of elements the output region may accumulate before it is
    /// reset, must be at least 1
    pub region_capacity: usize,
}

impl Default for ArraySortOptions {
    fn default() -> Self {
        Self {
            initial_positions: DEFAULT_INITIAL_POSITIONS,
            region_capacity: DEFAULT_REGION_CAPACITY,
        }
    }
}

impl ArraySortOptions {
    /// Set the number of positions allocated up front
    pub fn with_initial_positions(mut self, initial_positions: usize) -> Self {
        self.initial_positions = initial_positions;
        self
    }

    /// Set the number of elements the output region holds before it is reset
    pub fn with_region_capacity(mut self, region_capacity: usize) -> Self {
        self.region_capacity = region_capacity;
        self
    }
}

/// Sorts arrays of a single [`DataType`] with user supplied three-way comparators.
///
/// An `ArraySorter` owns the scratch space used by a sort, a [`PositionIndex`]
/// and an [`OutputRegion`], and reuses it across calls. It therefore requires
/// `&mut self` to sort, and concurrent callers should each hold their own.
///
/// Comparators return `-1`, `0` or `1`, any other value fails the sort with
/// [`ArrowError::InvalidArgumentError`]. They are only called for pairs of
/// valid values, nulls are always placed after every valid value.
///
/// The sort is unstable, and the comparator may be called on any pair, in any
/// order, any number of times.
///
/// ```
/// # use arrow_array::{Int32Array, cast::AsArray, types::Int32Type};
/// # use arrow_array_sort::ArraySorter;
/// # use arrow_schema::DataType;
/// let mut sorter = ArraySorter::try_new(DataType::Int32).unwrap();
///
/// let array = Int32Array::from(vec![Some(3), None, Some(1), Some(2)]);
/// let sorted = sorter.sort_by(&array, |a, b| (b - a).signum() as i64).unwrap();
///
/// let expected = Int32Array::from(vec![Some(3), Some(2), Some(1), None]);
/// assert_eq!(sorted.as_primitive::<Int32Type>(), &expected);
/// ```
pub struct ArraySorter {
    data_type: DataType,
    options: ArraySortOptions,
    positions: PositionIndex,
    region: OutputRegion,
}

impl std::fmt::Debug for ArraySorter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySorter")
            .field("data_type", &self.data_type)
            .field("options", &self.options)
            .field("positions", &self.positions.capacity())
            .field("region", &self.region.len())
            .finish()
    }
}

impl ArraySorter {
    /// Creates a sorter for arrays of `data_type` with default options
    pub fn try_new(data_type: DataType) -> Result<Self, ArrowError> {
        Self::try_new_with_options(data_type, ArraySortOptions::default())
    }

    /// Creates a sorter for arrays of `data_type`
    pub fn try_new_with_options(
        data_type: DataType,
        options: ArraySortOptions,
    ) -> Result<Self, ArrowError> {
        if options.region_capacity == 0 {
            return Err(ArrowError::InvalidArgumentError(
                "Output region capacity must be at least 1".to_string(),
            ));
        }
        let region = OutputRegion::new(data_type.clone(), options.region_capacity);
        Ok(Self {
            positions: PositionIndex::with_capacity(options.initial_positions),
            data_type,
            options,
            region,
        })
    }

    /// Returns the data type of the arrays this sorter accepts
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns the options this sorter was created with
    pub fn options(&self) -> &ArraySortOptions {
        &self.options
    }

    /// Returns the number of positions the sorter can hold without growing
    pub fn positions_capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Returns the number of elements held by the output region
    pub fn region_len(&self) -> usize {
        self.region.len()
    }

    /// Sorts `array` with an infallible comparator, see [`Self::try_sort_by`]
    pub fn sort_by<A, F>(&mut self, array: A, mut cmp: F) -> Result<ArrayRef, ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> i64,
    {
        self.try_sort_by(array, |a, b| Ok(cmp(a, b)))
    }

    /// Sorts `array` with a fallible comparator, returning a new array with the
    /// same elements, nulls last.
    ///
    /// The first error returned by `cmp`, or the first result outside of
    /// `-1..=1`, aborts the sort and is returned.
    pub fn try_sort_by<A, F>(&mut self, array: A, cmp: F) -> Result<ArrayRef, ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
    {
        let len = self.sort_positions(array, cmp)?;

        if self.region.is_full() {
            debug!(
                len = self.region.len(),
                capacity = self.options.region_capacity,
                "resetting output region"
            );
            self.region.reset();
        }

        self.region.append(array.as_array(), self.positions.get(len))
    }

    /// Sorts `array` with a fallible comparator and returns the positions of its
    /// elements in sorted order, nulls last, without materializing them.
    ///
    /// The returned slice is only valid until the next sort.
    pub fn try_sort_to_indices<A, F>(&mut self, array: A, cmp: F) -> Result<&[u32], ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
    {
        let len = self.sort_positions(array, cmp)?;
        Ok(self.positions.get(len))
    }

    fn sort_positions<A, F>(&mut self, array: A, cmp: F) -> Result<usize, ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
    {
        let values = array.as_array();
        if values.data_type() != &self.data_type {
            return Err(ArrowError::InvalidArgumentError(format!(
                "Sorter for {} cannot sort array of type {}",
                self.data_type,
                values.data_type()
            )));
        }

        let len = values.len();
        let positions = self.positions.ensure(len)?;
        let mut comparator = NullsLastComparator::new(array, cmp);
        try_sort_unstable_by(positions, |l, r| comparator.compare(*l, *r))?;
        Ok(len)
    }
}
