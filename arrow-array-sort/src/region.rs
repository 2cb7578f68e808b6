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

//! The output region sorted results are appended to
//!
//! A region counts the elements appended by successive sorts. Each sort
//! appends its elements in sorted order and receives an array holding exactly
//! the range it appended:
//!
//! ```text
//!  region after three sorts
//! ┌─────┬─────┬─────┬─────┬─────┬─────┐
//! │  1  │  2  │  3  │  a  │  b  │  7  │ ...
//! └─────┴─────┴─────┴─────┴─────┴─────┘
//! ◀───── sort 1 ────▶◀─ sort 2 ─▶◀ 3 ▶
//! ```
//!
//! Every range is materialized into buffers of its own with [`take`], so a
//! returned array never keeps earlier ranges alive and stays valid after the
//! region is reset. Once a region holds at least its capacity, the next sort
//! resets it before appending anything.

use arrow_array::{Array, ArrayRef, UInt32Array};
use arrow_schema::{ArrowError, DataType};
use arrow_select::take::take;

/// An append-only sequence of elements of one [`DataType`], reset once full.
///
/// Resetting only clears the element count, a region owns no element storage
/// of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRegion {
    data_type: DataType,
    capacity: usize,
    len: usize,
}

impl OutputRegion {
    /// Creates an empty region for `data_type` that is full once it holds
    /// `capacity` elements
    pub fn new(data_type: DataType, capacity: usize) -> Self {
        Self {
            data_type,
            capacity,
            len: 0,
        }
    }

    /// Returns the data type of the elements appended to this region
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns the number of elements this region holds before it is full
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of elements appended since the last reset
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no elements were appended since the last reset
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the region holds at least its capacity
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Discards every element appended so far
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Appends the elements of `source` at `positions`, in order, nulls
    /// included, and returns exactly the appended range
    pub fn append(
        &mut self,
        source: &dyn Array,
        positions: &[u32],
    ) -> Result<ArrayRef, ArrowError> {
        if source.data_type() != &self.data_type {
            return Err(ArrowError::InvalidArgumentError(format!(
                "Cannot append array of type {} to output region of type {}",
                source.data_type(),
                self.data_type
            )));
        }

        let indices = UInt32Array::from(positions.to_vec());
        let values = take(source, &indices, None)?;
        self.len += values.len();
        Ok(values)
    }
}
