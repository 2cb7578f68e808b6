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

//! Reusable scratch space of element positions

use arrow_schema::ArrowError;
use tracing::trace;

/// A grow-only buffer of `u32` positions into the array being sorted.
///
/// [`PositionIndex::ensure`] resets the first `len` slots to the identity
/// permutation. Slots past `len` hold whatever a previous, longer call left
/// behind and are never read.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    positions: Vec<u32>,
}

impl PositionIndex {
    /// Creates an index with room for `capacity` positions
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: vec![0; capacity],
        }
    }

    /// Returns the number of positions that can be held without reallocating
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Grows the index if it is shorter than `len` and writes `0..len` into the
    /// first `len` slots, returning them.
    pub fn ensure(&mut self, len: usize) -> Result<&mut [u32], ArrowError> {
        let end = u32::try_from(len).map_err(|_| {
            ArrowError::ComputeError(format!(
                "Cannot sort array of length {len}, at most {} elements are supported",
                u32::MAX
            ))
        })?;

        if self.positions.len() < len {
            trace!(from = self.positions.len(), to = len, "growing position index");
            self.positions.resize(len, 0);
        }

        let positions = &mut self.positions[..len];
        positions
            .iter_mut()
            .zip(0..end)
            .for_each(|(slot, position)| *slot = position);
        Ok(positions)
    }

    /// Returns the first `len` positions as left by the last sort
    pub(crate) fn get(&self, len: usize) -> &[u32] {
        &self.positions[..len]
    }
}
