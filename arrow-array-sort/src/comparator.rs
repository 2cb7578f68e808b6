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

//! Adapts user supplied three-way comparators to the sort engine

use crate::accessor::SortAccessor;
use arrow_buffer::NullBuffer;
use arrow_schema::ArrowError;
use std::cmp::Ordering;
use tracing::debug;

/// The message reported when a comparator returns something other than -1, 0 or 1
pub const COMPARATOR_RETURN_ERROR: &str = "Lambda comparator must return either -1, 0, or 1";

/// Converts the raw result of a user comparator into an [`Ordering`]
#[inline]
pub fn validate_comparator_result(result: i64) -> Result<Ordering, ArrowError> {
    match result {
        -1 => Ok(Ordering::Less),
        0 => Ok(Ordering::Equal),
        1 => Ok(Ordering::Greater),
        other => {
            debug!(result = other, "comparator returned out of range value");
            Err(ArrowError::InvalidArgumentError(
                COMPARATOR_RETURN_ERROR.to_string(),
            ))
        }
    }
}

/// Compares two positions of an array with a user comparator.
///
/// Nulls always sort after every valid value and compare equal to each other,
/// the user comparator only ever sees pairs of valid values.
pub(crate) struct NullsLastComparator<A, F> {
    array: A,
    nulls: Option<NullBuffer>,
    cmp: F,
}

impl<A, F> NullsLastComparator<A, F>
where
    A: SortAccessor,
    F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
{
    pub(crate) fn new(array: A, cmp: F) -> Self {
        let nulls = array
            .as_array()
            .logical_nulls()
            .filter(|n| n.null_count() > 0);
        Self { array, nulls, cmp }
    }

    #[inline]
    fn compare_valid(&mut self, l: usize, r: usize) -> Result<Ordering, ArrowError> {
        let result = (self.cmp)(self.array.value_at(l), self.array.value_at(r))?;
        validate_comparator_result(result)
    }

    /// Compares the values at positions `l` and `r`
    #[inline]
    pub(crate) fn compare(&mut self, l: u32, r: u32) -> Result<Ordering, ArrowError> {
        let (l, r) = (l as usize, r as usize);
        match &self.nulls {
            None => self.compare_valid(l, r),
            Some(nulls) => match (nulls.is_null(l), nulls.is_null(r)) {
                (true, true) => Ok(Ordering::Equal),
                (true, false) => Ok(Ordering::Greater),
                (false, true) => Ok(Ordering::Less),
                (false, false) => self.compare_valid(l, r),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{Int64Array, StringArray};

    #[test]
    fn test_validate() {
        assert_eq!(validate_comparator_result(-1).unwrap(), Ordering::Less);
        assert_eq!(validate_comparator_result(0).unwrap(), Ordering::Equal);
        assert_eq!(validate_comparator_result(1).unwrap(), Ordering::Greater);

        for invalid in [2, -2, i64::MAX, i64::MIN] {
            let err = validate_comparator_result(invalid).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid argument error: Lambda comparator must return either -1, 0, or 1"
            );
        }
    }

    #[test]
    fn test_nulls_never_reach_comparator() {
        let array = Int64Array::from(vec![Some(1), None, Some(2), None]);
        let mut calls = 0;
        let mut cmp = NullsLastComparator::new(&array, |a: i64, b: i64| {
            calls += 1;
            Ok((a - b).signum())
        });

        assert_eq!(cmp.compare(1, 3).unwrap(), Ordering::Equal);
        assert_eq!(cmp.compare(1, 0).unwrap(), Ordering::Greater);
        assert_eq!(cmp.compare(2, 3).unwrap(), Ordering::Less);
        assert_eq!(cmp.compare(2, 0).unwrap(), Ordering::Greater);
        drop(cmp);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_null_policy_overrides_comparator() {
        // a comparator claiming everything is smaller cannot move nulls forward
        let array = StringArray::from(vec![None, Some("a")]);
        let mut cmp = NullsLastComparator::new(&array, |_: &str, _: &str| Ok(-1));
        assert_eq!(cmp.compare(0, 1).unwrap(), Ordering::Greater);
        assert_eq!(cmp.compare(1, 0).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_comparator_error_propagates() {
        let array = Int64Array::from(vec![1, 2]);
        let mut cmp = NullsLastComparator::new(&array, |_: i64, _: i64| {
            Err(ArrowError::ComputeError("boom".to_string()))
        });
        let err = cmp.compare(0, 1).unwrap_err();
        assert!(matches!(err, ArrowError::ComputeError(m) if m == "boom"));

        let mut cmp = NullsLastComparator::new(&array, |_: i64, _: i64| Ok(3));
        let err = cmp.compare(0, 1).unwrap_err();
        assert!(matches!(err, ArrowError::InvalidArgumentError(_)));
    }
}
