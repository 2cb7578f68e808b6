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

//! Comparator driven sorting of Arrow arrays
//!
//! Sorts the elements of an array with a user supplied three-way comparator,
//! such as a SQL `array_sort(array, (a, b) -> ...)` lambda. Nulls are always
//! placed last and never passed to the comparator.
//!
//! # Sort an array
//!
//! ```
//! # use arrow_array::{StringArray, cast::AsArray};
//! # use arrow_array_sort::{array_sort, ElementComparator};
//! let array = StringArray::from(vec![Some("ccc"), None, Some("a"), Some("bb")]);
//!
//! // Longest first
//! let mut cmp = ElementComparator::bytes(|a, b| Ok(b.len().cmp(&a.len()) as i64));
//! let sorted = array_sort(&array, &mut cmp).unwrap();
//!
//! let expected = StringArray::from(vec![Some("ccc"), Some("bb"), Some("a"), None]);
//! assert_eq!(sorted.as_string::<i32>(), &expected);
//! ```
//!
//! # Sort every row of a list
//!
//! ```
//! # use arrow_array::builder::{Int32Builder, ListBuilder};
//! # use arrow_array::{cast::AsArray, types::Int32Type};
//! # use arrow_array_sort::{ArraySortFunction, ElementComparator};
//! # use arrow_schema::DataType;
//! let mut builder = ListBuilder::new(Int32Builder::new());
//! builder.append_value([Some(2), None, Some(1)]);
//! builder.append_value([Some(4), Some(3)]);
//! let list = builder.finish();
//!
//! let mut function = ArraySortFunction::try_new(DataType::Int32).unwrap();
//! let mut cmp = ElementComparator::integer(|a, b| Ok((a - b).signum()));
//! let sorted = function.sort_list(&list, &mut cmp).unwrap();
//!
//! let first: Vec<_> = sorted.value(0).as_primitive::<Int32Type>().iter().collect();
//! assert_eq!(first, vec![Some(1), Some(2), None]);
//! ```

#![warn(missing_docs)]
pub mod accessor;
pub mod comparator;
pub mod kernel;
pub mod positions;
pub mod region;
pub mod sort;
pub mod sorter;

pub use accessor::SortAccessor;
pub use comparator::{validate_comparator_result, COMPARATOR_RETURN_ERROR};
pub use kernel::{array_sort, ArraySortFunction, ElementComparator, ElementKind};
pub use positions::PositionIndex;
pub use region::OutputRegion;
pub use sort::try_sort_unstable_by;
pub use sorter::{ArraySortOptions, ArraySorter};
