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

//! Dynamically typed `array_sort` kernels
//!
//! [`ArraySorter`] is statically typed over the accessor it sorts. The kernels
//! in this module accept any `&dyn Array`, resolve its [`ElementKind`] once per
//! call and dispatch to the matching monomorphized sort. Values are widened to
//! one type per kind before they reach the comparator:
//!
//! - integer (`Int8`..`Int64`, `UInt8`..`UInt32`, dates, times, timestamps,
//!   durations) as `i64`
//! - floating-point (`Float32`, `Float64`) as `f64`
//! - boolean as `bool`
//! - bytes (`Utf8`, `LargeUtf8`, `Utf8View`, `Binary`, `LargeBinary`,
//!   `BinaryView`, `FixedSizeBinary`) as `&[u8]`
//! - nested (`List`, `LargeList`, `FixedSizeList`, `Map`, `Struct`) as [`ArrayRef`]

use crate::accessor::SortAccessor;
use crate::sorter::{ArraySortOptions, ArraySorter};
use arrow_array::cast::AsArray;
use arrow_array::types::*;
use arrow_array::*;
use arrow_buffer::{OffsetBuffer, ScalarBuffer};
use arrow_schema::{ArrowError, DataType, TimeUnit};
use arrow_select::take::take;
use num::traits::AsPrimitive;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The physical family of an element type, which determines the value type a
/// comparator receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Integers and integer backed temporal types, compared as `i64`
    Integer,
    /// Floating point numbers, compared as `f64`
    Float,
    /// Booleans
    Boolean,
    /// Strings and binary, compared as `&[u8]`
    Bytes,
    /// Lists, maps and structs, compared as [`ArrayRef`]
    Nested,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Float => "floating-point",
            Self::Boolean => "boolean",
            Self::Bytes => "bytes",
            Self::Nested => "nested",
        };
        f.write_str(name)
    }
}

impl ElementKind {
    /// Returns the kind of `data_type`, or an error if arrays of `data_type`
    /// cannot be sorted with a comparator
    pub fn try_from_data_type(data_type: &DataType) -> Result<Self, ArrowError> {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _)
            | DataType::Duration(_) => Ok(Self::Integer),
            DataType::Float32 | DataType::Float64 => Ok(Self::Float),
            DataType::Boolean => Ok(Self::Boolean),
            DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
            | DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_) => Ok(Self::Bytes),
            DataType::List(_)
            | DataType::LargeList(_)
            | DataType::FixedSizeList(_, _)
            | DataType::Map(_, _)
            | DataType::Struct(_) => Ok(Self::Nested),
            t => Err(ArrowError::ComputeError(format!(
                "Sort not supported for data type {t:?}"
            ))),
        }
    }
}

/// A comparator over integers
pub type IntegerComparator<'a> = Box<dyn FnMut(i64, i64) -> Result<i64, ArrowError> + 'a>;
/// A comparator over floating point numbers
pub type FloatComparator<'a> = Box<dyn FnMut(f64, f64) -> Result<i64, ArrowError> + 'a>;
/// A comparator over booleans
pub type BooleanComparator<'a> = Box<dyn FnMut(bool, bool) -> Result<i64, ArrowError> + 'a>;
/// A comparator over strings and binary
pub type BytesComparator<'a> = Box<dyn FnMut(&[u8], &[u8]) -> Result<i64, ArrowError> + 'a>;
/// A comparator over nested values
pub type NestedComparator<'a> =
    Box<dyn FnMut(ArrayRef, ArrayRef) -> Result<i64, ArrowError> + 'a>;

/// A user supplied three-way comparator for one [`ElementKind`].
///
/// The comparator must return `-1`, `0` or `1`.
pub enum ElementComparator<'a> {
    /// Compares [`ElementKind::Integer`] values
    Integer(IntegerComparator<'a>),
    /// Compares [`ElementKind::Float`] values
    Float(FloatComparator<'a>),
    /// Compares [`ElementKind::Boolean`] values
    Boolean(BooleanComparator<'a>),
    /// Compares [`ElementKind::Bytes`] values
    Bytes(BytesComparator<'a>),
    /// Compares [`ElementKind::Nested`] values
    Nested(NestedComparator<'a>),
}

impl std::fmt::Debug for ElementComparator<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ElementComparator({})", self.kind())
    }
}

impl<'a> ElementComparator<'a> {
    /// Creates an [`ElementKind::Integer`] comparator
    pub fn integer(f: impl FnMut(i64, i64) -> Result<i64, ArrowError> + 'a) -> Self {
        Self::Integer(Box::new(f))
    }

    /// Creates an [`ElementKind::Float`] comparator
    pub fn float(f: impl FnMut(f64, f64) -> Result<i64, ArrowError> + 'a) -> Self {
        Self::Float(Box::new(f))
    }

    /// Creates an [`ElementKind::Boolean`] comparator
    pub fn boolean(f: impl FnMut(bool, bool) -> Result<i64, ArrowError> + 'a) -> Self {
        Self::Boolean(Box::new(f))
    }

    /// Creates an [`ElementKind::Bytes`] comparator
    pub fn bytes(f: impl FnMut(&[u8], &[u8]) -> Result<i64, ArrowError> + 'a) -> Self {
        Self::Bytes(Box::new(f))
    }

    /// Creates an [`ElementKind::Nested`] comparator
    pub fn nested(f: impl FnMut(ArrayRef, ArrayRef) -> Result<i64, ArrowError> + 'a) -> Self {
        Self::Nested(Box::new(f))
    }

    /// Returns the kind of element this comparator accepts
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Integer(_) => ElementKind::Integer,
            Self::Float(_) => ElementKind::Float,
            Self::Boolean(_) => ElementKind::Boolean,
            Self::Bytes(_) => ElementKind::Bytes,
            Self::Nested(_) => ElementKind::Nested,
        }
    }
}

/// The result of a sort: either materialized values or the sorted positions
trait SortOutput {
    type Output<'s>;

    fn run<'s, A, F>(
        sorter: &'s mut ArraySorter,
        array: A,
        cmp: F,
    ) -> Result<Self::Output<'s>, ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>;
}

struct Values;

impl SortOutput for Values {
    type Output<'s> = ArrayRef;

    fn run<'s, A, F>(
        sorter: &'s mut ArraySorter,
        array: A,
        cmp: F,
    ) -> Result<ArrayRef, ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
    {
        sorter.try_sort_by(array, cmp)
    }
}

struct Indices;

impl SortOutput for Indices {
    type Output<'s> = &'s [u32];

    fn run<'s, A, F>(
        sorter: &'s mut ArraySorter,
        array: A,
        cmp: F,
    ) -> Result<&'s [u32], ArrowError>
    where
        A: SortAccessor,
        F: FnMut(A::Item, A::Item) -> Result<i64, ArrowError>,
    {
        sorter.try_sort_to_indices(array, cmp)
    }
}

fn integers<'s, O, T>(
    sorter: &'s mut ArraySorter,
    array: &dyn Array,
    cmp: &mut IntegerComparator<'_>,
) -> Result<O::Output<'s>, ArrowError>
where
    O: SortOutput,
    T: ArrowPrimitiveType,
    T::Native: AsPrimitive<i64>,
{
    O::run(sorter, array.as_primitive::<T>(), |l: T::Native, r: T::Native| {
        cmp(l.as_(), r.as_())
    })
}

fn floats<'s, O, T>(
    sorter: &'s mut ArraySorter,
    array: &dyn Array,
    cmp: &mut FloatComparator<'_>,
) -> Result<O::Output<'s>, ArrowError>
where
    O: SortOutput,
    T: ArrowPrimitiveType,
    T::Native: AsPrimitive<f64>,
{
    O::run(sorter, array.as_primitive::<T>(), |l: T::Native, r: T::Native| {
        cmp(l.as_(), r.as_())
    })
}

fn bytes<'s, O, T>(
    sorter: &'s mut ArraySorter,
    array: &dyn Array,
    cmp: &mut BytesComparator<'_>,
) -> Result<O::Output<'s>, ArrowError>
where
    O: SortOutput,
    T: ByteArrayType,
{
    O::run(sorter, array.as_bytes::<T>(), |l: &T::Native, r: &T::Native| {
        cmp(AsRef::<[u8]>::as_ref(l), AsRef::<[u8]>::as_ref(r))
    })
}

fn byte_views<'s, O, T>(
    sorter: &'s mut ArraySorter,
    array: &dyn Array,
    cmp: &mut BytesComparator<'_>,
) -> Result<O::Output<'s>, ArrowError>
where
    O: SortOutput,
    T: ByteViewType,
{
    O::run(sorter, array.as_byte_view::<T>(), |l: &T::Native, r: &T::Native| {
        cmp(AsRef::<[u8]>::as_ref(l), AsRef::<[u8]>::as_ref(r))
    })
}

/// Downcasts `array` and sorts it with `cmp`, which must match its kind.
///
/// `array` must have the data type `sorter` was created for.
fn dispatch<'s, O: SortOutput>(
    sorter: &'s mut ArraySorter,
    array: &dyn Array,
    cmp: &mut ElementComparator<'_>,
) -> Result<O::Output<'s>, ArrowError> {
    use ElementComparator::*;

    match (array.data_type(), cmp) {
        (DataType::Int8, Integer(c)) => integers::<O, Int8Type>(sorter, array, c),
        (DataType::Int16, Integer(c)) => integers::<O, Int16Type>(sorter, array, c),
        (DataType::Int32, Integer(c)) => integers::<O, Int32Type>(sorter, array, c),
        (DataType::Int64, Integer(c)) => integers::<O, Int64Type>(sorter, array, c),
        (DataType::UInt8, Integer(c)) => integers::<O, UInt8Type>(sorter, array, c),
        (DataType::UInt16, Integer(c)) => integers::<O, UInt16Type>(sorter, array, c),
        (DataType::UInt32, Integer(c)) => integers::<O, UInt32Type>(sorter, array, c),
        (DataType::Date32, Integer(c)) => integers::<O, Date32Type>(sorter, array, c),
        (DataType::Date64, Integer(c)) => integers::<O, Date64Type>(sorter, array, c),
        (DataType::Time32(TimeUnit::Second), Integer(c)) => {
            integers::<O, Time32SecondType>(sorter, array, c)
        }
        (DataType::Time32(TimeUnit::Millisecond), Integer(c)) => {
            integers::<O, Time32MillisecondType>(sorter, array, c)
        }
        (DataType::Time64(TimeUnit::Microsecond), Integer(c)) => {
            integers::<O, Time64MicrosecondType>(sorter, array, c)
        }
        (DataType::Time64(TimeUnit::Nanosecond), Integer(c)) => {
            integers::<O, Time64NanosecondType>(sorter, array, c)
        }
        (DataType::Timestamp(TimeUnit::Second, _), Integer(c)) => {
            integers::<O, TimestampSecondType>(sorter, array, c)
        }
        (DataType::Timestamp(TimeUnit::Millisecond, _), Integer(c)) => {
            integers::<O, TimestampMillisecondType>(sorter, array, c)
        }
        (DataType::Timestamp(TimeUnit::Microsecond, _), Integer(c)) => {
            integers::<O, TimestampMicrosecondType>(sorter, array, c)
        }
        (DataType::Timestamp(TimeUnit::Nanosecond, _), Integer(c)) => {
            integers::<O, TimestampNanosecondType>(sorter, array, c)
        }
        (DataType::Duration(TimeUnit::Second), Integer(c)) => {
            integers::<O, DurationSecondType>(sorter, array, c)
        }
        (DataType::Duration(TimeUnit::Millisecond), Integer(c)) => {
            integers::<O, DurationMillisecondType>(sorter, array, c)
        }
        (DataType::Duration(TimeUnit::Microsecond), Integer(c)) => {
            integers::<O, DurationMicrosecondType>(sorter, array, c)
        }
        (DataType::Duration(TimeUnit::Nanosecond), Integer(c)) => {
            integers::<O, DurationNanosecondType>(sorter, array, c)
        }
        (DataType::Float32, Float(c)) => floats::<O, Float32Type>(sorter, array, c),
        (DataType::Float64, Float(c)) => floats::<O, Float64Type>(sorter, array, c),
        (DataType::Boolean, Boolean(c)) => O::run(sorter, array.as_boolean(), |l, r| c(l, r)),
        (DataType::Utf8, Bytes(c)) => bytes::<O, Utf8Type>(sorter, array, c),
        (DataType::LargeUtf8, Bytes(c)) => bytes::<O, LargeUtf8Type>(sorter, array, c),
        (DataType::Binary, Bytes(c)) => bytes::<O, BinaryType>(sorter, array, c),
        (DataType::LargeBinary, Bytes(c)) => bytes::<O, LargeBinaryType>(sorter, array, c),
        (DataType::Utf8View, Bytes(c)) => byte_views::<O, StringViewType>(sorter, array, c),
        (DataType::BinaryView, Bytes(c)) => byte_views::<O, BinaryViewType>(sorter, array, c),
        (DataType::FixedSizeBinary(_), Bytes(c)) => {
            O::run(sorter, array.as_fixed_size_binary(), |l: &[u8], r: &[u8]| c(l, r))
        }
        (DataType::List(_), Nested(c)) => O::run(sorter, array.as_list::<i32>(), |l, r| c(l, r)),
        (DataType::LargeList(_), Nested(c)) => {
            O::run(sorter, array.as_list::<i64>(), |l, r| c(l, r))
        }
        (DataType::FixedSizeList(_, _), Nested(c)) => {
            O::run(sorter, array.as_fixed_size_list(), |l, r| c(l, r))
        }
        (DataType::Map(_, _), Nested(c)) => O::run(sorter, array.as_map(), |l, r| {
            c(Arc::new(l) as ArrayRef, Arc::new(r) as ArrayRef)
        }),
        (DataType::Struct(_), Nested(c)) => O::run(sorter, array.as_struct(), |l, r| {
            c(Arc::new(l) as ArrayRef, Arc::new(r) as ArrayRef)
        }),
        (t, c) => {
            let kind = ElementKind::try_from_data_type(t)?;
            Err(ArrowError::InvalidArgumentError(format!(
                "Cannot sort {kind} array of type {t} with a {} comparator",
                c.kind()
            )))
        }
    }
}

/// A reusable `array_sort(array, comparator)` function for one element type.
///
/// Holds the scratch space of an [`ArraySorter`] created for the element type,
/// so that sorting many arrays, such as the rows of a list array, does not
/// allocate per array.
///
/// ```
/// # use arrow_array::{Int64Array, cast::AsArray, types::Int64Type};
/// # use arrow_array_sort::{ArraySortFunction, ElementComparator};
/// # use arrow_schema::DataType;
/// let mut function = ArraySortFunction::try_new(DataType::Int64).unwrap();
/// let mut cmp = ElementComparator::integer(|a, b| Ok((a - b).signum()));
///
/// let array = Int64Array::from(vec![Some(3), None, Some(1)]);
/// let sorted = function.sort(&array, &mut cmp).unwrap();
/// assert_eq!(sorted.as_primitive::<Int64Type>(), &Int64Array::from(vec![Some(1), Some(3), None]));
/// ```
#[derive(Debug)]
pub struct ArraySortFunction {
    kind: ElementKind,
    sorter: ArraySorter,
}

impl ArraySortFunction {
    /// Creates a function sorting arrays of `element_type`
    pub fn try_new(element_type: DataType) -> Result<Self, ArrowError> {
        Self::with_options(element_type, ArraySortOptions::default())
    }

    /// Creates a function sorting arrays of `element_type` with the provided options
    pub fn with_options(
        element_type: DataType,
        options: ArraySortOptions,
    ) -> Result<Self, ArrowError> {
        let kind = ElementKind::try_from_data_type(&element_type)?;
        let sorter = ArraySorter::try_new_with_options(element_type, options)?;
        Ok(Self { kind, sorter })
    }

    /// Returns the kind of element this function sorts
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Returns the element type this function sorts
    pub fn element_type(&self) -> &DataType {
        self.sorter.data_type()
    }

    fn check(&self, array: &dyn Array, cmp: &ElementComparator<'_>) -> Result<(), ArrowError> {
        if array.data_type() != self.element_type() {
            return Err(ArrowError::InvalidArgumentError(format!(
                "array_sort for {} cannot sort array of type {}",
                self.element_type(),
                array.data_type()
            )));
        }
        if cmp.kind() != self.kind {
            return Err(ArrowError::InvalidArgumentError(format!(
                "array_sort for {} elements cannot use a {} comparator",
                self.kind,
                cmp.kind()
            )));
        }
        Ok(())
    }

    /// Sorts `array` with `cmp`, returning a new array with nulls last
    pub fn sort(
        &mut self,
        array: &dyn Array,
        cmp: &mut ElementComparator<'_>,
    ) -> Result<ArrayRef, ArrowError> {
        self.check(array, cmp)?;
        dispatch::<Values>(&mut self.sorter, array, cmp)
    }

    /// Sorts `array` with `cmp`, returning the positions of its elements in
    /// sorted order, nulls last
    pub fn sort_to_indices(
        &mut self,
        array: &dyn Array,
        cmp: &mut ElementComparator<'_>,
    ) -> Result<UInt32Array, ArrowError> {
        self.check(array, cmp)?;
        let indices = dispatch::<Indices>(&mut self.sorter, array, cmp)?;
        Ok(UInt32Array::from(indices.to_vec()))
    }

    /// Sorts the elements of every row of `list` independently.
    ///
    /// Null rows, and the list's own validity, are left as they are. The
    /// function must have been created for the list's element type.
    pub fn sort_list<O: OffsetSizeTrait>(
        &mut self,
        list: &GenericListArray<O>,
        cmp: &mut ElementComparator<'_>,
    ) -> Result<GenericListArray<O>, ArrowError> {
        let values = list.values();
        self.check(values.as_ref(), cmp)?;

        let offsets = list.value_offsets();
        let base = offsets.first().copied().unwrap_or_default();
        let last = offsets.last().copied().unwrap_or_default();

        let mut indices = Vec::with_capacity((last - base).as_usize());
        for (row, window) in offsets.windows(2).enumerate() {
            let (start, end) = (window[0].as_usize(), window[1].as_usize());
            match list.is_valid(row) {
                true => {
                    let row_values = values.slice(start, end - start);
                    let positions =
                        dispatch::<Indices>(&mut self.sorter, row_values.as_ref(), cmp)?;
                    indices.extend(positions.iter().map(|&p| (start + p as usize) as u64));
                }
                false => indices.extend((start..end).map(|i| i as u64)),
            }
        }

        let sorted_values = take(values.as_ref(), &UInt64Array::from(indices), None)?;
        let offsets: Vec<O> = offsets.iter().map(|&o| o - base).collect();
        let field = match list.data_type() {
            DataType::List(f) | DataType::LargeList(f) => f.clone(),
            t => {
                return Err(ArrowError::InvalidArgumentError(format!(
                    "Expected list array, got {t}"
                )))
            }
        };

        GenericListArray::try_new(
            field,
            OffsetBuffer::new(ScalarBuffer::from(offsets)),
            sorted_values,
            list.nulls().cloned(),
        )
    }
}

/// Sorts `array` with `cmp` in a single call, see [`ArraySortFunction`] to
/// reuse scratch space across calls
pub fn array_sort(
    array: &dyn Array,
    cmp: &mut ElementComparator<'_>,
) -> Result<ArrayRef, ArrowError> {
    let options = ArraySortOptions::default()
        .with_initial_positions(array.len())
        .with_region_capacity(array.len().max(1));
    ArraySortFunction::with_options(array.data_type().clone(), options)?.sort(array, cmp)
}
