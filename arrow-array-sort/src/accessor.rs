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

//! Typed positional access to the arrays that can be sorted

use arrow_array::types::{ByteArrayType, ByteViewType};
use arrow_array::*;

/// Positional read access to the values of an array being sorted.
///
/// Implemented for references to concrete array types so that the value type
/// handed to a comparator is resolved at compile time, and the sort loop is
/// monomorphized per physical representation.
///
/// Nullability is read through [`Array`], values are only read at valid
/// positions.
pub trait SortAccessor: Copy {
    /// The value handed to the comparator
    type Item;

    /// Returns the underlying array
    fn as_array(&self) -> &dyn Array;

    /// Returns the value at `pos`, which must be a valid position
    fn value_at(&self, pos: usize) -> Self::Item;
}

impl<'a, T: ArrowPrimitiveType> SortAccessor for &'a PrimitiveArray<T> {
    type Item = T::Native;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    #[inline]
    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a> SortAccessor for &'a BooleanArray {
    type Item = bool;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    #[inline]
    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a, T: ByteArrayType> SortAccessor for &'a GenericByteArray<T> {
    type Item = &'a T::Native;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    #[inline]
    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a, T: ByteViewType + ?Sized> SortAccessor for &'a GenericByteViewArray<T> {
    type Item = &'a T::Native;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    #[inline]
    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a> SortAccessor for &'a FixedSizeBinaryArray {
    type Item = &'a [u8];

    fn as_array(&self) -> &dyn Array {
        *self
    }

    #[inline]
    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a, O: OffsetSizeTrait> SortAccessor for &'a GenericListArray<O> {
    type Item = ArrayRef;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

impl<'a> SortAccessor for &'a FixedSizeListArray {
    type Item = ArrayRef;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

/// A map entry is handed over as its `key`/`value` struct
impl<'a> SortAccessor for &'a MapArray {
    type Item = StructArray;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    fn value_at(&self, pos: usize) -> Self::Item {
        self.value(pos)
    }
}

/// A struct row is handed over as a single element [`StructArray`]
impl<'a> SortAccessor for &'a StructArray {
    type Item = StructArray;

    fn as_array(&self) -> &dyn Array {
        *self
    }

    fn value_at(&self, pos: usize) -> Self::Item {
        StructArray::slice(self, pos, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::builder::{Int32Builder, ListBuilder};
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int32Type;
    use std::sync::Arc;

    #[test]
    fn test_primitive_and_bytes() {
        let ints = Int32Array::from(vec![Some(4), None, Some(-2)]);
        let accessor = &ints;
        assert_eq!(accessor.value_at(2), -2);
        assert!(accessor.as_array().is_null(1));

        let strings = StringArray::from(vec!["a", "bc"]);
        assert_eq!((&strings).value_at(1), "bc");

        let views = BinaryViewArray::from(vec![&b"long enough to not be inlined"[..]]);
        assert_eq!((&views).value_at(0), b"long enough to not be inlined");
    }

    #[test]
    fn test_nested() {
        let mut builder = ListBuilder::new(Int32Builder::new());
        builder.append_value([Some(1), Some(2)]);
        builder.append_value([Some(3)]);
        let list = builder.finish();

        let value = (&list).value_at(1);
        assert_eq!(value.as_primitive::<Int32Type>().values(), &[3]);

        let a: ArrayRef = Arc::new(Int32Array::from(vec![7, 8, 9]));
        let strukt = StructArray::try_from(vec![("a", a)]).unwrap();
        let row = (&strukt).value_at(1);
        assert_eq!(row.len(), 1);
        assert_eq!(row.column(0).as_primitive::<Int32Type>().value(0), 8);
    }
}
