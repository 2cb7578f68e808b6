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

//! A fallible unstable sort.
//!
//! [`slice::sort_unstable_by`] can neither stop on the first comparator error
//! nor guarantee it will not panic when handed a comparator that does not
//! implement a total order. This introsort does both: the first `Err` returned
//! by `compare` aborts the sort, and any comparator, however inconsistent,
//! leaves `v` holding a permutation of its original elements after at most
//! `O(n log n)` comparisons.

use std::cmp::Ordering;

/// Slices of at most this many elements are insertion sorted
const SMALL_SORT_THRESHOLD: usize = 20;

/// Sorts `v` with the three-way comparator `compare`, returning the first
/// error it produces.
///
/// This sort is unstable. If `compare` fails the contents of `v` are some
/// permutation of the original elements.
pub fn try_sort_unstable_by<T, E, F>(v: &mut [T], mut compare: F) -> Result<(), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    if v.len() < 2 {
        return Ok(());
    }

    // Number of imbalanced partitions allowed before switching to heapsort
    let limit = 2 * (usize::BITS - v.len().leading_zeros());
    quicksort(v, limit, &mut compare)
}

fn quicksort<T, E, F>(mut v: &mut [T], mut limit: u32, compare: &mut F) -> Result<(), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    loop {
        if v.len() <= SMALL_SORT_THRESHOLD {
            return insertion_sort(v, compare);
        }

        if limit == 0 {
            return heapsort(v, compare);
        }
        limit -= 1;

        let pivot = choose_pivot(v, compare)?;
        let (lt, gt) = partition(v, pivot, compare)?;

        // Everything in `lt..gt` compares equal to the pivot and is in place.
        // Recurse into the shorter side and keep looping on the longer one.
        let (left, rest) = v.split_at_mut(lt);
        let right = &mut rest[gt - lt..];
        if left.len() < right.len() {
            quicksort(left, limit, compare)?;
            v = right;
        } else {
            quicksort(right, limit, compare)?;
            v = left;
        }
    }
}

/// Returns the position of the median of three evenly spaced elements
fn choose_pivot<T, E, F>(v: &[T], compare: &mut F) -> Result<usize, E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let len = v.len();
    let (a, b, c) = (len / 4, len / 2, len / 4 * 3);

    let x = compare(&v[a], &v[b])? == Ordering::Less;
    let y = compare(&v[a], &v[c])? == Ordering::Less;
    if x == y {
        // `a` is either the minimum or the maximum
        let z = compare(&v[b], &v[c])? == Ordering::Less;
        Ok(if z ^ x { c } else { b })
    } else {
        Ok(a)
    }
}

/// Three-way partitions `v` around the element at `pivot`.
///
/// Returns `(lt, gt)` such that `v[..lt]` compared less than the pivot,
/// `v[lt..gt]` compared equal and `v[gt..]` compared greater. The pivot itself
/// is never compared and always ends up in `lt..gt`, so `lt < gt`.
fn partition<T, E, F>(v: &mut [T], pivot: usize, compare: &mut F) -> Result<(usize, usize), E>
where
    T: Copy,
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    v.swap(0, pivot);
    let pivot = v[0];

    let mut lt = 0;
    let mut i = 1;
    let mut gt = v.len();
    while i < gt {
        match compare(&v[i], &pivot)? {
            Ordering::Less => {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Equal => i += 1,
            Ordering::Greater => {
                gt -= 1;
                v.swap(i, gt);
            }
        }
    }
    Ok((lt, gt))
}

fn insertion_sort<T, E, F>(v: &mut [T], compare: &mut F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && compare(&v[j], &v[j - 1])? == Ordering::Less {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
    Ok(())
}

fn heapsort<T, E, F>(v: &mut [T], compare: &mut F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    for i in (0..v.len() / 2).rev() {
        sift_down(v, i, compare)?;
    }

    for i in (1..v.len()).rev() {
        v.swap(0, i);
        sift_down(&mut v[..i], 0, compare)?;
    }
    Ok(())
}

/// Restores the max-heap property `parent >= child` below `node`
fn sift_down<T, E, F>(v: &mut [T], mut node: usize, compare: &mut F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    loop {
        let mut child = 2 * node + 1;
        if child >= v.len() {
            return Ok(());
        }

        if child + 1 < v.len() && compare(&v[child], &v[child + 1])? == Ordering::Less {
            child += 1;
        }

        if compare(&v[node], &v[child])? != Ordering::Less {
            return Ok(());
        }

        v.swap(node, child);
        node = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ok_cmp(a: &u32, b: &u32) -> Result<Ordering, ()> {
        Ok(a.cmp(b))
    }

    fn sorted_copy(v: &[u32]) -> Vec<u32> {
        let mut expected = v.to_vec();
        expected.sort_unstable();
        expected
    }

    #[test]
    fn test_small_and_empty() {
        let mut empty: [u32; 0] = [];
        try_sort_unstable_by(&mut empty, |_, _| -> Result<Ordering, ()> {
            panic!("comparator invoked on empty input")
        })
        .unwrap();

        let mut one = [7];
        try_sort_unstable_by(&mut one, |_, _| -> Result<Ordering, ()> {
            panic!("comparator invoked on single element")
        })
        .unwrap();

        let mut v = [3, 1, 2];
        try_sort_unstable_by(&mut v, ok_cmp).unwrap();
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn test_random_matches_std() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [0, 1, 2, 19, 20, 21, 64, 100, 1000, 5000] {
            for modulus in [2, 10, 1_000_000] {
                let mut v: Vec<u32> = (0..len).map(|_| rng.random_range(0..modulus)).collect();
                let expected = sorted_copy(&v);
                try_sort_unstable_by(&mut v, ok_cmp).unwrap();
                assert_eq!(v, expected, "len {len} modulus {modulus}");
            }
        }
    }

    #[test]
    fn test_patterns() {
        let len = 2000;
        let ascending: Vec<u32> = (0..len).collect();
        let descending: Vec<u32> = (0..len).rev().collect();
        let sawtooth: Vec<u32> = (0..len).map(|i| i % 37).collect();
        let organ_pipe: Vec<u32> = (0..len).map(|i| i.min(len - i)).collect();
        let equal = vec![5; len as usize];

        for mut v in [ascending, descending, sawtooth, organ_pipe, equal] {
            let expected = sorted_copy(&v);
            try_sort_unstable_by(&mut v, ok_cmp).unwrap();
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn test_heapsort_fallback() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut v: Vec<u32> = (0..500).map(|_| rng.random()).collect();
        let expected = sorted_copy(&v);
        heapsort(&mut v, &mut ok_cmp).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn test_inconsistent_comparator_terminates() {
        let mut rng = StdRng::seed_from_u64(1234);
        for len in [2, 21, 100, 3000] {
            let mut v: Vec<u32> = (0..len).collect();
            let mut calls = 0usize;
            try_sort_unstable_by(&mut v, |_, _| {
                calls += 1;
                Ok::<_, ()>(match rng.random_range(0..3) {
                    0 => Ordering::Less,
                    1 => Ordering::Equal,
                    _ => Ordering::Greater,
                })
            })
            .unwrap();

            // still a permutation of the input
            assert_eq!(sorted_copy(&v), (0..len).collect::<Vec<_>>());
            // bounded by the heapsort fallback
            let n = len as usize;
            assert!(calls <= 8 * n * (n.ilog2() as usize + 1) + 64, "{calls} calls for {n}");
        }
    }

    #[test]
    fn test_error_aborts() {
        let mut v: Vec<u32> = (0..1000).rev().collect();
        let mut calls = 0;
        let err = try_sort_unstable_by(&mut v, |a, b| {
            calls += 1;
            match calls {
                50 => Err("stop"),
                _ => Ok(a.cmp(b)),
            }
        })
        .unwrap_err();

        assert_eq!(err, "stop");
        assert_eq!(calls, 50);
        assert_eq!(sorted_copy(&v), (0..1000).collect::<Vec<_>>());
    }
}
