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

use arrow_array::builder::{Int64Builder, ListBuilder};
use arrow_array::{Int64Array, StringArray};
use arrow_array_sort::{array_sort, ArraySortFunction, ArraySorter, ElementComparator};
use arrow_schema::DataType;
use criterion::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_int64_array(size: usize, null_density: f64, rng: &mut StdRng) -> Int64Array {
    (0..size)
        .map(|_| (!rng.random_bool(null_density)).then(|| rng.random_range(-1000..1000)))
        .collect()
}

fn make_string_array(size: usize, rng: &mut StdRng) -> StringArray {
    let values = (0..size).map(|_| {
        let len = rng.random_range(0..32);
        (0..len)
            .map(|_| rng.random_range(b'a'..=b'z') as char)
            .collect::<String>()
    });
    StringArray::from_iter_values(values)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);

    for size in [16, 1024, 65536] {
        let array = make_int64_array(size, 0.1, &mut rng);

        c.bench_function(&format!("array_sort i64 {size}"), |b| {
            b.iter(|| {
                let mut cmp = ElementComparator::integer(|a, b| Ok((a - b).signum()));
                black_box(array_sort(&array, &mut cmp).unwrap());
            })
        });

        let mut sorter = ArraySorter::try_new(DataType::Int64).unwrap();
        c.bench_function(&format!("sorter reuse i64 {size}"), |b| {
            b.iter(|| black_box(sorter.sort_by(&array, |a, b| (b - a).signum()).unwrap()))
        });
    }

    let strings = make_string_array(65536, &mut rng);
    c.bench_function("array_sort string 65536", |b| {
        b.iter(|| {
            let mut cmp = ElementComparator::bytes(|a, b| Ok(a.cmp(b) as i64));
            black_box(array_sort(&strings, &mut cmp).unwrap());
        })
    });

    let mut builder = ListBuilder::new(Int64Builder::new());
    for _ in 0..4096 {
        let len = rng.random_range(0..16);
        builder.append_value((0..len).map(|_| Some(rng.random_range(0..100i64))));
    }
    let list = builder.finish();
    let mut function = ArraySortFunction::try_new(DataType::Int64).unwrap();
    c.bench_function("sort_list i64 4096x16", |b| {
        b.iter(|| {
            let mut cmp = ElementComparator::integer(|a, b| Ok((a - b).signum()));
            black_box(function.sort_list(&list, &mut cmp).unwrap());
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
