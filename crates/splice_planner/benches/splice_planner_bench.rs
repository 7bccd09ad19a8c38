use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use splice_oracle::{
    edge_id::EdgeId, route_request::RequestId, route_response::RouteAlternative,
    table_oracle::TableOracle,
};
use splice_planner::{
    problem::{
        fleet::Fleet, insertion_problem::InsertionProblem, stop::Stop, trip::Trip, truck::TruckIdx,
    },
    search::{
        insertion_search::InsertionSearch,
        route_stitcher::{AlternativeSelection, RouteLeg, RouteStitcher, append_segment},
        search_params::{SearchParams, Threads},
    },
};

fn segment(leg: usize, length: usize) -> Vec<EdgeId> {
    (0..length)
        .map(|i| EdgeId::from(format!("e{}", leg * (length - 1) + i)))
        .collect()
}

fn route_legs(count: usize, length: usize) -> Vec<RouteLeg> {
    (0..count)
        .map(|order| RouteLeg {
            id: RequestId::new(0, order, 0),
            alternatives: vec![
                RouteAlternative::new(segment(order, length), 10.0),
                RouteAlternative::new(segment(order + 1, length), 12.0),
            ],
            chosen: 0,
        })
        .collect()
}

fn stitch_benchmark(c: &mut Criterion) {
    let legs = route_legs(50, 40);

    c.bench_function("append_segment", |b| {
        b.iter(|| {
            let mut edges = Vec::with_capacity(50 * 40);
            for leg in &legs {
                append_segment(&mut edges, black_box(&leg.alternatives[0].edges));
            }
            edges
        })
    });

    for selection in [AlternativeSelection::Chosen, AlternativeSelection::Continuity] {
        let stitcher = RouteStitcher::new(selection);
        c.bench_function(&format!("stitch ({selection:?})"), |b| {
            b.iter(|| stitcher.stitch(TruckIdx::new(0), black_box(&legs)))
        });
    }
}

fn chain_problem(trips: usize) -> (InsertionProblem, TableOracle) {
    let stop = |i: usize| format!("s{i}");
    let mut oracle = TableOracle::new();

    for i in 0..trips {
        oracle
            .add_leg(vec![stop(i), format!("m{i}"), stop(i + 1)], 5.0 + i as f64)
            .add_leg(vec![stop(i), format!("x{i}"), String::from("x")], 3.0)
            .add_leg(vec![String::from("x"), format!("y{i}"), stop(i)], 3.0 + (i % 7) as f64);
    }
    oracle
        .add_leg(vec![String::from("x"), stop(trips)], 4.0)
        .add_leg(vec![stop(trips), String::from("x")], 4.0);

    let fleet = Fleet::new(
        (0..trips)
            .map(|i| Trip::new(Stop::new(stop(i)), Stop::new(stop(i + 1))))
            .collect(),
    );

    (InsertionProblem::new(fleet, Stop::from("x")).unwrap(), oracle)
}

fn search_benchmark(c: &mut Criterion) {
    c.bench_function("insertion search (table oracle, 100 trips)", |b| {
        b.iter_batched(
            || chain_problem(100),
            |(problem, oracle)| {
                InsertionSearch::new(
                    problem,
                    oracle,
                    SearchParams {
                        threads: Threads::Single,
                        ..SearchParams::default()
                    },
                )
                .run()
                .unwrap()
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, stitch_benchmark, search_benchmark);
criterion_main!(benches);
