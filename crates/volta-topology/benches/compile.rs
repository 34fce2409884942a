//! Benchmarks for network compilation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use num_complex::Complex64 as C64;
use volta_core::{Activity, Branch, Bus, Device, NetworkGraph};
use volta_topology::{
    AdjacencyStrategy, CompileConfig, CompileRequest, ParallelConfig, compile,
    compile_time_series,
};

/// A radial feeder of `n` buses with a closed switch every tenth span and a
/// load on every bus. With time steps, every 97th span has an outage profile.
fn feeder(n: u32, time_steps: usize) -> NetworkGraph {
    let mut graph = NetworkGraph::with_time_steps(time_steps);
    for i in 0..n {
        let bus = Bus::new(i);
        graph
            .add_bus(if i == 0 { bus.reference() } else { bus })
            .unwrap();
        graph
            .add_device(Device::load(i, i, C64::new(0.1, 0.02)))
            .unwrap();
    }
    for i in 1..n {
        let branch = if i % 10 == 0 {
            Branch::switch(i, i - 1, i)
        } else {
            Branch::new(i, i - 1, i, C64::new(0.01, 0.05))
        };
        let branch = if time_steps > 0 && i % 97 == 0 {
            // Eight rotating outage patterns.
            let slot = (i as usize / 97) % 8;
            let profile = (0..time_steps).map(|t| t % 8 != slot).collect();
            branch.with_activity(Activity::with_profile(true, profile))
        } else {
            branch
        };
        graph.add_branch(branch).unwrap();
    }
    graph
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for size in [1_000, 10_000, 100_000] {
        let graph = feeder(size, 0);
        for strategy in [AdjacencyStrategy::Direct, AdjacencyStrategy::IncidenceProduct] {
            let request = CompileRequest::snapshot()
                .with_config(CompileConfig::default().with_adjacency_strategy(strategy));
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), size),
                &request,
                |bencher, request| {
                    bencher.iter(|| compile(black_box(&graph), black_box(request)).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_time_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_series");
    let graph = feeder(5_000, 96);
    let config = CompileConfig::default();

    group.bench_function("sequential", |bencher| {
        bencher.iter(|| {
            compile_time_series(black_box(&graph), &config, &ParallelConfig::sequential()).unwrap()
        });
    });
    group.bench_function("parallel", |bencher| {
        bencher.iter(|| {
            compile_time_series(black_box(&graph), &config, &ParallelConfig::default()).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_time_series);
criterion_main!(benches);
