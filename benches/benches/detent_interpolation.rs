// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_detent::{DetentCalculator, DetentSpec, Measurements, resolve};

fn gen_fraction_detents(n: usize) -> Vec<DetentSpec> {
    (1..=n)
        .map(|i| DetentSpec::Fraction(i as f64 / n as f64))
        .collect()
}

fn gen_positions(screen: f64, steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|i| screen * i as f64 / steps as f64)
        .collect()
}

fn calculator(n: usize, screen: f64) -> DetentCalculator {
    let mut calc = DetentCalculator::new(gen_fraction_detents(n));
    calc.set_measurements(Measurements::new(screen));
    calc
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let m = Measurements::new(800.0)
        .with_content_height(400.0)
        .with_header_height(40.0);
    for &n in &[3usize, 8, 32] {
        let mut specs = gen_fraction_detents(n);
        specs.push(DetentSpec::Auto);
        group.throughput(Throughput::Elements(specs.len() as u64));
        group.bench_function(format!("specs_n{}", specs.len()), |b| {
            b.iter(|| black_box(resolve(black_box(&specs), &m)));
        });
    }
    group.finish();
}

fn bench_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");
    let positions = gen_positions(800.0, 1_000);
    for &n in &[3usize, 8, 32] {
        let calc = calculator(n, 800.0);
        group.throughput(Throughput::Elements(positions.len() as u64));
        group.bench_function(format!("interpolated_index_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for &p in &positions {
                    acc += calc.interpolated_index(p);
                }
                black_box(acc)
            });
        });
        group.bench_function(format!("interpolated_value_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for &p in &positions {
                    acc += calc.interpolated_detent_value(p);
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_stored_anchors(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchors");
    let positions = gen_positions(800.0, 1_000);
    let mut calc = calculator(8, 800.0);
    for i in 0..calc.len() {
        let observed = calc.theoretical_position(i).round();
        calc.store_resolved_position(i, observed);
    }
    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_function("find_segment_stored_n8", |b| {
        b.iter(|| {
            let hits = positions
                .iter()
                .filter_map(|&p| calc.find_segment(p))
                .count();
            black_box(hits)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_segments, bench_stored_anchors);
criterion_main!(benches);
