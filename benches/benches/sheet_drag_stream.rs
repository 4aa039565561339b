// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_detent::{DetentSpec, Measurements};
use understory_sheet::{GesturePhase, NoHost, Sheet, SheetConfig};

fn presented_sheet() -> Sheet<NoHost> {
    let config = SheetConfig::with_detents(vec![
        DetentSpec::Fraction(0.3),
        DetentSpec::Fraction(0.6),
        DetentSpec::LARGE,
    ]);
    let mut sheet = Sheet::new(NoHost, config);
    sheet.set_measurements(Measurements::new(800.0));
    sheet.present(0, false, |_| {});
    sheet.did_present(0);
    sheet.drain_events();
    sheet
}

// Samples from detent 0 to the top, with sub-epsilon jitter every other step.
fn gen_drag(steps: usize) -> Vec<f64> {
    (0..steps)
        .map(|i| {
            let base = 560.0 - 560.0 * i as f64 / steps as f64;
            if i % 2 == 1 { base + 0.2 } else { base }
        })
        .collect()
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_stream");
    for &steps in &[60usize, 240, 1_000] {
        let samples = gen_drag(steps);
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_function(format!("samples_{}", steps), |b| {
            b.iter_batched(
                presented_sheet,
                |mut sheet| {
                    sheet.drag_sample(560.0, GesturePhase::Began);
                    for &p in &samples {
                        sheet.drag_sample(p, GesturePhase::Changed);
                    }
                    sheet.drag_sample(0.0, GesturePhase::Ended);
                    sheet.did_settle(2, 0.0);
                    black_box(sheet.drain_events().len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_supersession(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");
    group.bench_function("resize_supersede_100", |b| {
        b.iter_batched(
            presented_sheet,
            |mut sheet| {
                for i in 0..100 {
                    sheet.resize(i % 3, true, |result| {
                        black_box(result.is_ok());
                    });
                }
                sheet.did_settle(0, 560.0);
                black_box(sheet.state())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_drag, bench_supersession);
criterion_main!(benches);
