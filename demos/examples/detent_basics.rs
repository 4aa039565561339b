// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detent basics.
//!
//! Parse detents, resolve them against measurements, and map drag positions to indices.
//!
//! Run:
//! - `cargo run -p understory_demos --example detent_basics`

use understory_detent::{DetentCalculator, DetentSpec, Measurements};

fn main() {
    let specs: Vec<DetentSpec> = ["30%", "medium", "auto"]
        .iter()
        .map(|s| s.parse().expect("valid detent"))
        .collect();
    let mut calc = DetentCalculator::new(specs);

    // Auto resolves to 0 until both content and header are measured.
    calc.set_measurements(Measurements::new(800.0));
    println!("unmeasured: {:?}", calc.resolved());

    calc.set_measurements(
        Measurements::new(800.0)
            .with_content_height(400.0)
            .with_header_height(40.0),
    );
    for (i, d) in calc.resolved().iter().enumerate() {
        println!("detent {i}: fraction {:.3}, top edge at y={}", d.fraction, d.position);
    }
    if let Err(e) = calc.table().validate(calc.measurements()) {
        println!("configuration warning: {e}");
    }

    // Walk from closed to fully open.
    for y in [800.0, 680.0, 560.0, 500.0, 400.0, 320.0, 200.0] {
        let segment = calc.find_segment(y).expect("detents configured");
        println!(
            "y={y:>5}: segment {:>2} progress {:.3} -> index {:+.3}, value {:.3}",
            segment.lower,
            segment.progress,
            calc.interpolated_index(y),
            calc.interpolated_detent_value(y),
        );
    }

    // The host rounds to device pixels; the observed position becomes the anchor.
    calc.store_resolved_position(0, 561.0);
    println!(
        "detent 0 estimated at {} (theoretical {})",
        calc.estimated_position(0),
        calc.theoretical_position(0)
    );
    assert_eq!(calc.interpolated_index(561.0), 0.0);
}
