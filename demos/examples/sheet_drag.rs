// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet drag.
//!
//! Present a sheet, drag it between detents, resize it mid-gesture, and print the event stream.
//!
//! Run:
//! - `cargo run -p understory_demos --example sheet_drag`

use understory_detent::{DetentSpec, Measurements, ResolvedDetent};
use understory_sheet::{GesturePhase, Sheet, SheetConfig, SheetEvent, SheetHost};

/// Prints every request the sheet makes.
#[derive(Debug, Default)]
struct PrintHost;

impl SheetHost for PrintHost {
    fn present(&mut self, detents: &[ResolvedDetent], index: usize, animated: bool) {
        println!("host: present at {index} (animated: {animated}) over {detents:?}");
    }

    fn dismiss(&mut self, animated: bool) {
        println!("host: dismiss (animated: {animated})");
    }

    fn resize(&mut self, index: usize, animated: bool) {
        println!("host: resize to {index} (animated: {animated})");
    }

    fn relayout(&mut self, detents: &[ResolvedDetent]) {
        println!("host: relayout {detents:?}");
    }
}

fn flush(sheet: &mut Sheet<PrintHost>) {
    for event in sheet.drain_events() {
        match event {
            SheetEvent::PositionChange(p) => println!(
                "  position index {:+.3} value {:.3} y={} realtime={}",
                p.index, p.value, p.position, p.realtime
            ),
            other => println!("  {other:?}"),
        }
    }
}

fn main() {
    let config = SheetConfig::with_detents(vec![
        DetentSpec::Fraction(0.3),
        DetentSpec::Fraction(0.6),
        DetentSpec::Auto,
    ]);
    let mut sheet = Sheet::new(PrintHost, config);
    sheet.set_measurements(
        Measurements::new(800.0)
            .with_content_height(400.0)
            .with_header_height(40.0),
    );

    sheet.present(0, true, |r| println!("present(0) -> {r:?}"));
    sheet.did_present(0);
    flush(&mut sheet);

    println!("drag 560 -> 320");
    sheet.drag_sample(560.0, GesturePhase::Began);
    for y in [540.0, 539.9, 480.0, 400.0, 330.0] {
        sheet.drag_sample(y, GesturePhase::Changed);
    }
    sheet.drag_sample(322.0, GesturePhase::Ended);
    sheet.did_settle(1, 320.0);
    flush(&mut sheet);

    println!("drag interrupted by a resize");
    sheet.drag_sample(320.0, GesturePhase::Began);
    sheet.drag_sample(300.0, GesturePhase::Changed);
    sheet.resize(2, true, |r| println!("resize(2) -> {r:?}"));
    sheet.did_settle(2, 360.0);
    flush(&mut sheet);

    println!("content grows");
    sheet.set_content_height(Some(500.0));
    flush(&mut sheet);

    sheet.dismiss(true, |r| println!("dismiss -> {r:?}"));
    sheet.did_dismiss();
    sheet.did_teardown();
    flush(&mut sheet);
}
