// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked sheets.
//!
//! Present sheets on top of each other, then dismiss the bottom one and watch the cascade.
//!
//! Run:
//! - `cargo run -p understory_demos --example sheet_stack`

use kurbo::Size;
use understory_detent::ResolvedDetent;
use understory_sheet::{Sheet, SheetConfig, SheetHost, SheetId, SheetRegistry};

/// Logs requests under a name.
#[derive(Debug)]
struct NamedHost(&'static str);

impl SheetHost for NamedHost {
    fn present(&mut self, _detents: &[ResolvedDetent], index: usize, _animated: bool) {
        println!("[{}] present at {index}", self.0);
    }

    fn dismiss(&mut self, _animated: bool) {
        println!("[{}] dismiss", self.0);
    }

    fn resize(&mut self, index: usize, _animated: bool) {
        println!("[{}] resize to {index}", self.0);
    }
}

fn flush(registry: &mut SheetRegistry<NamedHost>, ids: &[(&str, SheetId)]) {
    for &(name, id) in ids {
        let events = registry.drain_events(id);
        if !events.is_empty() {
            println!("  {name}: {events:?}");
        }
    }
}

fn main() {
    let mut registry = SheetRegistry::new();
    let mut add = |name| {
        let mut sheet = Sheet::new(NamedHost(name), SheetConfig::default());
        sheet.set_container_size(Size::new(390.0, 844.0));
        registry.insert(sheet)
    };
    let base = add("base");
    let picker = add("picker");
    let confirm = add("confirm");
    let ids = [("base", base), ("picker", picker), ("confirm", confirm)];

    for id in [base, picker, confirm] {
        registry.present(id, 1, true, |r| println!("present -> {r:?}"));
        registry.did_present(id, 1).expect("tracked sheet");
    }
    println!("stack: {:?}", registry.stack().collect::<Vec<_>>());
    flush(&mut registry, &ids);

    // Dismissing the base dismisses everything above it first.
    registry.dismiss(base, true, |r| println!("dismiss base -> {r:?}"));
    for id in [confirm, picker, base] {
        registry.did_dismiss(id).expect("tracked sheet");
    }
    flush(&mut registry, &ids);

    // Callbacks for a removed sheet are reported, not applied.
    registry.remove(confirm);
    if let Err(e) = registry.did_present(confirm, 0) {
        println!("dropped: {e}");
    }
}
