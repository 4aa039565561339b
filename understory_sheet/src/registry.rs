// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of sheets addressed by id, with stacking and focus.
//!
//! Sheets shown through the registry form a stack in presentation order. The stack
//! drives focus events:
//!
//! - Presenting a sheet over another emits `WillBlur` on the one below, and `DidBlur`
//!   once the new sheet is presented.
//! - Dismissing the top sheet emits `WillFocus` on the one below, and `DidFocus` once the
//!   top sheet is gone.
//! - Dismissing a sheet first dismisses every sheet stacked above it, top-most first.
//!
//! Commands for an unknown [`SheetId`] reject with [`SheetError::Stale`]. Host callbacks
//! for an unknown id are dropped and reported as [`CallbackError::Stale`]; callbacks a
//! live sheet cannot apply are reported as [`CallbackError::NotApplicable`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_sheet::{NoHost, Sheet, SheetConfig, SheetEvent, SheetRegistry};
//!
//! let mut registry = SheetRegistry::new();
//! let base = registry.insert(Sheet::new(NoHost, SheetConfig::default()));
//! let child = registry.insert(Sheet::new(NoHost, SheetConfig::default()));
//!
//! registry.present(base, 0, false, |_| {});
//! registry.did_present(base, 0).unwrap();
//! registry.present(child, 1, false, |_| {});
//! registry.did_present(child, 1).unwrap();
//! assert_eq!(registry.top(), Some(child));
//!
//! let events = registry.drain_events(base);
//! assert!(events.ends_with(&[SheetEvent::WillBlur, SheetEvent::DidBlur]));
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::bridge::SheetEvent;
use crate::command::Completion;
use crate::error::{CallbackError, SheetError, StaleCallbackError};
use crate::host::SheetHost;
use crate::sheet::Sheet;
use crate::types::{GesturePhase, SheetState};

/// Identifier for a sheet in a [`SheetRegistry`] (generational).
///
/// A removed sheet's id never aliases a sheet inserted later. A slot whose generation
/// reaches `u32::MAX` is retired instead of reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SheetId(u32, u32);

impl SheetId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug)]
struct StackEntry {
    id: SheetId,
    // WillBlur emitted, DidBlur pending.
    blurring: bool,
    // WillFocus emitted, DidFocus pending.
    focusing: bool,
}

impl StackEntry {
    fn new(id: SheetId) -> Self {
        Self {
            id,
            blurring: false,
            focusing: false,
        }
    }
}

/// Sheets by id, plus the presentation stack.
#[derive(Debug)]
pub struct SheetRegistry<H: SheetHost> {
    sheets: Vec<Option<Sheet<H>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    stack: Vec<StackEntry>,
}

impl<H: SheetHost> Default for SheetRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: SheetHost> SheetRegistry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Tracks `sheet` and returns its id.
    pub fn insert(&mut self, sheet: Sheet<H>) -> SheetId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.sheets[idx] = Some(sheet);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "SheetId uses 32-bit indices."
            )]
            SheetId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.sheets.push(Some(sheet));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "SheetId uses 32-bit indices."
            )]
            SheetId::new((self.sheets.len() - 1) as u32, generation)
        }
    }

    /// Stops tracking `id` and returns the sheet.
    ///
    /// Pending commands are rejected with [`SheetError::Interrupted`]. The host is not
    /// asked to hide the sheet.
    pub fn remove(&mut self, id: SheetId) -> Option<Sheet<H>> {
        if !self.is_alive(id) {
            return None;
        }
        self.leave_stack(id);
        let mut sheet = self.sheets[id.idx()].take()?;
        if id.1 < u32::MAX {
            self.free_list.push(id.idx());
        } else {
            debug!("slot {} retired", id.idx());
        }
        sheet.interrupt_all();
        debug!("sheet {id:?} removed");
        Some(sheet)
    }

    /// Returns `true` if `id` refers to a tracked sheet.
    pub fn is_alive(&self, id: SheetId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1)
            && self.sheets.get(id.idx()).is_some_and(Option::is_some)
    }

    /// Number of tracked sheets.
    pub fn len(&self) -> usize {
        self.sheets.iter().filter(|sheet| sheet.is_some()).count()
    }

    /// Returns `true` if no sheets are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sheet for `id`.
    pub fn get(&self, id: SheetId) -> Option<&Sheet<H>> {
        if !self.is_alive(id) {
            return None;
        }
        self.sheets[id.idx()].as_ref()
    }

    /// The sheet for `id`, mutably.
    pub fn get_mut(&mut self, id: SheetId) -> Option<&mut Sheet<H>> {
        if !self.is_alive(id) {
            return None;
        }
        self.sheets[id.idx()].as_mut()
    }

    /// Shown sheets, bottom first.
    pub fn stack(&self) -> impl Iterator<Item = SheetId> + '_ {
        self.stack.iter().map(|entry| entry.id)
    }

    /// The top-most shown sheet.
    pub fn top(&self) -> Option<SheetId> {
        self.stack.last().map(|entry| entry.id)
    }

    /// Takes the queued events of `id`. Empty for unknown ids.
    pub fn drain_events(&mut self, id: SheetId) -> Vec<SheetEvent> {
        self.get_mut(id).map(Sheet::drain_events).unwrap_or_default()
    }

    fn position(&self, id: SheetId) -> Option<usize> {
        self.stack.iter().position(|entry| entry.id == id)
    }

    fn state_of(&self, id: SheetId) -> Option<SheetState> {
        self.get(id).map(Sheet::state)
    }

    fn emit(&mut self, id: SheetId, event: SheetEvent) {
        if let Some(sheet) = self.get_mut(id) {
            sheet.emit(event);
        }
    }

    // ---- Stack bookkeeping ----

    fn enter_stack(&mut self, id: SheetId) {
        if self.position(id).is_some() {
            return;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.blurring = true;
            let parent = parent.id;
            self.emit(parent, SheetEvent::WillBlur);
        }
        self.stack.push(StackEntry::new(id));
    }

    fn presented_on_stack(&mut self, id: SheetId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        if pos > 0 && self.stack[pos - 1].blurring {
            self.stack[pos - 1].blurring = false;
            let parent = self.stack[pos - 1].id;
            self.emit(parent, SheetEvent::DidBlur);
        }
    }

    fn dismissing_on_stack(&mut self, id: SheetId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        if pos == 0 {
            return;
        }
        let parent = self.stack[pos - 1];
        let parent_shown = self
            .state_of(parent.id)
            .is_some_and(SheetState::is_settled_on_screen);
        if parent_shown && !parent.focusing {
            self.stack[pos - 1].focusing = true;
            self.emit(parent.id, SheetEvent::WillFocus);
        }
    }

    fn leave_stack(&mut self, id: SheetId) {
        let Some(pos) = self.position(id) else {
            return;
        };
        let was_top = pos + 1 == self.stack.len();
        self.stack.remove(pos);
        if !was_top || pos == 0 {
            return;
        }
        let parent = self.stack[pos - 1];
        let parent_shown = self
            .state_of(parent.id)
            .is_some_and(SheetState::is_settled_on_screen);
        self.stack[pos - 1].focusing = false;
        self.stack[pos - 1].blurring = false;
        if parent_shown {
            if !parent.focusing {
                self.emit(parent.id, SheetEvent::WillFocus);
            }
            self.emit(parent.id, SheetEvent::DidFocus);
        }
    }

    // ---- Commands ----

    /// Shows `id` at detent `index`, stacking it over the current top.
    pub fn present(
        &mut self,
        id: SheetId,
        index: usize,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        let Some(sheet) = self.get_mut(id) else {
            warn!("present for stale sheet {id:?}");
            completion(Err(SheetError::Stale(id)));
            return;
        };
        let was_hidden = sheet.state().is_hidden();
        sheet.present(index, animated, completion);
        if was_hidden && sheet.state() == SheetState::Presenting {
            self.enter_stack(id);
        }
    }

    /// Moves `id` to detent `index`.
    pub fn resize(
        &mut self,
        id: SheetId,
        index: usize,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        match self.get_mut(id) {
            Some(sheet) => sheet.resize(index, animated, completion),
            None => {
                warn!("resize for stale sheet {id:?}");
                completion(Err(SheetError::Stale(id)));
            }
        }
    }

    /// Hides `id`, after dismissing every sheet stacked above it.
    ///
    /// The completion reports the dismissal of `id` itself.
    pub fn dismiss(
        &mut self,
        id: SheetId,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        if !self.is_alive(id) {
            warn!("dismiss for stale sheet {id:?}");
            completion(Err(SheetError::Stale(id)));
            return;
        }
        for child in self.above(id) {
            self.dismiss_one(child, animated, false, |result| {
                if let Err(error) = result {
                    warn!("cascaded dismissal failed: {error}");
                }
            });
        }
        self.dismiss_one(id, animated, true, completion);
    }

    /// Hides every sheet stacked above `id`, top-most first.
    ///
    /// Resolves once all of them are gone, or rejects with the first failure.
    pub fn dismiss_above(
        &mut self,
        id: SheetId,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        if !self.is_alive(id) {
            warn!("dismiss_above for stale sheet {id:?}");
            completion(Err(SheetError::Stale(id)));
            return;
        }
        let targets = self.above(id);
        self.dismiss_many(targets, animated, Box::new(completion));
    }

    /// Hides every shown sheet, top-most first.
    ///
    /// Resolves once all of them are gone, or rejects with the first failure.
    pub fn dismiss_all(
        &mut self,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        let targets: Vec<SheetId> = self.stack.iter().rev().map(|e| e.id).collect();
        self.dismiss_many(targets, animated, Box::new(completion));
    }

    // Stacked ids above `id`, top-most first.
    fn above(&self, id: SheetId) -> Vec<SheetId> {
        match self.position(id) {
            Some(pos) => self.stack[pos + 1..].iter().rev().map(|e| e.id).collect(),
            None => Vec::new(),
        }
    }

    fn dismiss_many(&mut self, targets: Vec<SheetId>, animated: bool, completion: Completion) {
        if targets.is_empty() {
            completion(Ok(()));
            return;
        }
        let count = targets.len();
        let parts = join(count, completion);
        for (n, (id, part)) in targets.into_iter().zip(parts).enumerate() {
            // Only the lowest target hands focus to the sheet below it.
            self.dismiss_one(id, animated, n + 1 == count, part);
        }
    }

    fn dismiss_one(
        &mut self,
        id: SheetId,
        animated: bool,
        refocus: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        let Some(sheet) = self.get_mut(id) else {
            completion(Err(SheetError::Stale(id)));
            return;
        };
        let was_shown = matches!(
            sheet.state(),
            SheetState::Presenting
                | SheetState::Presented
                | SheetState::Dragging
                | SheetState::Settling
        );
        sheet.dismiss(animated, completion);
        if refocus && was_shown && self.state_of(id) == Some(SheetState::Dismissing) {
            self.dismissing_on_stack(id);
        }
    }

    // ---- Host callbacks ----

    fn callback(
        &mut self,
        id: SheetId,
        apply: impl FnOnce(&mut Sheet<H>) -> bool,
    ) -> Result<(), CallbackError> {
        let Some(sheet) = self.get_mut(id) else {
            warn!("callback for stale sheet {id:?} dropped");
            return Err(StaleCallbackError { sheet: id }.into());
        };
        if apply(&mut *sheet) {
            Ok(())
        } else {
            Err(CallbackError::NotApplicable {
                sheet: id,
                state: sheet.state(),
            })
        }
    }

    /// Routes [`Sheet::did_present`].
    pub fn did_present(&mut self, id: SheetId, index: usize) -> Result<(), CallbackError> {
        self.callback(id, |sheet| sheet.did_present(index))?;
        self.presented_on_stack(id);
        Ok(())
    }

    /// Routes [`Sheet::presentation_failed`].
    pub fn presentation_failed(
        &mut self,
        id: SheetId,
        reason: impl Into<String>,
    ) -> Result<(), CallbackError> {
        self.callback(id, |sheet| sheet.presentation_failed(reason))?;
        if self.state_of(id).is_some_and(SheetState::is_hidden) {
            self.leave_stack(id);
        }
        Ok(())
    }

    /// Routes [`Sheet::did_dismiss`].
    pub fn did_dismiss(&mut self, id: SheetId) -> Result<(), CallbackError> {
        self.callback(id, Sheet::did_dismiss)?;
        self.leave_stack(id);
        Ok(())
    }

    /// Routes [`Sheet::did_teardown`].
    pub fn did_teardown(&mut self, id: SheetId) -> Result<(), CallbackError> {
        self.callback(id, Sheet::did_teardown)
    }

    /// Routes [`Sheet::drag_sample`].
    pub fn drag_sample(
        &mut self,
        id: SheetId,
        position: f64,
        phase: GesturePhase,
    ) -> Result<(), CallbackError> {
        self.callback(id, |sheet| sheet.drag_sample(position, phase))
    }

    /// Routes [`Sheet::did_settle`].
    pub fn did_settle(
        &mut self,
        id: SheetId,
        index: usize,
        position: f64,
    ) -> Result<(), CallbackError> {
        self.callback(id, |sheet| sheet.did_settle(index, position))
    }
}

struct Join {
    remaining: usize,
    completion: Option<Completion>,
}

// Splits `completion` into `count` parts. It runs once: with the first failure, or
// with `Ok` after every part succeeded.
fn join(count: usize, completion: Completion) -> Vec<Completion> {
    let shared = Rc::new(RefCell::new(Join {
        remaining: count,
        completion: Some(completion),
    }));
    (0..count)
        .map(|_| {
            let shared = shared.clone();
            let part: Completion = Box::new(move |result: Result<(), SheetError>| {
                let ready = {
                    let mut join = shared.borrow_mut();
                    match result {
                        Err(error) => join.completion.take().map(|c| (c, Err(error))),
                        Ok(()) => {
                            join.remaining = join.remaining.saturating_sub(1);
                            if join.remaining == 0 {
                                join.completion.take().map(|c| (c, Ok(())))
                            } else {
                                None
                            }
                        }
                    }
                };
                if let Some((completion, result)) = ready {
                    completion(result);
                }
            });
            part
        })
        .collect()
}
