// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation state machine for one sheet.
//!
//! ## Transitions
//!
//! - `Idle --present--> Presenting --did_present--> Presented`
//! - `Presenting --present(other)--> Presenting --did_present(first)--> Settling --did_settle--> Presented`
//! - `Presenting --presentation_failed--> Idle`
//! - `Presented --drag Began--> Dragging --drag Ended--> Settling --did_settle--> Presented`
//! - `Presented --resize--> Settling --did_settle--> Presented`
//! - `Presented --dismiss--> Dismissing --did_dismiss--> Dismissed --did_teardown--> Idle`
//! - any on-screen state `--did_dismiss--> Dismissed` (dismissed by the host itself)
//!
//! A new command of a kind that is already pending rejects the older one with
//! [`SheetError::Superseded`]. Every completion runs exactly once.
//!
//! Host callbacks that do not apply to the current state are dropped and return `false`.
//!
//! ## Minimal example
//!
//! ```
//! use understory_sheet::{NoHost, Sheet, SheetConfig, SheetEvent, SheetState};
//! use understory_detent::{DetentSpec, Measurements};
//!
//! let config = SheetConfig::with_detents(vec![DetentSpec::Fraction(0.3), DetentSpec::Fraction(0.6)]);
//! let mut sheet = Sheet::new(NoHost, config);
//! sheet.set_measurements(Measurements::new(800.0));
//!
//! sheet.present(1, true, |result| assert!(result.is_ok()));
//! assert_eq!(sheet.state(), SheetState::Presenting);
//!
//! assert!(sheet.did_present(1));
//! assert_eq!(sheet.state(), SheetState::Presented);
//! assert!(sheet
//!     .drain_events()
//!     .iter()
//!     .any(|e| matches!(e, SheetEvent::DidPresent(info) if info.position == 320.0)));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;
use understory_detent::{DetentCalculator, DetentSpec, Measurements, ResolvedDetent};

use crate::bridge::{EventBridge, SheetEvent};
use crate::command::{CommandSlots, PendingCommand};
use crate::error::SheetError;
use crate::host::SheetHost;
use crate::types::{
    CommandKind, DetentInfo, GesturePhase, PositionInfo, SheetConfig, SheetOptions, SheetState,
};

/// One sheet: detent geometry, lifecycle state, pending commands, and its event queue.
#[derive(Debug)]
pub struct Sheet<H: SheetHost> {
    host: H,
    calculator: DetentCalculator,
    options: SheetOptions,
    state: SheetState,
    active_index: Option<usize>,
    target_index: Option<usize>,
    commands: CommandSlots,
    bridge: EventBridge,
    container: Size,
}

impl<H: SheetHost> Sheet<H> {
    /// Creates an idle sheet and queues [`SheetEvent::Mount`].
    pub fn new(host: H, config: SheetConfig) -> Self {
        let mut calculator = DetentCalculator::new(config.detents);
        calculator.set_max_height(config.max_height);
        calculator.set_display_scale(config.display_scale);
        let mut bridge = EventBridge::new(calculator.epsilon());
        bridge.emit(SheetEvent::Mount);
        Self {
            host,
            calculator,
            options: config.options,
            state: SheetState::Idle,
            active_index: None,
            target_index: None,
            commands: CommandSlots::default(),
            bridge,
            container: Size::ZERO,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Returns `true` while the sheet is on screen.
    pub fn is_presented(&self) -> bool {
        self.state.is_presented()
    }

    /// The detent the sheet rests at, if presented.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The detent the host was last asked to move to, while a present or settle is in flight.
    pub fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    /// Detent geometry.
    pub fn calculator(&self) -> &DetentCalculator {
        &self.calculator
    }

    /// Resolved detents for the current measurements.
    pub fn resolved(&self) -> &[ResolvedDetent] {
        self.calculator.resolved()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Behavior switches.
    pub fn options(&self) -> SheetOptions {
        self.options
    }

    /// Replaces the behavior switches.
    pub fn set_options(&mut self, options: SheetOptions) {
        self.options = options;
    }

    /// Last container size pushed through [`set_container_size`](Self::set_container_size).
    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Returns `true` if a command of `kind` is waiting for the host.
    pub fn has_pending(&self, kind: CommandKind) -> bool {
        self.commands.get(kind).is_some()
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SheetEvent> {
        self.bridge.drain()
    }

    pub(crate) fn emit(&mut self, event: SheetEvent) {
        self.bridge.emit(event);
    }

    // Rejects every pending command; used when the sheet is unmounted.
    pub(crate) fn interrupt_all(&mut self) {
        self.commands.reject_all(&SheetError::Interrupted);
        self.bridge.interrupt_drag();
    }

    fn set_state(&mut self, to: SheetState, trigger: &'static str) {
        if self.state != to {
            debug!("sheet {:?} -> {:?} on {trigger}", self.state, to);
            self.state = to;
        }
    }

    // The state to fall back to when an in-flight command fails.
    fn stable_state(&self) -> SheetState {
        if self.active_index.is_some() {
            SheetState::Presented
        } else {
            SheetState::Idle
        }
    }

    fn detent_info(&self, index: usize, position: f64) -> DetentInfo {
        DetentInfo {
            index,
            value: self.calculator.detent_value(index),
            position,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SheetError> {
        let count = self.calculator.len();
        if index < count {
            Ok(())
        } else {
            Err(SheetError::InvalidIndex { index, count })
        }
    }

    fn report_resting(&mut self, index: usize, position: f64) {
        if self.options.contains(SheetOptions::POSITION_EVENTS) {
            self.bridge.position_change(PositionInfo {
                index: index as f64,
                value: self.calculator.detent_value(index),
                position,
                realtime: false,
            });
        }
    }

    // ---- Commands ----

    /// Shows the sheet at detent `index`.
    ///
    /// Already presented (or presenting) at `index`: resolves immediately. Presented at
    /// another index: behaves like [`resize`](Self::resize). Presenting at another
    /// index: the older present is superseded and the host is redirected.
    pub fn present(
        &mut self,
        index: usize,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        if let Err(error) = self.check_index(index) {
            warn!("present rejected: {error}");
            completion(Err(error));
            return;
        }
        match self.state {
            SheetState::Idle | SheetState::Dismissed => {
                self.target_index = Some(index);
                self.set_state(SheetState::Presenting, "present");
                self.commands.supersede(PendingCommand::new(
                    CommandKind::Present,
                    Some(index),
                    animated,
                    completion,
                ));
                let info = self.detent_info(index, self.calculator.estimated_position(index));
                self.bridge.emit(SheetEvent::WillPresent(info));
                self.bridge.emit(SheetEvent::WillFocus);
                self.host.present(self.calculator.resolved(), index, animated);
            }
            SheetState::Presenting => {
                if self.target_index == Some(index) {
                    completion(Ok(()));
                    return;
                }
                self.target_index = Some(index);
                self.commands.supersede(PendingCommand::new(
                    CommandKind::Present,
                    Some(index),
                    animated,
                    completion,
                ));
                self.host.resize(index, animated);
            }
            SheetState::Presented if self.active_index == Some(index) => completion(Ok(())),
            SheetState::Presented | SheetState::Dragging | SheetState::Settling => {
                self.start_resize(index, animated, completion);
            }
            SheetState::Dismissing => completion(Err(SheetError::Dismissing)),
        }
    }

    /// Hides the sheet. Resolves immediately when it is not shown.
    ///
    /// Pending presents and resizes are rejected with [`SheetError::Interrupted`].
    pub fn dismiss(
        &mut self,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        match self.state {
            SheetState::Idle | SheetState::Dismissed => completion(Ok(())),
            SheetState::Dismissing => {
                self.commands.supersede(PendingCommand::new(
                    CommandKind::Dismiss,
                    None,
                    animated,
                    completion,
                ));
            }
            SheetState::Presenting
            | SheetState::Presented
            | SheetState::Dragging
            | SheetState::Settling => {
                self.commands.reject(CommandKind::Present, SheetError::Interrupted);
                self.commands.reject(CommandKind::Resize, SheetError::Interrupted);
                self.bridge.interrupt_drag();
                self.target_index = None;
                self.set_state(SheetState::Dismissing, "dismiss");
                self.commands.supersede(PendingCommand::new(
                    CommandKind::Dismiss,
                    None,
                    animated,
                    completion,
                ));
                self.bridge.emit(SheetEvent::WillBlur);
                self.bridge.emit(SheetEvent::WillDismiss);
                self.host.dismiss(animated);
            }
        }
    }

    /// Moves a presented sheet to detent `index`.
    ///
    /// Interrupts an active drag: the gesture gets no `DragEnd`, and the settle emits a
    /// direct `DetentChange`.
    pub fn resize(
        &mut self,
        index: usize,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        if let Err(error) = self.check_index(index) {
            warn!("resize rejected: {error}");
            completion(Err(error));
            return;
        }
        match self.state {
            SheetState::Idle | SheetState::Dismissed | SheetState::Presenting => {
                completion(Err(SheetError::NotPresented));
            }
            SheetState::Dismissing => completion(Err(SheetError::Dismissing)),
            SheetState::Presented if self.active_index == Some(index) => completion(Ok(())),
            SheetState::Presented | SheetState::Dragging | SheetState::Settling => {
                self.start_resize(index, animated, completion);
            }
        }
    }

    fn start_resize(
        &mut self,
        index: usize,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) {
        if self.bridge.interrupt_drag() {
            debug!("resize to {index} interrupts the drag");
        }
        self.target_index = Some(index);
        self.set_state(SheetState::Settling, "resize");
        self.commands.supersede(PendingCommand::new(
            CommandKind::Resize,
            Some(index),
            animated,
            completion,
        ));
        self.host.resize(index, animated);
    }

    /// Rejects the pending command of `kind` with [`SheetError::Cancelled`].
    ///
    /// The machine returns to its last stable state. The host is not told; an embedder
    /// that bounds waits with a timer should also stop the host-side animation.
    /// Returns `false` if nothing of that kind was pending.
    pub fn cancel_pending(&mut self, kind: CommandKind) -> bool {
        if !self.commands.reject(kind, SheetError::Cancelled) {
            return false;
        }
        let in_flight = match kind {
            CommandKind::Present => self.state == SheetState::Presenting,
            CommandKind::Resize => self.state == SheetState::Settling,
            CommandKind::Dismiss => self.state == SheetState::Dismissing,
        };
        if in_flight {
            self.bridge.interrupt_drag();
            self.target_index = None;
            let stable = self.stable_state();
            self.set_state(stable, "cancel");
        }
        true
    }

    // ---- Host callbacks ----

    /// The host finished presenting at `index`.
    ///
    /// If the present was redirected to another detent since, the sheet counts as shown
    /// at `index` and moves to `Settling`; the pending present completes on the
    /// [`did_settle`](Self::did_settle) for the newer detent.
    pub fn did_present(&mut self, index: usize) -> bool {
        if self.state != SheetState::Presenting {
            warn!("did_present({index}) dropped in state {:?}", self.state);
            return false;
        }
        if self.check_index(index).is_err() {
            warn!("did_present({index}) names an unknown detent");
            return false;
        }
        let redirect = self.target_index.filter(|&target| target != index);
        self.active_index = Some(index);
        self.target_index = redirect;
        self.set_state(SheetState::Presented, "did_present");
        let position = self.calculator.estimated_position(index);
        let info = self.detent_info(index, position);
        self.bridge.emit(SheetEvent::DidPresent(info));
        self.bridge.emit(SheetEvent::DidFocus);
        self.report_resting(index, position);
        match redirect {
            // Shown where first asked; the redirect completes on `did_settle`.
            Some(target) => {
                debug!("present redirected from {index} to {target}");
                self.set_state(SheetState::Settling, "redirected present");
                self.commands.transfer(CommandKind::Present, CommandKind::Resize);
            }
            None => {
                self.commands.resolve(CommandKind::Present);
            }
        }
        true
    }

    /// The host failed to present, resize, or dismiss.
    ///
    /// The in-flight command is rejected with [`SheetError::Presentation`] and the machine
    /// returns to its last stable state. Nothing is retried.
    pub fn presentation_failed(&mut self, reason: impl Into<String>) -> bool {
        let kind = match self.state {
            SheetState::Presenting => CommandKind::Present,
            SheetState::Settling => CommandKind::Resize,
            SheetState::Dismissing => CommandKind::Dismiss,
            state => {
                warn!("presentation_failed dropped in state {state:?}");
                return false;
            }
        };
        let reason = reason.into();
        self.bridge.interrupt_drag();
        self.target_index = None;
        let stable = self.stable_state();
        self.set_state(stable, "presentation_failed");
        self.commands.reject(kind, SheetError::Presentation(reason));
        true
    }

    /// The host hid the sheet, on request or on its own.
    pub fn did_dismiss(&mut self) -> bool {
        if self.state.is_hidden() {
            warn!("did_dismiss dropped in state {:?}", self.state);
            return false;
        }
        if self.state != SheetState::Dismissing {
            // Dismissed by the host without a command.
            self.commands.reject(CommandKind::Present, SheetError::Interrupted);
            self.commands.reject(CommandKind::Resize, SheetError::Interrupted);
            if self.state != SheetState::Presenting {
                self.bridge.emit(SheetEvent::WillBlur);
            }
            self.bridge.emit(SheetEvent::WillDismiss);
        }
        let was_presenting = self.state == SheetState::Presenting;
        self.active_index = None;
        self.target_index = None;
        self.bridge.reset();
        self.set_state(SheetState::Dismissed, "did_dismiss");
        if !was_presenting {
            self.bridge.emit(SheetEvent::DidBlur);
        }
        self.bridge.emit(SheetEvent::DidDismiss);
        self.commands.resolve(CommandKind::Dismiss);
        true
    }

    /// The host released the sheet surface; `Dismissed` becomes `Idle`.
    pub fn did_teardown(&mut self) -> bool {
        if self.state != SheetState::Dismissed {
            return false;
        }
        self.set_state(SheetState::Idle, "did_teardown");
        true
    }

    /// A raw drag sample at top-edge `position`.
    ///
    /// Accepted only in `Presented` and `Dragging`, and only with
    /// [`SheetOptions::DRAGGABLE`].
    pub fn drag_sample(&mut self, position: f64, phase: GesturePhase) -> bool {
        if !self.options.contains(SheetOptions::DRAGGABLE) || !position.is_finite() {
            return false;
        }
        let Some(active) = self.active_index else {
            return false;
        };
        match (self.state, phase) {
            (SheetState::Presented, GesturePhase::Began | GesturePhase::Changed) => {
                self.set_state(SheetState::Dragging, "drag");
                self.bridge.drag_begin(self.drag_info(active, position));
                self.report_drag_position(position);
                true
            }
            (SheetState::Dragging, GesturePhase::Began | GesturePhase::Changed) => {
                self.bridge.drag_change(self.drag_info(active, position));
                self.report_drag_position(position);
                true
            }
            (SheetState::Dragging, GesturePhase::Ended) => {
                self.report_drag_position(position);
                self.set_state(SheetState::Settling, "drag end");
                true
            }
            (state, _) => {
                debug!("drag sample dropped in state {state:?}");
                false
            }
        }
    }

    // Drag events keep the index the gesture started from and carry the live size.
    fn drag_info(&self, index: usize, position: f64) -> DetentInfo {
        DetentInfo {
            index,
            value: self.calculator.interpolated_detent_value(position),
            position,
        }
    }

    fn report_drag_position(&mut self, position: f64) {
        if self.options.contains(SheetOptions::POSITION_EVENTS) {
            self.bridge.position_change(PositionInfo {
                index: self.calculator.interpolated_index(position),
                value: self.calculator.interpolated_detent_value(position),
                position,
                realtime: true,
            });
        }
    }

    /// The sheet came to rest at detent `index` with its top edge at `position`.
    ///
    /// A non-finite `position` is not recorded; the transition still completes.
    ///
    /// Ends a drag (`DragEnd`), completes a resize, or records a host-initiated move.
    /// `DetentChange` follows when the index changed or a resize was commanded.
    pub fn did_settle(&mut self, index: usize, position: f64) -> bool {
        if !self.state.is_settled_on_screen() {
            warn!("did_settle({index}) dropped in state {:?}", self.state);
            return false;
        }
        if self.check_index(index).is_err() {
            warn!("did_settle({index}) names an unknown detent");
            return false;
        }
        if !self.calculator.store_resolved_position(index, position) {
            warn!("did_settle({index}) without a usable position: {position}");
        }
        let position = self.calculator.estimated_position(index);
        let previous = self.active_index;
        let commanded = self.has_pending(CommandKind::Resize);
        self.active_index = Some(index);
        self.target_index = None;
        self.set_state(SheetState::Presented, "did_settle");

        let info = self.detent_info(index, position);
        self.bridge.drag_end(info);
        if previous != Some(index) || commanded {
            self.bridge.emit(SheetEvent::DetentChange(info));
        }
        self.report_resting(index, position);
        self.commands.resolve(CommandKind::Resize);
        true
    }

    // ---- Measurements and configuration ----

    /// Pushes new measurements. Returns `false` if nothing changed.
    ///
    /// An in-progress drag keeps going and uses the new values on its next sample.
    pub fn set_measurements(&mut self, measurements: Measurements) -> bool {
        if !self.calculator.set_measurements(measurements) {
            return false;
        }
        if let Err(error) = self.calculator.table().validate(&measurements) {
            warn!("detent configuration: {error}");
        }
        self.geometry_changed();
        true
    }

    /// Sets the container size; its height is the screen height.
    ///
    /// Queues [`SheetEvent::ContainerSizeChange`] when the size differs.
    pub fn set_container_size(&mut self, size: Size) -> bool {
        if size == self.container {
            return false;
        }
        self.container = size;
        self.bridge.emit(SheetEvent::ContainerSizeChange(size));
        let measurements = Measurements {
            screen_height: size.height,
            ..*self.calculator.measurements()
        };
        self.set_measurements(measurements);
        true
    }

    /// Sets (or forgets) the measured content height.
    pub fn set_content_height(&mut self, height: Option<f64>) -> bool {
        let measurements = Measurements {
            content_height: height,
            ..*self.calculator.measurements()
        };
        self.set_measurements(measurements)
    }

    /// Sets (or forgets) the measured header height.
    pub fn set_header_height(&mut self, height: Option<f64>) -> bool {
        let measurements = Measurements {
            header_height: height,
            ..*self.calculator.measurements()
        };
        self.set_measurements(measurements)
    }

    /// Replaces the detent configuration.
    ///
    /// Stored positions are dropped. An active index past the new end moves to the last
    /// detent. So does the target of an in-flight present or resize, and the host is
    /// redirected there. With no detents left, in-flight commands are rejected with
    /// [`SheetError::Interrupted`].
    pub fn set_detents(&mut self, detents: Vec<DetentSpec>) {
        self.calculator.set_detents(detents);
        let count = self.calculator.len();
        let last = count.checked_sub(1);
        if let Some(active) = self.active_index
            && active >= count
        {
            self.active_index = last;
        }
        let mut redirect = None;
        if let Some(target) = self.target_index
            && target >= count
        {
            self.target_index = last;
            redirect = last;
            if last.is_none() {
                self.commands.reject(CommandKind::Present, SheetError::Interrupted);
                self.commands.reject(CommandKind::Resize, SheetError::Interrupted);
                self.bridge.interrupt_drag();
                let stable = self.stable_state();
                self.set_state(stable, "detents cleared");
            }
        }
        self.geometry_changed();
        if let Some(index) = redirect {
            let animated = [CommandKind::Present, CommandKind::Resize]
                .into_iter()
                .find_map(|kind| self.commands.get(kind))
                .is_some_and(PendingCommand::animated);
            debug!("in-flight target moved to {index}");
            self.host.resize(index, animated);
        }
    }

    /// Caps the sheet height.
    pub fn set_max_height(&mut self, max_height: Option<f64>) -> bool {
        if !self.calculator.set_max_height(max_height) {
            return false;
        }
        self.geometry_changed();
        true
    }

    /// Updates the display scale, which sets the comparison tolerance.
    pub fn set_display_scale(&mut self, scale: f64) {
        self.calculator.set_display_scale(scale);
        self.bridge.set_epsilon(self.calculator.epsilon());
    }

    fn geometry_changed(&mut self) {
        if self.state.is_hidden() {
            return;
        }
        self.host.relayout(self.calculator.resolved());
        if self.state == SheetState::Presented
            && let Some(index) = self.active_index
        {
            let position = self.calculator.estimated_position(index);
            self.report_resting(index, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoHost;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    type Results = Rc<RefCell<Vec<Result<(), SheetError>>>>;

    fn record(results: &Results) -> impl FnOnce(Result<(), SheetError>) + 'static {
        let results = results.clone();
        move |r| results.borrow_mut().push(r)
    }

    #[derive(Debug, Default)]
    struct Calls(Vec<&'static str>);

    impl SheetHost for Calls {
        fn present(&mut self, _: &[ResolvedDetent], _: usize, _: bool) {
            self.0.push("present");
        }
        fn dismiss(&mut self, _: bool) {
            self.0.push("dismiss");
        }
        fn resize(&mut self, _: usize, _: bool) {
            self.0.push("resize");
        }
        fn relayout(&mut self, _: &[ResolvedDetent]) {
            self.0.push("relayout");
        }
    }

    fn sheet<H: SheetHost>(host: H) -> Sheet<H> {
        let config =
            SheetConfig::with_detents(vec![DetentSpec::Fraction(0.3), DetentSpec::Fraction(0.6)]);
        let mut sheet = Sheet::new(host, config);
        sheet.set_measurements(Measurements::new(800.0));
        sheet
    }

    fn presented<H: SheetHost>(host: H, index: usize) -> Sheet<H> {
        let mut s = sheet(host);
        s.present(index, false, |_| {});
        s.did_present(index);
        s.drain_events();
        s
    }

    #[test]
    fn mount_is_first_event() {
        let mut s = sheet(NoHost);
        assert_eq!(s.drain_events(), [SheetEvent::Mount]);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn dismiss_from_idle_is_immediate_noop() {
        let results = Results::default();
        let mut s = sheet(Calls::default());
        s.dismiss(true, record(&results));
        assert_eq!(*results.borrow(), [Ok(())]);
        assert!(s.host().0.is_empty());
        assert_eq!(s.state(), SheetState::Idle);
    }

    #[test]
    fn invalid_index_is_rejected() {
        let results = Results::default();
        let mut s = sheet(NoHost);
        s.present(2, true, record(&results));
        assert_eq!(
            *results.borrow(),
            [Err(SheetError::InvalidIndex { index: 2, count: 2 })]
        );
        assert_eq!(s.state(), SheetState::Idle);
    }

    #[test]
    fn present_failure_returns_to_idle() {
        let results = Results::default();
        let mut s = sheet(NoHost);
        s.present(0, true, record(&results));
        assert!(s.presentation_failed("no window"));
        assert_eq!(s.state(), SheetState::Idle);
        assert_eq!(
            *results.borrow(),
            [Err(SheetError::Presentation("no window".into()))]
        );
        assert!(!s.did_present(0), "late ack after failure is dropped");
    }

    #[test]
    fn present_same_index_is_idempotent() {
        let results = Results::default();
        let mut s = presented(Calls::default(), 1);
        s.present(1, true, record(&results));
        assert_eq!(*results.borrow(), [Ok(())]);
        assert_eq!(s.host().0, ["present"]);
    }

    #[test]
    fn present_other_index_resizes() {
        let results = Results::default();
        let mut s = presented(Calls::default(), 0);
        s.present(1, true, record(&results));
        assert_eq!(s.state(), SheetState::Settling);
        assert_eq!(s.host().0, ["present", "resize"]);
        assert!(s.did_settle(1, 320.0));
        assert_eq!(*results.borrow(), [Ok(())]);
        assert_eq!(s.active_index(), Some(1));
        assert!(
            s.drain_events()
                .iter()
                .any(|e| matches!(e, SheetEvent::DetentChange(info) if info.index == 1))
        );
    }

    #[test]
    fn resize_requires_presented() {
        let results = Results::default();
        let mut s = sheet(NoHost);
        s.resize(1, true, record(&results));
        assert_eq!(*results.borrow(), [Err(SheetError::NotPresented)]);
    }

    #[test]
    fn resize_failure_returns_to_presented() {
        let results = Results::default();
        let mut s = presented(NoHost, 0);
        s.resize(1, true, record(&results));
        assert!(s.presentation_failed("interrupted"));
        assert_eq!(s.state(), SheetState::Presented);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn dismiss_interrupts_pending_present() {
        let presents = Results::default();
        let dismisses = Results::default();
        let mut s = sheet(NoHost);
        s.present(0, true, record(&presents));
        s.dismiss(true, record(&dismisses));
        assert_eq!(*presents.borrow(), [Err(SheetError::Interrupted)]);
        assert!(dismisses.borrow().is_empty());
        assert!(s.did_dismiss());
        assert_eq!(*dismisses.borrow(), [Ok(())]);
        assert_eq!(s.state(), SheetState::Dismissed);
        assert!(s.did_teardown());
        assert_eq!(s.state(), SheetState::Idle);
    }

    #[test]
    fn present_while_dismissing_is_rejected() {
        let results = Results::default();
        let mut s = presented(NoHost, 0);
        s.dismiss(true, |_| {});
        s.present(1, true, record(&results));
        assert_eq!(*results.borrow(), [Err(SheetError::Dismissing)]);
    }

    #[test]
    fn second_dismiss_supersedes_first() {
        let first = Results::default();
        let second = Results::default();
        let mut s = presented(Calls::default(), 0);
        s.dismiss(true, record(&first));
        s.dismiss(false, record(&second));
        assert_eq!(*first.borrow(), [Err(SheetError::Superseded)]);
        s.did_dismiss();
        assert_eq!(*second.borrow(), [Ok(())]);
        assert_eq!(s.host().0, ["present", "dismiss"]);
    }

    #[test]
    fn external_dismiss_emits_dismiss_events() {
        let mut s = presented(NoHost, 1);
        assert!(s.did_dismiss());
        assert_eq!(
            s.drain_events(),
            [
                SheetEvent::WillBlur,
                SheetEvent::WillDismiss,
                SheetEvent::DidBlur,
                SheetEvent::DidDismiss
            ]
        );
        assert!(!s.did_dismiss(), "duplicate callback is dropped");
    }

    #[test]
    fn drag_samples_ignored_unless_presented() {
        let mut s = sheet(NoHost);
        assert!(!s.drag_sample(500.0, GesturePhase::Began));
        s.present(0, true, |_| {});
        assert!(!s.drag_sample(500.0, GesturePhase::Began));
        s.did_present(0);
        s.dismiss(true, |_| {});
        assert!(!s.drag_sample(500.0, GesturePhase::Changed));
    }

    #[test]
    fn drag_respects_draggable_option() {
        let mut s = presented(NoHost, 0);
        s.set_options(SheetOptions::POSITION_EVENTS);
        assert!(!s.drag_sample(500.0, GesturePhase::Began));
        assert_eq!(s.state(), SheetState::Presented);
    }

    #[test]
    fn resize_during_drag_skips_drag_end() {
        let mut s = presented(NoHost, 0);
        s.set_options(SheetOptions::DRAGGABLE);
        s.drag_sample(560.0, GesturePhase::Began);
        s.drag_sample(500.0, GesturePhase::Changed);
        s.resize(1, true, |r| assert_eq!(r, Ok(())));
        assert_eq!(s.state(), SheetState::Settling);
        assert!(s.did_settle(1, 320.0));
        let events = s.drain_events();
        assert_eq!(
            events,
            [
                SheetEvent::DragBegin(DetentInfo {
                    index: 0,
                    value: 0.3,
                    position: 560.0
                }),
                SheetEvent::DragChange(DetentInfo {
                    index: 0,
                    value: 0.375,
                    position: 500.0
                }),
                SheetEvent::DetentChange(DetentInfo {
                    index: 1,
                    value: 0.6,
                    position: 320.0
                }),
            ]
        );
    }

    #[test]
    fn settle_stores_observed_position() {
        let mut s = presented(NoHost, 0);
        assert!(s.did_settle(0, 561.0));
        assert_eq!(s.calculator().estimated_position(0), 561.0);
        assert!(
            !s.drain_events()
                .iter()
                .any(|e| matches!(e, SheetEvent::DetentChange(_))),
            "same index without a command is not a detent change"
        );
    }

    #[test]
    fn cancel_pending_restores_stable_state() {
        let results = Results::default();
        let mut s = presented(NoHost, 0);
        s.resize(1, true, record(&results));
        assert!(s.cancel_pending(CommandKind::Resize));
        assert_eq!(*results.borrow(), [Err(SheetError::Cancelled)]);
        assert_eq!(s.state(), SheetState::Presented);
        assert!(!s.cancel_pending(CommandKind::Resize));
    }

    #[test]
    fn measurement_change_relayouts_presented_sheet() {
        let mut s = presented(Calls::default(), 1);
        assert!(s.set_container_size(Size::new(400.0, 1000.0)));
        assert_eq!(s.host().0, ["present", "relayout"]);
        let events = s.drain_events();
        assert_eq!(
            events[0],
            SheetEvent::ContainerSizeChange(Size::new(400.0, 1000.0))
        );
        assert!(matches!(
            events[1],
            SheetEvent::PositionChange(PositionInfo {
                position: 400.0,
                realtime: false,
                ..
            })
        ));
        assert!(!s.set_container_size(Size::new(400.0, 1000.0)));
    }

    #[test]
    fn shrinking_detents_clamps_active_index() {
        let mut s = presented(NoHost, 1);
        s.set_detents(vec![DetentSpec::LARGE]);
        assert_eq!(s.active_index(), Some(0));
    }

    #[test]
    fn redirected_present_acked_at_new_target_resolves() {
        let results = Results::default();
        let mut s = sheet(Calls::default());
        s.present(0, true, |_| {});
        s.present(1, true, record(&results));
        assert!(s.did_present(1));
        assert_eq!(s.state(), SheetState::Presented);
        assert_eq!(s.target_index(), None);
        assert_eq!(*results.borrow(), [Ok(())]);
        assert!(!s.has_pending(CommandKind::Resize));
    }

    #[test]
    fn redirected_present_acked_at_first_target_settles() {
        let results = Results::default();
        let mut s = sheet(NoHost);
        s.present(0, true, |_| {});
        s.present(1, true, record(&results));
        assert!(s.did_present(0));
        assert_eq!(s.state(), SheetState::Settling);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(s.target_index(), Some(1));
        assert!(results.borrow().is_empty());
        assert!(s.has_pending(CommandKind::Resize));

        assert!(s.did_settle(1, 320.0));
        assert_eq!(s.state(), SheetState::Presented);
        assert_eq!(*results.borrow(), [Ok(())]);
    }

    #[test]
    fn non_finite_settle_still_completes_resize() {
        let results = Results::default();
        let mut s = presented(NoHost, 0);
        s.resize(1, true, record(&results));
        assert!(s.did_settle(1, f64::NAN));
        assert_eq!(s.state(), SheetState::Presented);
        assert_eq!(s.active_index(), Some(1));
        assert_eq!(s.calculator().stored_position(1), None);
        assert_eq!(*results.borrow(), [Ok(())]);
        assert!(s.drain_events().iter().any(|e| matches!(
            e,
            SheetEvent::DetentChange(info) if info.index == 1 && info.position == 320.0
        )));
    }

    #[test]
    fn failed_settle_after_drag_ends_the_gesture() {
        let mut s = presented(NoHost, 0);
        s.drag_sample(560.0, GesturePhase::Began);
        s.drag_sample(500.0, GesturePhase::Changed);
        s.drag_sample(480.0, GesturePhase::Ended);
        assert!(s.presentation_failed("settle failed"));
        assert_eq!(s.state(), SheetState::Presented);
        s.drain_events();

        assert!(s.drag_sample(560.0, GesturePhase::Began));
        assert!(s.drag_sample(400.0, GesturePhase::Changed));
        let events = s.drain_events();
        assert!(matches!(events.first(), Some(SheetEvent::DragBegin(_))));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SheetEvent::DragChange(info) if info.position == 400.0))
        );
    }

    #[test]
    fn shrinking_detents_redirects_in_flight_present() {
        let results = Results::default();
        let mut s = sheet(Calls::default());
        s.present(1, true, record(&results));
        s.set_detents(vec![DetentSpec::Fraction(0.5)]);
        assert_eq!(s.target_index(), Some(0));
        assert_eq!(s.host().0, ["present", "relayout", "resize"]);
        assert!(s.did_present(0));
        assert_eq!(*results.borrow(), [Ok(())]);
    }

    #[test]
    fn clearing_detents_interrupts_in_flight_present() {
        let results = Results::default();
        let mut s = sheet(NoHost);
        s.present(1, true, record(&results));
        s.set_detents(Vec::new());
        assert_eq!(*results.borrow(), [Err(SheetError::Interrupted)]);
        assert_eq!(s.state(), SheetState::Idle);
        assert_eq!(s.target_index(), None);
    }
}
