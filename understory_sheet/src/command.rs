// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending commands and their single-resolution completion callbacks.

use alloc::boxed::Box;

use crate::error::SheetError;
use crate::types::CommandKind;

/// Completion callback of a command.
///
/// Called exactly once with `Ok(())` or the rejection.
pub type Completion = Box<dyn FnOnce(Result<(), SheetError>)>;

/// A command waiting for the host.
///
/// Owned by the sheet until it is resolved or rejected. Both consume it, so a
/// completion can never run twice.
pub struct PendingCommand {
    kind: CommandKind,
    index: Option<usize>,
    animated: bool,
    completion: Completion,
}

impl core::fmt::Debug for PendingCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingCommand")
            .field("kind", &self.kind)
            .field("index", &self.index)
            .field("animated", &self.animated)
            .finish_non_exhaustive()
    }
}

impl PendingCommand {
    /// Wraps `completion` for a command of `kind`.
    pub fn new(
        kind: CommandKind,
        index: Option<usize>,
        animated: bool,
        completion: impl FnOnce(Result<(), SheetError>) + 'static,
    ) -> Self {
        Self {
            kind,
            index,
            animated,
            completion: Box::new(completion),
        }
    }

    /// The command kind.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Target detent index; `None` for dismissals.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether the host was asked to animate.
    pub fn animated(&self) -> bool {
        self.animated
    }

    /// Completes successfully.
    pub fn resolve(self) {
        (self.completion)(Ok(()));
    }

    /// Completes with `error`.
    pub fn reject(self, error: SheetError) {
        (self.completion)(Err(error));
    }
}

/// One slot per [`CommandKind`].
#[derive(Debug, Default)]
pub(crate) struct CommandSlots {
    present: Option<PendingCommand>,
    dismiss: Option<PendingCommand>,
    resize: Option<PendingCommand>,
}

impl CommandSlots {
    fn slot_mut(&mut self, kind: CommandKind) -> &mut Option<PendingCommand> {
        match kind {
            CommandKind::Present => &mut self.present,
            CommandKind::Dismiss => &mut self.dismiss,
            CommandKind::Resize => &mut self.resize,
        }
    }

    pub(crate) fn get(&self, kind: CommandKind) -> Option<&PendingCommand> {
        match kind {
            CommandKind::Present => self.present.as_ref(),
            CommandKind::Dismiss => self.dismiss.as_ref(),
            CommandKind::Resize => self.resize.as_ref(),
        }
    }

    /// Stores `command`, rejecting the one it displaces with [`SheetError::Superseded`].
    pub(crate) fn supersede(&mut self, command: PendingCommand) {
        if let Some(old) = self.slot_mut(command.kind).replace(command) {
            debug!("superseding pending {:?} command", old.kind);
            old.reject(SheetError::Superseded);
        }
    }

    /// Moves the pending command of `from` into the `to` slot.
    pub(crate) fn transfer(&mut self, from: CommandKind, to: CommandKind) -> bool {
        match self.slot_mut(from).take() {
            Some(mut command) => {
                command.kind = to;
                self.supersede(command);
                true
            }
            None => false,
        }
    }

    pub(crate) fn resolve(&mut self, kind: CommandKind) -> bool {
        match self.slot_mut(kind).take() {
            Some(command) => {
                command.resolve();
                true
            }
            None => false,
        }
    }

    pub(crate) fn reject(&mut self, kind: CommandKind, error: SheetError) -> bool {
        match self.slot_mut(kind).take() {
            Some(command) => {
                warn!("rejecting pending {kind:?} command: {error}");
                command.reject(error);
                true
            }
            None => false,
        }
    }

    pub(crate) fn reject_all(&mut self, error: &SheetError) {
        for kind in [
            CommandKind::Present,
            CommandKind::Resize,
            CommandKind::Dismiss,
        ] {
            self.reject(kind, error.clone());
        }
    }
}
