// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host presentation facility, seen from the sheet.
//!
//! The host renders and animates the sheet surface. The sheet calls into it through
//! [`SheetHost`]; the host answers asynchronously by calling back into
//! [`Sheet`](crate::sheet::Sheet) (`did_present`, `presentation_failed`, `did_dismiss`,
//! `drag_sample`, `did_settle`, `did_teardown`).

use understory_detent::ResolvedDetent;

/// Requests the sheet makes of the host.
///
/// Every request is acknowledged later through a `Sheet` callback. A host that
/// never acknowledges leaves the sheet waiting; see
/// [`Sheet::cancel_pending`](crate::sheet::Sheet::cancel_pending).
pub trait SheetHost {
    /// Show the sheet resting at `index` of `detents`.
    fn present(&mut self, detents: &[ResolvedDetent], index: usize, animated: bool);

    /// Hide the sheet.
    fn dismiss(&mut self, animated: bool);

    /// Move the presented sheet to `index`.
    fn resize(&mut self, index: usize, animated: bool);

    /// Resolved detents changed while the sheet is shown or being presented; re-layout the
    /// surface.
    fn relayout(&mut self, detents: &[ResolvedDetent]) {
        let _ = detents;
    }
}

/// A host that ignores every request.
///
/// Useful for driving a sheet purely from recorded callbacks.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHost;

impl SheetHost for NoHost {
    #[inline]
    fn present(&mut self, _detents: &[ResolvedDetent], _index: usize, _animated: bool) {}

    #[inline]
    fn dismiss(&mut self, _animated: bool) {}

    #[inline]
    fn resize(&mut self, _index: usize, _animated: bool) {}
}

impl<H: SheetHost + ?Sized> SheetHost for &mut H {
    fn present(&mut self, detents: &[ResolvedDetent], index: usize, animated: bool) {
        (**self).present(detents, index, animated);
    }

    fn dismiss(&mut self, animated: bool) {
        (**self).dismiss(animated);
    }

    fn resize(&mut self, index: usize, animated: bool) {
        (**self).resize(index, animated);
    }

    fn relayout(&mut self, detents: &[ResolvedDetent]) {
        (**self).relayout(detents);
    }
}
