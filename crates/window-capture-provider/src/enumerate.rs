use core::iter::FusedIterator;
use std::vec;

use tracing::{Level, instrument};

use crate::{LabelledResult, WindowSystem};

/// The maximum number of characters read from a window's title, longer titles are truncated.
pub const MAX_TITLE_LENGTH: usize = 256;

/// A snapshot of the visible top-level windows.
///
/// Handles are collected when the snapshot is taken, titles are read as the iterator advances.
pub struct VisibleWindows<'a, W: WindowSystem> {
    window_system: &'a W,
    handles: vec::IntoIter<W::Handle>,
}

impl<W: WindowSystem> VisibleWindows<'_, W> {
    /// The handles that have not been yielded yet.
    pub fn remaining_handles(&self) -> &[W::Handle] {
        self.handles.as_slice()
    }
}

impl<W: WindowSystem> Iterator for VisibleWindows<'_, W> {
    type Item = (W::Handle, String);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        let title = self.window_system.window_title(handle, MAX_TITLE_LENGTH);

        Some((handle, title))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<W: WindowSystem> ExactSizeIterator for VisibleWindows<'_, W> {}
impl<W: WindowSystem> FusedIterator for VisibleWindows<'_, W> {}

/// Takes a snapshot of the top-level windows the window system currently marks as visible.
#[instrument("list_visible_windows", level = Level::DEBUG, skip_all, err)]
pub fn list_visible_windows<W: WindowSystem>(
    window_system: &W,
) -> LabelledResult<VisibleWindows<'_, W>> {
    let mut handles = Vec::new();

    window_system.enumerate_windows(&mut |handle| {
        if window_system.is_window_visible(handle) {
            handles.push(handle);
        }
    })?;

    Ok(VisibleWindows {
        window_system,
        handles: handles.into_iter(),
    })
}
