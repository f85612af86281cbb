//! # Window focus and event posting
use crossterm::event::KeyEvent;

/// Access to the host toolkit's windows.
pub trait FocusService {
    /// A handle to a toolkit window.
    type Window;

    /// The window that currently has keyboard focus, if any.
    fn focus_window(&self) -> Option<Self::Window>;

    /// Queue `event` for delivery to `window`.
    ///
    /// Posting never blocks. Queued events get delivered in the order they were posted, after the
    /// current event has finished being handled.
    fn post_event(&self, window: &Self::Window, event: KeyEvent);
}
