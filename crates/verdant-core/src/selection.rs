//! # Selection
//!
//! Tracks the record currently open in a detail view.
//!
//! - At most one record is selected at a time
//! - Opening a second record replaces the first
//! - Volatile: never persisted

/// The record open in a detail view, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    current: Option<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> Selection<T> {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `item`, replacing any current selection.
    pub fn open(&mut self, item: T) {
        self.current = Some(item);
    }

    /// Close the detail view, by its close action or a click outside it,
    /// and hand back what was selected.
    pub fn close(&mut self) -> Option<T> {
        self.current.take()
    }

    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}
