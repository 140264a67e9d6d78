#![forbid(unsafe_code)]

//! Key codes consumed by the suggestion navigation state machine.
//!
//! The engine only inspects a handful of keys (Enter, Escape, the vertical
//! arrows); everything else is reported so the host can tell "ignored while
//! open" apart from "not delivered at all", but carries no payload the
//! engine acts on.

/// A key press forwarded from the bound input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Commit the active suggestion (or close when none is active).
    Enter,
    /// Dismiss the suggestion list.
    Escape,
    /// Move the active suggestion up.
    ArrowUp,
    /// Move the active suggestion down.
    ArrowDown,
    Tab,
    Backspace,
    Delete,
    /// Printable character input.
    Char(char),
    /// Any other key; never inspected by the engine.
    Other,
}

impl Key {
    /// Whether this key participates in suggestion navigation while the
    /// list is open.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::Enter | Self::Escape | Self::ArrowUp | Self::ArrowDown
        )
    }
}
