#![forbid(unsafe_code)]

//! The keyboard navigation state machine.
//!
//! [`step`] is a pure function from a key event and the current shared
//! state (open flag, active index, item count) to a navigation action plus
//! the disposition reported to the host. The engine applies the action;
//! the host honors the disposition flags.
//!
//! # Invariants
//!
//! 1. While closed, every key passes through untouched.
//! 2. While open, every key is intercepted (propagation stopped); only the
//!    Enter path additionally suppresses the event's default action.
//! 3. ArrowUp floors at the first item and ArrowDown ceils at the last, so
//!    the active index never leaves `{-1} ∪ [0, len-1]` through
//!    navigation.

use typeahead_core::Key;

/// Event disposition reported to the host for a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Stop further propagation of the key event.
    pub stop_propagation: bool,
    /// Suppress the event's default action (Enter path only).
    pub suppress_default: bool,
}

/// State mutation decided by [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavAction {
    /// Commit the item at this index and close.
    Commit(usize),
    /// Close without a selection.
    Close,
    /// Move the active index.
    Activate(usize),
    /// No state change.
    None,
}

pub(crate) fn step(key: Key, open: bool, active_index: isize, len: usize) -> (NavAction, KeyOutcome) {
    if !open {
        return (NavAction::None, KeyOutcome::default());
    }
    let intercepted = KeyOutcome {
        stop_propagation: true,
        suppress_default: false,
    };
    match key {
        Key::Enter => {
            let outcome = KeyOutcome {
                stop_propagation: true,
                suppress_default: true,
            };
            if active_index >= 0 && (active_index as usize) < len {
                (NavAction::Commit(active_index as usize), outcome)
            } else {
                (NavAction::Close, outcome)
            }
        }
        Key::Escape => (NavAction::Close, intercepted),
        Key::ArrowUp if len > 0 => {
            let up = (active_index - 1).max(0) as usize;
            (NavAction::Activate(up), intercepted)
        }
        Key::ArrowDown if len > 0 => {
            let down = (active_index + 1).min(len as isize - 1).max(0) as usize;
            (NavAction::Activate(down), intercepted)
        }
        _ => (NavAction::None, intercepted),
    }
}
