//! Keydown interception inside the editable surface.

use crate::dom::{BoundaryPoint, Element, Range};
use crate::error::BlockError;

/// Inserted in place of a tab character; four no-break spaces
pub const TAB_RUN: &str = "\u{a0}\u{a0}\u{a0}\u{a0}";

/// Legacy `KeyboardEvent.which` code for Tab
const TAB_WHICH: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    Char(char),
    Other(String),
}

impl Key {
    /// Map a DOM `which` code onto a key
    pub fn from_which(which: u32) -> Self {
        match which {
            TAB_WHICH => Key::Tab,
            8 => Key::Backspace,
            13 => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

/// A keydown as dispatched by the host, with the two flags a handler may set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours; the host handles it as usual
    Ignored,
    /// Tab suppressed but nothing inserted (no active selection)
    Suppressed,
    /// Tab run inserted; the caret now sits right after it
    Inserted { caret: BoundaryPoint },
}

/// Tab never moves focus and never bubbles: it is suppressed and replaced by
/// [`TAB_RUN`] at the selection's end point, with the selection collapsed
/// after the run. Every other key passes through untouched.
pub fn intercept_keydown(
    surface: &mut Element,
    event: &mut KeyEvent,
    selection: Option<&mut Range>,
) -> Result<KeyOutcome, BlockError> {
    if event.key != Key::Tab {
        return Ok(KeyOutcome::Ignored);
    }
    event.prevent_default();
    event.stop_propagation();

    let Some(range) = selection else {
        log::debug!("tab pressed without an active selection");
        return Ok(KeyOutcome::Suppressed);
    };

    let Some(caret) = surface.insert_text(&range.end, TAB_RUN) else {
        log::warn!("tab range end {:?} is outside the surface", range.end);
        return Err(BlockError::InvalidRange {
            point: range.end.clone(),
        });
    };
    range.collapse_to(caret.clone());
    log::debug!("inserted tab run, caret now at {caret:?}");
    Ok(KeyOutcome::Inserted { caret })
}
