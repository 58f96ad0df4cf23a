use std::fmt;

use super::slots::Slot;

/// A key or pointer button as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Number row key `0`–`9`.
    Digit(u8),
    /// Letter key, upper case.
    Letter(char),
    Esc,
    LeftMouse,
    RightMouse,
    MiddleMouse,
    WheelUp,
    WheelDown,
    MouseMove,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{d}"),
            Self::Letter(c) => write!(f, "{c}"),
            Self::Esc => f.write_str("Esc"),
            Self::LeftMouse => f.write_str("LMB"),
            Self::RightMouse => f.write_str("RMB"),
            Self::MiddleMouse => f.write_str("MMB"),
            Self::WheelUp => f.write_str("WheelUp"),
            Self::WheelDown => f.write_str("WheelDown"),
            Self::MouseMove => f.write_str("MouseMove"),
        }
    }
}

/// A discrete input event with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    /// The key pressed.
    pub key: Key,
    /// Alt held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
    /// Ctrl held.
    pub ctrl: bool,
}

impl InputEvent {
    /// An event with no modifiers held.
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            alt: false,
            shift: false,
            ctrl: false,
        }
    }

    /// An event with only Alt held.
    #[must_use]
    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }
}

/// A key plus the exact modifier combination that triggers a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// The key pressed.
    pub key: Key,
    /// Alt held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
    /// Ctrl held.
    pub ctrl: bool,
}

impl KeyBinding {
    /// Binds `key` with no modifiers.
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            alt: false,
            shift: false,
            ctrl: false,
        }
    }

    /// Binds Alt+`key`.
    #[must_use]
    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }

    /// Returns `true` if `event` has this key and exactly these modifiers.
    #[must_use]
    pub fn matches(&self, event: &InputEvent) -> bool {
        self.key == event.key
            && self.alt == event.alt
            && self.shift == event.shift
            && self.ctrl == event.ctrl
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// What an input event means to a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(Slot),
    Cancel,
}

/// Key bindings for the four selection slots and cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    /// Stores the selected vertex in `v1`.
    pub vertex1: KeyBinding,
    /// Stores the selected face in `f1`.
    pub face1: KeyBinding,
    /// Stores the selected vertex in `v2`.
    pub vertex2: KeyBinding,
    /// Stores the selected face in `f2`.
    pub face2: KeyBinding,
    /// Ends the session without editing.
    pub cancel: KeyBinding,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            vertex1: KeyBinding::alt(Key::Digit(1)),
            face1: KeyBinding::alt(Key::Digit(2)),
            vertex2: KeyBinding::alt(Key::Digit(3)),
            face2: KeyBinding::alt(Key::Digit(4)),
            cancel: KeyBinding::plain(Key::Esc),
        }
    }
}

impl Keymap {
    /// Binding that fills `slot`.
    #[must_use]
    pub fn binding(&self, slot: Slot) -> KeyBinding {
        match slot {
            Slot::Vertex1 => self.vertex1,
            Slot::Face1 => self.face1,
            Slot::Vertex2 => self.vertex2,
            Slot::Face2 => self.face2,
        }
    }

    /// Maps an event to a session command, or `None` if it is not bound.
    #[must_use]
    pub fn command(&self, event: &InputEvent) -> Option<Command> {
        if self.cancel.matches(event) {
            return Some(Command::Cancel);
        }
        Slot::ALL
            .into_iter()
            .find(|&slot| self.binding(slot).matches(event))
            .map(Command::Select)
    }

    /// One line per slot describing how to fill it, for display in a panel.
    #[must_use]
    pub fn help_lines(&self) -> Vec<String> {
        Slot::ALL
            .into_iter()
            .map(|slot| {
                format!(
                    "{}: select a {} in edit mode and press {}",
                    slot.label(),
                    slot.kind(),
                    self.binding(slot)
                )
            })
            .collect()
    }
}

/// How to pick the element for a slot when the host has several selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Refuse the event unless exactly one element of the kind is selected.
    #[default]
    RequireSingle,
    /// Take the selected element with the lowest index.
    FirstSelected,
}

/// Settings for interactive edge sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Key bindings for the slots and cancel.
    pub keymap: Keymap,
    /// What to do when several elements are selected.
    pub policy: SelectionPolicy,
}
