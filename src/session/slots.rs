use std::fmt;

use crate::brep::{FaceIndex, VertIndex};

/// Kind of mesh element a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Face,
}

impl ElementKind {
    /// Lower-case name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Face => "face",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four selection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Vertex1,
    Face1,
    Vertex2,
    Face2,
}

impl Slot {
    /// All slots in key order.
    pub const ALL: [Slot; 4] = [Slot::Vertex1, Slot::Face1, Slot::Vertex2, Slot::Face2];

    /// Kind of element the slot accepts.
    #[must_use]
    pub fn kind(self) -> ElementKind {
        match self {
            Self::Vertex1 | Self::Vertex2 => ElementKind::Vertex,
            Self::Face1 | Self::Face2 => ElementKind::Face,
        }
    }

    /// Short label shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Vertex1 => "v1",
            Self::Face1 => "f1",
            Self::Vertex2 => "v2",
            Self::Face2 => "f2",
        }
    }
}

/// The four optional selections of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slots {
    pub vertex1: Option<VertIndex>,
    pub face1: Option<FaceIndex>,
    pub vertex2: Option<VertIndex>,
    pub face2: Option<FaceIndex>,
}

impl Slots {
    /// Stores element `index` in `slot`, replacing any previous value.
    pub fn fill(&mut self, slot: Slot, index: usize) {
        match slot {
            Slot::Vertex1 => self.vertex1 = Some(VertIndex(index)),
            Slot::Face1 => self.face1 = Some(FaceIndex(index)),
            Slot::Vertex2 => self.vertex2 = Some(VertIndex(index)),
            Slot::Face2 => self.face2 = Some(FaceIndex(index)),
        }
    }

    /// Empties `slot`.
    pub fn clear(&mut self, slot: Slot) {
        match slot {
            Slot::Vertex1 => self.vertex1 = None,
            Slot::Face1 => self.face1 = None,
            Slot::Vertex2 => self.vertex2 = None,
            Slot::Face2 => self.face2 = None,
        }
    }

    /// Returns `true` if `slot` holds an element.
    #[must_use]
    pub fn is_filled(&self, slot: Slot) -> bool {
        match slot {
            Slot::Vertex1 => self.vertex1.is_some(),
            Slot::Face1 => self.face1.is_some(),
            Slot::Vertex2 => self.vertex2.is_some(),
            Slot::Face2 => self.face2.is_some(),
        }
    }

    /// Number of filled slots.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        Slot::ALL.iter().filter(|&&s| self.is_filled(s)).count()
    }

    /// Returns `true` once all four slots are filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled_count() == Slot::ALL.len()
    }

    /// Both corners, once every slot is filled.
    #[must_use]
    pub fn corners(&self) -> Option<[(VertIndex, FaceIndex); 2]> {
        Some([
            (self.vertex1?, self.face1?),
            (self.vertex2?, self.face2?),
        ])
    }
}

/// Lifecycle of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Empty,
    Collecting,
    Ready,
    Committed,
    Cancelled,
}

impl SessionState {
    /// `Committed` and `Cancelled` accept no further input.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Cancelled)
    }
}

/// Input to the slot state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fill `slot` with the element at `index`.
    Select { slot: Slot, index: usize },
    /// A corner failed validation; clear the listed slots.
    Reject(&'static [Slot]),
    /// The edit was applied to the host.
    Commit,
    /// The edit failed while being applied.
    Abort,
    /// The user ended the session.
    Cancel,
}

/// Slots of the first corner, for clearing after rejection.
pub const FIRST_CORNER: &[Slot] = &[Slot::Vertex1, Slot::Face1];
/// Slots of the second corner.
pub const SECOND_CORNER: &[Slot] = &[Slot::Vertex2, Slot::Face2];
/// Every slot.
pub const BOTH_CORNERS: &[Slot] = &Slot::ALL;

/// Pure transition function of the selection state machine.
///
/// Terminal states absorb every step. A selection lands in `Ready` as soon as
/// all four slots are filled, otherwise in `Collecting`. A rejection clears
/// slots and returns to `Collecting`. `Commit` is only accepted in `Ready`;
/// `Abort` and `Cancel` end the session and discard the slots.
#[must_use]
pub fn transition(state: SessionState, slots: Slots, step: Step) -> (SessionState, Slots) {
    if state.is_terminal() {
        return (state, slots);
    }
    match step {
        Step::Cancel | Step::Abort => (SessionState::Cancelled, Slots::default()),
        Step::Commit if state == SessionState::Ready => (SessionState::Committed, slots),
        Step::Commit => (state, slots),
        Step::Select { slot, index } => {
            let mut next = slots;
            next.fill(slot, index);
            if next.is_complete() {
                (SessionState::Ready, next)
            } else {
                (SessionState::Collecting, next)
            }
        }
        Step::Reject(cleared) => {
            let mut next = slots;
            for &slot in cleared {
                next.clear(slot);
            }
            (SessionState::Collecting, next)
        }
    }
}
