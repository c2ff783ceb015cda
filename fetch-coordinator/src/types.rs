use alloc::string::String;
use core::fmt;

/// A `(section, item)` pair identifying a row or cell.
///
/// Positions are only meaningful within one change cycle: deletions and move sources refer to
/// the layout *before* the cycle, insertions and move destinations to the layout *after* it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub section: usize,
    pub item: usize,
}

impl Position {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.item)
    }
}

/// The kind of change reported by an observed source.
///
/// Section notifications only ever carry `Insert` or `Delete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeKind {
    Insert,
    Delete,
    Move,
    Update,
}

/// Name and item count of one section in the source's current snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionInfo {
    pub name: String,
    pub item_count: usize,
}

impl SectionInfo {
    pub fn new(name: impl Into<String>, item_count: usize) -> Self {
        Self {
            name: name.into(),
            item_count,
        }
    }
}

/// One message on an observed source's notification channel.
///
/// A cycle is an optional `WillChangeContent`, then section changes, then object changes, then
/// exactly one `DidChangeContent`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification<T> {
    WillChangeContent,
    SectionChanged {
        index: usize,
        kind: ChangeKind,
    },
    ObjectChanged {
        object: T,
        old: Option<Position>,
        new: Option<Position>,
        kind: ChangeKind,
    },
    DidChangeContent,
}

impl<T> Notification<T> {
    pub fn section_inserted(index: usize) -> Self {
        Self::SectionChanged {
            index,
            kind: ChangeKind::Insert,
        }
    }

    pub fn section_deleted(index: usize) -> Self {
        Self::SectionChanged {
            index,
            kind: ChangeKind::Delete,
        }
    }

    pub fn inserted(object: T, new: Position) -> Self {
        Self::ObjectChanged {
            object,
            old: None,
            new: Some(new),
            kind: ChangeKind::Insert,
        }
    }

    pub fn deleted(object: T, old: Position) -> Self {
        Self::ObjectChanged {
            object,
            old: Some(old),
            new: None,
            kind: ChangeKind::Delete,
        }
    }

    pub fn moved(object: T, old: Position, new: Position) -> Self {
        Self::ObjectChanged {
            object,
            old: Some(old),
            new: Some(new),
            kind: ChangeKind::Move,
        }
    }

    pub fn updated(object: T, old: Position) -> Self {
        Self::ObjectChanged {
            object,
            old: Some(old),
            new: None,
            kind: ChangeKind::Update,
        }
    }
}
