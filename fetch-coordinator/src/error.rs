use core::fmt;

use crate::{ChangeKind, Position};

/// A malformed notification from the observed source.
///
/// These indicate a defect in the source, not a runtime condition to recover from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("{kind:?} notification is missing its old position")]
    MissingOldPosition { kind: ChangeKind },
    #[error("{kind:?} notification is missing its new position")]
    MissingNewPosition { kind: ChangeKind },
    #[error("section {index} changed after object changes in the same cycle")]
    SectionAfterObject { index: usize },
    #[error("section {index} reported a {kind:?} change; only insert and delete are valid")]
    UnsupportedSectionChange { index: usize, kind: ChangeKind },
}

/// Errors surfaced by the fallible `try_*` coordinator operations.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError<E: fmt::Debug> {
    #[error("perform_fetch failed: {0:?}; is the fetch request valid?")]
    Fetch(E),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error("no object at {0}")]
    MissingObject(Position),
}

/// Aborts with `err`.
///
/// Every failure this crate knows about is a programming error in a collaborator, so the
/// non-`try_*` entry points stop here instead of presenting stale or partial data.
#[doc(hidden)]
#[cold]
#[track_caller]
pub fn fatal(err: impl fmt::Display) -> ! {
    cwarn!(error = %err, "fatal coordinator error");
    panic!("fetch coordinator: {err}")
}
