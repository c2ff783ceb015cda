use alloc::rc::Rc;

use crate::{
    ChangeKind, ChangeSet, ContractViolation, ItemChange, Position, Reconfigure,
    ReconfigureFactory,
};

/// Where the classifier is within the current notification cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CyclePhase {
    Idle,
    Sections,
    Objects,
}

/// What happened to one object notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Recorded,
    /// Already covered by a section insertion or deletion in the same cycle.
    Suppressed,
}

/// Turns raw notifications into [`ChangeSet`] entries.
///
/// Relies on sources reporting section changes before object changes within a cycle, so the
/// section sets are final by the time an object change is classified. That ordering is checked:
/// a section change after an object change is a [`ContractViolation`].
pub struct Classifier<T> {
    reconfigure: Option<ReconfigureFactory<T>>,
    phase: CyclePhase,
}

impl<T> Classifier<T> {
    pub fn new(reconfigure: Option<ReconfigureFactory<T>>) -> Self {
        Self {
            reconfigure,
            phase: CyclePhase::Idle,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn in_cycle(&self) -> bool {
        self.phase != CyclePhase::Idle
    }

    pub fn begin_cycle(&mut self) {
        if self.phase == CyclePhase::Idle {
            self.phase = CyclePhase::Sections;
        }
    }

    pub fn end_cycle(&mut self) {
        self.phase = CyclePhase::Idle;
    }
}

impl<T: 'static> Classifier<T> {
    pub fn section_changed(
        &mut self,
        changes: &mut ChangeSet,
        index: usize,
        kind: ChangeKind,
    ) -> Result<(), ContractViolation> {
        if self.phase == CyclePhase::Objects {
            return Err(ContractViolation::SectionAfterObject { index });
        }
        let overlaps = match kind {
            ChangeKind::Insert => {
                changes.insert_section(index);
                changes.is_section_deleted(index)
            }
            ChangeKind::Delete => {
                changes.delete_section(index);
                changes.is_section_inserted(index)
            }
            ChangeKind::Move | ChangeKind::Update => {
                return Err(ContractViolation::UnsupportedSectionChange { index, kind });
            }
        };
        if overlaps {
            cwarn!(index, "section is both inserted and deleted in one cycle");
        }
        ctrace!(index, ?kind, "section change recorded");
        self.phase = CyclePhase::Sections;
        Ok(())
    }

    /// Classifies one object notification against the cycle's section changes.
    ///
    /// On error the change set is left untouched.
    pub fn object_changed(
        &mut self,
        changes: &mut ChangeSet,
        object: T,
        old: Option<Position>,
        new: Option<Position>,
        kind: ChangeKind,
    ) -> Result<Classification, ContractViolation> {
        let require_old = || old.ok_or(ContractViolation::MissingOldPosition { kind });
        let require_new = || new.ok_or(ContractViolation::MissingNewPosition { kind });

        let change = match kind {
            ChangeKind::Delete => {
                let old = require_old()?;
                (!changes.is_section_deleted(old.section)).then_some(ItemChange::Delete(old))
            }
            ChangeKind::Insert => {
                let new = require_new()?;
                (!changes.is_section_inserted(new.section)).then_some(ItemChange::Insert(new))
            }
            ChangeKind::Move => {
                let (old, new) = (require_old()?, require_new()?);
                match (
                    changes.is_section_deleted(old.section),
                    changes.is_section_inserted(new.section),
                ) {
                    (false, false) => Some(ItemChange::Move { from: old, to: new }),
                    // The inserted section already brings the new content.
                    (false, true) => Some(ItemChange::Delete(old)),
                    // The deleted section already takes the old content away.
                    (true, false) => Some(ItemChange::Insert(new)),
                    (true, true) => None,
                }
            }
            ChangeKind::Update => {
                let old = require_old()?;
                if changes.is_section_deleted(old.section) {
                    None
                } else {
                    Some(match &self.reconfigure {
                        Some(factory) => {
                            let factory = Rc::clone(factory);
                            ItemChange::Reconfigure(Reconfigure::new(move || factory(old, &object)))
                        }
                        None => ItemChange::Update(old),
                    })
                }
            }
        };

        self.phase = CyclePhase::Objects;
        Ok(match change {
            Some(change) => {
                ctrace!(?kind, ?old, ?new, recorded = ?change, "object change recorded");
                changes.push(change);
                Classification::Recorded
            }
            None => {
                ctrace!(?kind, ?old, ?new, "object change suppressed by section change");
                Classification::Suppressed
            }
        })
    }
}

impl<T> core::fmt::Debug for Classifier<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Classifier")
            .field("reconfigure", &self.reconfigure.is_some())
            .field("phase", &self.phase)
            .finish()
    }
}
