use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use crate::Position;

/// Section indexes, kept sorted so view calls are deterministic.
pub type SectionSet = BTreeSet<usize>;

/// A deferred in-place cell refresh. Runs at most once.
pub struct Reconfigure(Box<dyn FnOnce()>);

impl Reconfigure {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn run(self) {
        (self.0)()
    }
}

impl fmt::Debug for Reconfigure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reconfigure(..)")
    }
}

/// One classified item-level change.
#[derive(Debug)]
pub enum ItemChange {
    Insert(Position),
    Delete(Position),
    Move { from: Position, to: Position },
    Update(Position),
    Reconfigure(Reconfigure),
}

/// Changes accumulated over one notification cycle.
///
/// Section sets hold pre-change indexes for deletions and post-change indexes for insertions.
/// The classifier guarantees that no item change points into a section that is deleted (old
/// side) or inserted (new side) in the same cycle.
#[derive(Debug, Default)]
pub struct ChangeSet {
    inserted_sections: SectionSet,
    deleted_sections: SectionSet,
    item_changes: Vec<ItemChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_section_inserted(&self, section: usize) -> bool {
        self.inserted_sections.contains(&section)
    }

    pub fn is_section_deleted(&self, section: usize) -> bool {
        self.deleted_sections.contains(&section)
    }

    pub fn inserted_sections(&self) -> &SectionSet {
        &self.inserted_sections
    }

    pub fn deleted_sections(&self) -> &SectionSet {
        &self.deleted_sections
    }

    pub fn item_changes(&self) -> &[ItemChange] {
        &self.item_changes
    }

    /// Returns `false` if the section was already recorded as inserted.
    pub fn insert_section(&mut self, section: usize) -> bool {
        self.inserted_sections.insert(section)
    }

    /// Returns `false` if the section was already recorded as deleted.
    pub fn delete_section(&mut self, section: usize) -> bool {
        self.deleted_sections.insert(section)
    }

    pub fn push(&mut self, change: ItemChange) {
        self.item_changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.inserted_sections.is_empty()
            && self.deleted_sections.is_empty()
            && self.item_changes.is_empty()
    }

    /// Partitions the item changes into the buckets a view transaction consumes.
    pub fn into_batch(self) -> Batch {
        let mut batch = Batch {
            deleted_sections: self.deleted_sections,
            inserted_sections: self.inserted_sections,
            ..Batch::default()
        };
        for change in self.item_changes {
            match change {
                ItemChange::Insert(p) => batch.inserted_items.push(p),
                ItemChange::Delete(p) => batch.deleted_items.push(p),
                // Expressed as delete + insert; native moves interact badly with section changes.
                ItemChange::Move { from, to } => {
                    batch.deleted_items.push(from);
                    batch.inserted_items.push(to);
                }
                ItemChange::Update(p) => batch.reloaded_items.push(p),
                ItemChange::Reconfigure(r) => batch.reconfigures.push(r),
            }
        }
        batch
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mut inserted, mut deleted, mut moved, mut updated, mut reconfigured) = (0, 0, 0, 0, 0);
        for change in &self.item_changes {
            match change {
                ItemChange::Insert(_) => inserted += 1,
                ItemChange::Delete(_) => deleted += 1,
                ItemChange::Move { .. } => moved += 1,
                ItemChange::Update(_) => updated += 1,
                ItemChange::Reconfigure(_) => reconfigured += 1,
            }
        }
        write!(
            f,
            "sections +{} -{}; objects +{inserted} -{deleted} moved {moved} updated {updated} reconfigured {reconfigured}",
            self.inserted_sections.len(),
            self.deleted_sections.len(),
        )
    }
}

/// A [`ChangeSet`] partitioned for replay inside one view transaction.
#[derive(Debug, Default)]
pub struct Batch {
    pub deleted_sections: SectionSet,
    pub inserted_sections: SectionSet,
    /// Plain deletions and move sources, in recorded order.
    pub deleted_items: Vec<Position>,
    /// Plain insertions and move destinations, in recorded order.
    pub inserted_items: Vec<Position>,
    pub reloaded_items: Vec<Position>,
    pub reconfigures: Vec<Reconfigure>,
}

impl Batch {
    pub fn has_structural_changes(&self) -> bool {
        !(self.deleted_sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.deleted_items.is_empty()
            && self.inserted_items.is_empty()
            && self.reloaded_items.is_empty())
    }

    pub fn take_reconfigures(&mut self) -> Vec<Reconfigure> {
        core::mem::take(&mut self.reconfigures)
    }
}

impl From<ChangeSet> for Batch {
    fn from(changes: ChangeSet) -> Self {
        changes.into_batch()
    }
}
