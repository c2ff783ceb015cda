use alloc::vec::Vec;

use crate::{Batch, ChangeSet, Position, Reconfigure, SectionSet};

/// Something a [`crate::Coordinator`] can drive.
///
/// [`ListTarget`] and [`GridTarget`] implement this for list-like and grid-like views. Implement
/// it directly to intercept change sets (e.g. to record them).
pub trait Coordinatable {
    /// Full, non-animated reload from the source's current snapshot.
    fn reload_data(&mut self);

    /// Applies one cycle's changes as a single transaction.
    fn apply(&mut self, changes: ChangeSet);
}

/// A list-like view with an explicit begin/end update transaction.
///
/// Deletions refer to pre-transaction indexes, insertions to post-transaction indexes. Index
/// sets passed to one transaction are internally consistent; a view that cannot apply them is
/// expected to abort rather than apply part of the batch.
pub trait ListView {
    fn reload_data(&mut self);
    fn begin_updates(&mut self);
    fn end_updates(&mut self);
    fn delete_sections(&mut self, sections: &SectionSet);
    fn insert_sections(&mut self, sections: &SectionSet);
    fn delete_rows(&mut self, positions: &[Position]);
    fn insert_rows(&mut self, positions: &[Position]);
    fn reload_rows(&mut self, positions: &[Position]);
}

/// A grid-like view whose transaction is a batch-update block.
pub trait GridView {
    fn reload_data(&mut self);
    /// Runs `updates` as one animated batch. Must call `updates` exactly once before returning.
    fn perform_batch_updates(&mut self, updates: impl FnOnce(&mut Self));
    fn delete_sections(&mut self, sections: &SectionSet);
    fn insert_sections(&mut self, sections: &SectionSet);
    fn delete_items(&mut self, positions: &[Position]);
    fn insert_items(&mut self, positions: &[Position]);
    fn reload_items(&mut self, positions: &[Position]);
}

/// The structural calls both view flavors share, under one naming.
trait Mutations {
    fn delete_sections(&mut self, sections: &SectionSet);
    fn insert_sections(&mut self, sections: &SectionSet);
    fn delete_items(&mut self, positions: &[Position]);
    fn insert_items(&mut self, positions: &[Position]);
    fn reload_items(&mut self, positions: &[Position]);
}

struct ListMutations<'a, V>(&'a mut V);

impl<V: ListView> Mutations for ListMutations<'_, V> {
    fn delete_sections(&mut self, sections: &SectionSet) {
        self.0.delete_sections(sections);
    }
    fn insert_sections(&mut self, sections: &SectionSet) {
        self.0.insert_sections(sections);
    }
    fn delete_items(&mut self, positions: &[Position]) {
        self.0.delete_rows(positions);
    }
    fn insert_items(&mut self, positions: &[Position]) {
        self.0.insert_rows(positions);
    }
    fn reload_items(&mut self, positions: &[Position]) {
        self.0.reload_rows(positions);
    }
}

struct GridMutations<'a, V>(&'a mut V);

impl<V: GridView> Mutations for GridMutations<'_, V> {
    fn delete_sections(&mut self, sections: &SectionSet) {
        self.0.delete_sections(sections);
    }
    fn insert_sections(&mut self, sections: &SectionSet) {
        self.0.insert_sections(sections);
    }
    fn delete_items(&mut self, positions: &[Position]) {
        self.0.delete_items(positions);
    }
    fn insert_items(&mut self, positions: &[Position]) {
        self.0.insert_items(positions);
    }
    fn reload_items(&mut self, positions: &[Position]) {
        self.0.reload_items(positions);
    }
}

/// Section changes go first so item positions are read against the new section layout.
fn replay(batch: &Batch, m: &mut impl Mutations) {
    if !batch.deleted_sections.is_empty() {
        m.delete_sections(&batch.deleted_sections);
    }
    if !batch.inserted_sections.is_empty() {
        m.insert_sections(&batch.inserted_sections);
    }
    if !batch.deleted_items.is_empty() {
        m.delete_items(&batch.deleted_items);
    }
    if !batch.inserted_items.is_empty() {
        m.insert_items(&batch.inserted_items);
    }
    if !batch.reloaded_items.is_empty() {
        m.reload_items(&batch.reloaded_items);
    }
}

fn run_reconfigures(reconfigures: Vec<Reconfigure>) {
    for r in reconfigures {
        r.run();
    }
}

/// Drives a [`ListView`]: `begin_updates`, structural calls, `end_updates`, then any
/// reconfigure thunks outside the animated transaction.
#[derive(Clone, Debug, Default)]
pub struct ListTarget<V> {
    view: V,
}

impl<V> ListTarget<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

impl<V: ListView> Coordinatable for ListTarget<V> {
    fn reload_data(&mut self) {
        self.view.reload_data();
    }

    fn apply(&mut self, changes: ChangeSet) {
        let mut batch = changes.into_batch();
        let reconfigures = batch.take_reconfigures();

        self.view.begin_updates();
        replay(&batch, &mut ListMutations(&mut self.view));
        self.view.end_updates();

        run_reconfigures(reconfigures);
    }
}

/// Drives a [`GridView`]: one `perform_batch_updates` block, then any reconfigure thunks once
/// the block has returned.
#[derive(Clone, Debug, Default)]
pub struct GridTarget<V> {
    view: V,
}

impl<V> GridTarget<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

impl<V: GridView> Coordinatable for GridTarget<V> {
    fn reload_data(&mut self) {
        self.view.reload_data();
    }

    fn apply(&mut self, changes: ChangeSet) {
        let mut batch = changes.into_batch();
        let reconfigures = batch.take_reconfigures();

        self.view
            .perform_batch_updates(|view| replay(&batch, &mut GridMutations(view)));

        run_reconfigures(reconfigures);
    }
}
