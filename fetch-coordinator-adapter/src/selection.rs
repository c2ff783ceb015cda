use alloc::vec::Vec;

use fetch_coordinator::{ObservedSource, Position, fatal};

use crate::{AdapterError, ListDataSource};

/// Row selection state of a list view.
pub trait SelectableView {
    fn select_row(&mut self, position: Position);

    fn selected_rows(&self) -> Vec<Position>;

    fn selected_row(&self) -> Option<Position> {
        self.selected_rows().first().copied()
    }
}

/// Maps between view selection and the objects behind it.
pub trait TableSelection {
    type Object;

    /// Aborts if there is no object at `position`.
    fn object_at(&self, position: Position) -> Self::Object;

    fn position_of(&self, object: &Self::Object) -> Option<Position>;

    /// Selects the rows showing `objects`. Objects that are not present are skipped.
    fn select_objects<V: SelectableView>(&self, view: &mut V, objects: &[Self::Object]) {
        for position in objects.iter().filter_map(|o| self.position_of(o)) {
            view.select_row(position);
        }
    }

    fn selected_objects<V: SelectableView>(&self, view: &V) -> Vec<Self::Object> {
        view.selected_rows()
            .into_iter()
            .map(|position| self.object_at(position))
            .collect()
    }

    fn selected_object<V: SelectableView>(&self, view: &V) -> Option<Self::Object> {
        view.selected_row().map(|position| self.object_at(position))
    }
}

impl<T: Clone + PartialEq, C> TableSelection for ListDataSource<T, C> {
    type Object = T;

    fn object_at(&self, position: Position) -> T {
        ListDataSource::object_at(self, position).clone()
    }

    fn position_of(&self, object: &T) -> Option<Position> {
        ListDataSource::position_of(self, object)
    }
}

/// [`TableSelection`] over an observed source's current snapshot.
#[derive(Debug)]
pub struct FetchedSelection<'a, S> {
    source: &'a S,
}

impl<'a, S> FetchedSelection<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }
}

impl<S: ObservedSource> TableSelection for FetchedSelection<'_, S> {
    type Object = S::Object;

    fn object_at(&self, position: Position) -> S::Object {
        match self.source.object_at(position) {
            Some(object) => object,
            None => fatal(AdapterError::MissingObject(position)),
        }
    }

    fn position_of(&self, object: &S::Object) -> Option<Position> {
        self.source.position_of(object)
    }
}
