use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use fetch_coordinator::{Position, ReconfigureFactory};

/// Populates cells for objects of type `T`.
pub trait CellConfigurator<T> {
    type Cell;

    fn reuse_identifier(&self, object: &T, position: Position) -> String;

    fn configure(&self, cell: &mut Self::Cell, object: &T, position: Position);
}

/// Configures supplementary views (headers, footers, decorations) of a grid.
pub trait SupplementaryConfigurator {
    type View;

    fn reuse_identifier(&self, kind: &str, position: Position) -> String;

    fn configure(&self, view: &mut Self::View, kind: &str, position: Position);
}

/// Placeholder for data sources without supplementary views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoSupplementaryViews {}

impl SupplementaryConfigurator for NoSupplementaryViews {
    type View = core::convert::Infallible;

    fn reuse_identifier(&self, _kind: &str, _position: Position) -> String {
        match *self {}
    }

    fn configure(&self, _view: &mut Self::View, _kind: &str, _position: Position) {
        match *self {}
    }
}

/// Cells the view currently has on screen.
pub trait VisibleCells {
    type Cell;

    /// `None` when nothing is displayed at `position`.
    fn visible_cell_mut(&mut self, position: Position) -> Option<&mut Self::Cell>;
}

/// Builds a [`ReconfigureFactory`] that re-runs `configurator` on the visible cell in place.
///
/// Off-screen positions are skipped; the next dequeue configures them anyway.
pub fn reconfigure_visible<T, C, V>(configurator: Rc<C>, cells: Rc<RefCell<V>>) -> ReconfigureFactory<T>
where
    T: 'static,
    C: CellConfigurator<T> + 'static,
    V: VisibleCells<Cell = C::Cell> + 'static,
{
    Rc::new(move |position: Position, object: &T| {
        let mut cells = cells.borrow_mut();
        if let Some(cell) = cells.visible_cell_mut(position) {
            configurator.configure(cell, object, position);
        }
    })
}
