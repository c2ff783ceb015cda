use alloc::string::String;
use alloc::vec::Vec;

use fetch_coordinator::{Position, fatal};

use crate::{AdapterError, CellConfigurator};

/// A single-section data source over an in-memory list.
#[derive(Clone, Debug)]
pub struct ListDataSource<T, C> {
    data: Vec<T>,
    configurator: C,
    /// Header title of the only section.
    pub default_section_title: Option<String>,
}

impl<T, C> ListDataSource<T, C> {
    pub fn new(configurator: C, data: Vec<T>) -> Self {
        Self {
            data,
            configurator,
            default_section_title: None,
        }
    }

    pub fn with_default_section_title(mut self, title: impl Into<String>) -> Self {
        self.default_section_title = Some(title.into());
        self
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Replaces the list. The owning view must reload afterwards.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
    }

    pub fn configurator(&self) -> &C {
        &self.configurator
    }

    pub fn number_of_sections(&self) -> usize {
        1
    }

    /// The list length, whatever `section` is asked for.
    pub fn number_of_items(&self, _section: usize) -> usize {
        self.data.len()
    }

    pub fn title_for_header(&self, _section: usize) -> Option<&str> {
        self.default_section_title.as_deref()
    }

    /// Aborts outside section 0 or past the end of the list.
    pub fn object_at(&self, position: Position) -> &T {
        match self.try_object_at(position) {
            Ok(object) => object,
            Err(err) => fatal(err),
        }
    }

    pub fn try_object_at(&self, position: Position) -> Result<&T, AdapterError> {
        if position.section != 0 {
            return Err(AdapterError::OutsideList(position));
        }
        self.data
            .get(position.item)
            .ok_or(AdapterError::MissingObject(position))
    }

    pub fn position_of(&self, object: &T) -> Option<Position>
    where
        T: PartialEq,
    {
        self.data
            .iter()
            .position(|o| o == object)
            .map(|item| Position::new(0, item))
    }

    pub fn cell_for(
        &self,
        position: Position,
        dequeue: impl FnOnce(&str, Position) -> C::Cell,
    ) -> C::Cell
    where
        C: CellConfigurator<T>,
    {
        let object = self.object_at(position);
        let reuse_identifier = self.configurator.reuse_identifier(object, position);
        let mut cell = dequeue(&reuse_identifier, position);
        self.configurator.configure(&mut cell, object, position);
        cell
    }
}
