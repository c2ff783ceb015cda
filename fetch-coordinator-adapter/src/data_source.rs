use alloc::string::String;
use alloc::vec::Vec;

use fetch_coordinator::{ObservedSource, Position, fatal};

use crate::{AdapterError, CellConfigurator, NoSupplementaryViews, SupplementaryConfigurator};

/// Answers a list or grid view's data questions from an [`ObservedSource`]'s current snapshot.
///
/// The data source does not own the source; every query borrows it, so the same source can be
/// owned by a [`fetch_coordinator::Coordinator`] and read through
/// [`fetch_coordinator::Coordinator::source`].
#[derive(Clone, Debug)]
pub struct SectionedDataSource<C, P = NoSupplementaryViews> {
    configurator: C,
    supplementary: Option<P>,
    /// Use section names as header titles.
    pub system_headers: bool,
    /// Expose section index titles (the side index of a list).
    pub table_index: bool,
}

impl<C> SectionedDataSource<C> {
    pub fn new(configurator: C) -> Self {
        Self {
            configurator,
            supplementary: None,
            system_headers: false,
            table_index: false,
        }
    }
}

impl<C, P> SectionedDataSource<C, P> {
    /// Enables supplementary views, configured by `supplementary`.
    pub fn with_supplementary<Q>(self, supplementary: Q) -> SectionedDataSource<C, Q> {
        SectionedDataSource {
            configurator: self.configurator,
            supplementary: Some(supplementary),
            system_headers: self.system_headers,
            table_index: self.table_index,
        }
    }

    pub fn with_system_headers(mut self, system_headers: bool) -> Self {
        self.system_headers = system_headers;
        self
    }

    pub fn with_table_index(mut self, table_index: bool) -> Self {
        self.table_index = table_index;
        self
    }

    pub fn configurator(&self) -> &C {
        &self.configurator
    }

    /// One section until the source has fetched.
    pub fn number_of_sections<S: ObservedSource>(&self, source: &S) -> usize {
        source.sections().map_or(1, |s| s.len())
    }

    pub fn number_of_items<S: ObservedSource>(&self, source: &S, section: usize) -> usize {
        source
            .sections()
            .and_then(|s| s.get(section))
            .map_or(0, |info| info.item_count)
    }

    /// Dequeues a cell through `dequeue(reuse_identifier, position)` and configures it for the
    /// object at `position`. Aborts if the source has no object there.
    pub fn cell_for<S>(
        &self,
        source: &S,
        position: Position,
        dequeue: impl FnOnce(&str, Position) -> C::Cell,
    ) -> C::Cell
    where
        S: ObservedSource,
        C: CellConfigurator<S::Object>,
    {
        match self.try_cell_for(source, position, dequeue) {
            Ok(cell) => cell,
            Err(err) => fatal(err),
        }
    }

    pub fn try_cell_for<S>(
        &self,
        source: &S,
        position: Position,
        dequeue: impl FnOnce(&str, Position) -> C::Cell,
    ) -> Result<C::Cell, AdapterError>
    where
        S: ObservedSource,
        C: CellConfigurator<S::Object>,
    {
        let object = source
            .object_at(position)
            .ok_or(AdapterError::MissingObject(position))?;
        let reuse_identifier = self.configurator.reuse_identifier(&object, position);
        let mut cell = dequeue(&reuse_identifier, position);
        self.configurator.configure(&mut cell, &object, position);
        Ok(cell)
    }

    pub fn title_for_header<S: ObservedSource>(&self, source: &S, section: usize) -> Option<String> {
        if !self.system_headers {
            return None;
        }
        source
            .sections()
            .and_then(|s| s.get(section))
            .map(|info| info.name.clone())
    }

    /// Uppercased first character of each section name, without duplicates, in section order.
    pub fn section_index_titles<S: ObservedSource>(&self, source: &S) -> Option<Vec<String>> {
        if !self.table_index {
            return None;
        }
        let mut titles: Vec<String> = Vec::new();
        for info in source.sections().unwrap_or_default() {
            if let Some(title) = index_title(&info.name) {
                if !titles.contains(&title) {
                    titles.push(title);
                }
            }
        }
        Some(titles)
    }

    /// First section whose index title is `title`; falls back to `index`, clamped to the last
    /// section.
    pub fn section_for_index_title<S: ObservedSource>(
        &self,
        source: &S,
        title: &str,
        index: usize,
    ) -> usize {
        let sections = source.sections().unwrap_or_default();
        sections
            .iter()
            .position(|info| index_title(&info.name).as_deref() == Some(title))
            .unwrap_or_else(|| index.min(sections.len().saturating_sub(1)))
    }

    /// Whether supplementary views should be requested at all.
    pub fn has_supplementary_views(&self) -> bool {
        self.supplementary.is_some()
    }

    /// Aborts when no supplementary configurator was supplied; check
    /// [`has_supplementary_views`](Self::has_supplementary_views) first.
    pub fn supplementary_view(
        &self,
        kind: &str,
        position: Position,
        dequeue: impl FnOnce(&str, &str, Position) -> P::View,
    ) -> P::View
    where
        P: SupplementaryConfigurator,
    {
        match self.try_supplementary_view(kind, position, dequeue) {
            Ok(view) => view,
            Err(err) => fatal(err),
        }
    }

    pub fn try_supplementary_view(
        &self,
        kind: &str,
        position: Position,
        dequeue: impl FnOnce(&str, &str, Position) -> P::View,
    ) -> Result<P::View, AdapterError>
    where
        P: SupplementaryConfigurator,
    {
        let supplementary = self
            .supplementary
            .as_ref()
            .ok_or(AdapterError::NoSupplementaryConfigurator)?;
        let reuse_identifier = supplementary.reuse_identifier(kind, position);
        let mut view = dequeue(kind, &reuse_identifier, position);
        supplementary.configure(&mut view, kind, position);
        Ok(view)
    }
}

fn index_title(name: &str) -> Option<String> {
    name.chars().next().map(|c| c.to_uppercase().collect())
}
