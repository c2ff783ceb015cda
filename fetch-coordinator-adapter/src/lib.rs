//! Adapter utilities for the `fetch-coordinator` crate.
//!
//! `fetch-coordinator` only turns notification cycles into view transactions. This crate
//! provides the small, framework-neutral pieces a host usually needs around it:
//!
//! - Data sources answering section/item counts, cells, headers and index titles
//! - Mapping a view's row selection back to objects
//! - An in-memory observed source for demos and tests
//!
//! Cells, views and reuse queues stay with the host toolkit; they appear here only as generic
//! parameters and closures.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod configurator;
mod data_source;
mod error;
mod list;
mod memory;
mod selection;

#[cfg(test)]
mod tests;

pub use configurator::{
    CellConfigurator, NoSupplementaryViews, SupplementaryConfigurator, VisibleCells,
    reconfigure_visible,
};
pub use data_source::SectionedDataSource;
pub use error::AdapterError;
pub use list::ListDataSource;
pub use memory::{FetchRejected, MemorySection, MemorySource};
pub use selection::{FetchedSelection, SelectableView, TableSelection};
