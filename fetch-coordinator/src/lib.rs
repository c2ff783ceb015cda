//! Turns change notifications from an observed data source into batched, animatable updates of
//! a sectioned list or grid view.
//!
//! The crate is UI-agnostic. Three collaborators are supplied by the host:
//! - an [`ObservedSource`] that owns the data, performs fetches and emits notification cycles
//!   (section changes, then object changes, then `DidChangeContent`)
//! - a view, either a [`ListView`] (begin/end transaction) or a [`GridView`] (batch-update block)
//! - optionally a [`ReconfigureFactory`] that refreshes visible cells in place
//!
//! A [`Coordinator`] wires them together: its [`Classifier`] folds each cycle into a
//! [`ChangeSet`], dropping item changes already covered by section insertions/deletions, and on
//! `DidChangeContent` the view target replays the set as one ordered transaction.
//!
//! For data source, selection and in-memory source helpers, see the `fetch-coordinator-adapter`
//! crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod change_set;
mod classifier;
mod coordinator;
mod error;
mod options;
mod source;
mod types;
mod view;


pub use change_set::{Batch, ChangeSet, ItemChange, Reconfigure, SectionSet};
pub use classifier::{Classification, Classifier, CyclePhase};
pub use coordinator::{Coordinator, State};
pub use error::{ContractViolation, CoordinatorError};
pub use options::{CoordinatorOptions, ReconfigureFactory};
pub use source::{ObservedSource, Subscription};
pub use types::{ChangeKind, Notification, Position, SectionInfo};
pub use view::{Coordinatable, GridTarget, GridView, ListTarget, ListView};

#[doc(hidden)]
pub use error::fatal;
