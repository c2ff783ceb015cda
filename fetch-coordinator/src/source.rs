use core::fmt;

use crate::{Notification, Position, SectionInfo};

/// Handle for one active subscription to an observed source's notification channel.
///
/// Owned by whoever subscribed; hand it back through [`ObservedSource::unsubscribe`] to detach.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// The ground-truth data collaborator (e.g. a live query/result controller).
///
/// Contract for notifications delivered through [`next_notification`](Self::next_notification):
/// - Only notifications produced while `subscription` was active are delivered; nothing is
///   buffered for detached or replaced subscriptions.
/// - Within a cycle, section changes precede object changes, and the cycle ends with exactly one
///   [`Notification::DidChangeContent`].
/// - Cycles never overlap.
pub trait ObservedSource {
    type Object;
    type Error: fmt::Debug;

    fn perform_fetch(&mut self) -> Result<(), Self::Error>;

    /// The current snapshot, or `None` before the first successful fetch.
    fn sections(&self) -> Option<&[SectionInfo]>;

    fn object_at(&self, position: Position) -> Option<Self::Object>;

    fn position_of(&self, object: &Self::Object) -> Option<Position>;

    fn subscribe(&mut self) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);

    fn next_notification(
        &mut self,
        subscription: &Subscription,
    ) -> Option<Notification<Self::Object>>;
}
