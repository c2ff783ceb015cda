use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use fetch_coordinator::{Notification, ObservedSource, Position, SectionInfo, Subscription};

/// One named section of a [`MemorySource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemorySection<T> {
    pub name: String,
    pub items: Vec<T>,
}

impl<T> MemorySection<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Returned by [`MemorySource::perform_fetch`] after [`MemorySource::fail_next_fetch`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("fetch rejected: {reason}")]
pub struct FetchRejected {
    pub reason: String,
}

/// A scriptable, in-memory [`ObservedSource`].
///
/// The host mutates the data with [`set_sections`](Self::set_sections) and describes the
/// mutation with [`emit`](Self::emit)/[`emit_cycle`](Self::emit_cycle). Notifications emitted
/// while nobody is subscribed are dropped, never buffered for a later subscriber.
///
/// Reads (`sections`, `object_at`, `position_of`) see the fetched snapshot. It follows the data
/// while someone is subscribed; otherwise it only moves on the next fetch.
#[derive(Debug)]
pub struct MemorySource<T> {
    sections: Vec<MemorySection<T>>,
    snapshot: Option<Vec<MemorySection<T>>>,
    infos: Option<Vec<SectionInfo>>,
    fail_next_fetch: Option<String>,
    fetches: usize,
    next_id: u64,
    active: Option<u64>,
    queue: VecDeque<Notification<T>>,
    dropped: usize,
}

impl<T> MemorySource<T> {
    pub fn new(sections: Vec<MemorySection<T>>) -> Self {
        Self {
            sections,
            snapshot: None,
            infos: None,
            fail_next_fetch: None,
            fetches: 0,
            next_id: 1,
            active: None,
            queue: VecDeque::new(),
            dropped: 0,
        }
    }

    /// The live data, which may be ahead of the fetched snapshot.
    pub fn data(&self) -> &[MemorySection<T>] {
        &self.sections
    }

    /// Makes the next [`perform_fetch`](ObservedSource::perform_fetch) fail with `reason`.
    pub fn fail_next_fetch(&mut self, reason: impl Into<String>) {
        self.fail_next_fetch = Some(reason.into());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    pub fn is_subscribed(&self) -> bool {
        self.active.is_some()
    }

    /// Notifications dropped because nobody was subscribed.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Notifications waiting for the active subscriber.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues `notification` for the active subscriber. Returns `false` if it was dropped.
    pub fn emit(&mut self, notification: Notification<T>) -> bool {
        if self.active.is_none() {
            self.dropped += 1;
            atrace!("notification dropped; no subscriber");
            return false;
        }
        self.queue.push_back(notification);
        true
    }

    /// Emits one full cycle: `WillChangeContent`, `changes`, `DidChangeContent`.
    pub fn emit_cycle(&mut self, changes: impl IntoIterator<Item = Notification<T>>) {
        self.emit(Notification::WillChangeContent);
        for change in changes {
            self.emit(change);
        }
        self.emit(Notification::DidChangeContent);
    }

}

impl<T: Clone> MemorySource<T> {
    /// Replaces the data. The snapshot follows only while someone is subscribed.
    pub fn set_sections(&mut self, sections: Vec<MemorySection<T>>) {
        self.sections = sections;
        if self.active.is_some() && self.snapshot.is_some() {
            self.take_snapshot();
        }
    }

    /// Replaces the data and emits the cycle describing the mutation.
    pub fn mutate(
        &mut self,
        sections: Vec<MemorySection<T>>,
        changes: impl IntoIterator<Item = Notification<T>>,
    ) {
        self.set_sections(sections);
        self.emit_cycle(changes);
    }

    fn take_snapshot(&mut self) {
        self.infos = Some(
            self.sections
                .iter()
                .map(|s| SectionInfo::new(s.name.clone(), s.items.len()))
                .collect(),
        );
        self.snapshot = Some(self.sections.clone());
    }
}

impl<T: Clone + PartialEq> ObservedSource for MemorySource<T> {
    type Object = T;
    type Error = FetchRejected;

    fn perform_fetch(&mut self) -> Result<(), FetchRejected> {
        self.fetches += 1;
        if let Some(reason) = self.fail_next_fetch.take() {
            return Err(FetchRejected { reason });
        }
        self.take_snapshot();
        adebug!(sections = self.sections.len(), fetches = self.fetches, "fetched");
        Ok(())
    }

    fn sections(&self) -> Option<&[SectionInfo]> {
        self.infos.as_deref()
    }

    fn object_at(&self, position: Position) -> Option<T> {
        self.snapshot
            .as_ref()?
            .get(position.section)?
            .items
            .get(position.item)
            .cloned()
    }

    fn position_of(&self, object: &T) -> Option<Position> {
        self.snapshot.as_ref()?.iter().enumerate().find_map(|(section, s)| {
            s.items
                .iter()
                .position(|o| o == object)
                .map(|item| Position::new(section, item))
        })
    }

    fn subscribe(&mut self) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(id);
        self.queue.clear();
        adebug!(id, "subscribed");
        Subscription::new(id)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        if self.active == Some(subscription.id()) {
            self.active = None;
            self.dropped += self.queue.len();
            self.queue.clear();
            adebug!(id = subscription.id(), "unsubscribed");
        }
    }

    fn next_notification(&mut self, subscription: &Subscription) -> Option<Notification<T>> {
        if self.active != Some(subscription.id()) {
            return None;
        }
        self.queue.pop_front()
    }
}
