use crate::{
    ChangeSet, Classifier, ContractViolation, Coordinatable, CoordinatorError,
    CoordinatorOptions, Notification, ObservedSource, Position, SectionInfo, Subscription, fatal,
};

/// Lifecycle of a [`Coordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Constructed, not loaded yet.
    Idle,
    /// Subscribed; accumulating and flushing change cycles.
    Active,
    /// Detached from the source's notifications.
    Paused,
}

/// Binds an [`ObservedSource`] to a [`Coordinatable`] view.
///
/// Single-threaded: every call must happen on the thread that owns the view, and the source must
/// not start a new cycle before the previous `DidChangeContent` was handled.
///
/// ```
/// # use fetch_coordinator::*;
/// # fn demo<S: ObservedSource<Object = u32>, C: Coordinatable>(source: S, target: C) {
/// let mut c = Coordinator::new(source, target, CoordinatorOptions::new());
/// c.load();
/// // ...later, on the view thread:
/// c.pump();
/// # }
/// ```
pub struct Coordinator<S: ObservedSource, C> {
    source: S,
    target: C,
    classifier: Classifier<S::Object>,
    changes: ChangeSet,
    subscription: Option<Subscription>,
    paused: bool,
    loaded: bool,
    detach_after_cycle: bool,
}

impl<S, C> Coordinator<S, C>
where
    S: ObservedSource,
    S::Object: 'static,
    C: Coordinatable,
{
    pub fn new(source: S, target: C, options: CoordinatorOptions<S::Object>) -> Self {
        cdebug!(
            paused = options.paused,
            reconfigure = options.reconfigure.is_some(),
            "Coordinator::new"
        );
        Self {
            source,
            target,
            classifier: Classifier::new(options.reconfigure),
            changes: ChangeSet::new(),
            subscription: None,
            paused: options.paused,
            loaded: false,
            detach_after_cycle: false,
        }
    }

    /// `Idle` until the first successful load, whatever the pause flag says.
    pub fn state(&self) -> State {
        if !self.loaded {
            State::Idle
        } else if self.paused {
            State::Paused
        } else {
            State::Active
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn target(&self) -> &C {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut C {
        &mut self.target
    }

    /// Changes accumulated so far in the current cycle.
    pub fn pending_changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn sections(&self) -> Option<&[SectionInfo]> {
        self.source.sections()
    }

    /// Fetches, subscribes (unless paused) and fully reloads the view.
    ///
    /// Aborts if the fetch fails.
    pub fn load(&mut self) {
        if let Err(err) = self.try_load() {
            fatal(err);
        }
    }

    pub fn try_load(&mut self) -> Result<(), CoordinatorError<S::Error>> {
        self.source
            .perform_fetch()
            .map_err(CoordinatorError::Fetch)?;

        if !self.paused && self.subscription.is_none() {
            self.subscription = Some(self.source.subscribe());
        }

        // Nothing accumulated before the fetch can be diffed against the new snapshot.
        self.changes = ChangeSet::new();
        self.classifier.end_cycle();
        self.detach_after_cycle = false;
        // A pause requested mid-cycle would otherwise stay attached after the reset.
        if self.paused {
            self.detach();
        }
        self.loaded = true;

        cdebug!(
            sections = self.source.sections().map_or(0, |s| s.len()),
            subscribed = self.subscription.is_some(),
            "load"
        );
        self.target.reload_data();
        Ok(())
    }

    /// Pauses or resumes observation.
    ///
    /// Pausing detaches from the source; a cycle that is already in flight still completes and
    /// flushes, and the detach happens right after it. Resuming re-subscribes and performs a full
    /// fetch-and-reload, since the data may have diverged while paused.
    pub fn set_paused(&mut self, paused: bool) {
        if let Err(err) = self.try_set_paused(paused) {
            fatal(err);
        }
    }

    pub fn try_set_paused(&mut self, paused: bool) -> Result<(), CoordinatorError<S::Error>> {
        if self.paused == paused {
            return Ok(());
        }

        if paused {
            self.pause();
            Ok(())
        } else {
            cdebug!("resuming");
            self.paused = false;
            self.detach_after_cycle = false;
            let loaded = self.try_load();
            if loaded.is_err() {
                // Stay paused so a retry fetches again.
                self.pause();
            }
            loaded
        }
    }

    fn pause(&mut self) {
        self.paused = true;
        if self.classifier.in_cycle() {
            cdebug!("pause requested mid-cycle; detaching after flush");
            self.detach_after_cycle = true;
        } else {
            cdebug!("paused");
            self.detach();
        }
    }

    /// Handles one notification. Aborts on a malformed notification.
    pub fn handle(&mut self, notification: Notification<S::Object>) {
        if let Err(err) = self.try_handle(notification) {
            fatal(err);
        }
    }

    /// Handles one notification.
    ///
    /// Notifications arriving while detached are ignored.
    pub fn try_handle(
        &mut self,
        notification: Notification<S::Object>,
    ) -> Result<(), ContractViolation> {
        if self.subscription.is_none() {
            ctrace!("notification ignored while detached");
            return Ok(());
        }

        match notification {
            Notification::WillChangeContent => self.classifier.begin_cycle(),
            Notification::SectionChanged { index, kind } => {
                self.classifier
                    .section_changed(&mut self.changes, index, kind)?;
            }
            Notification::ObjectChanged {
                object,
                old,
                new,
                kind,
            } => {
                self.classifier
                    .object_changed(&mut self.changes, object, old, new, kind)?;
            }
            Notification::DidChangeContent => self.flush(),
        }
        Ok(())
    }

    /// Drains and handles every notification the source has for the active subscription.
    ///
    /// Returns the number of notifications handled. Aborts on a malformed notification.
    pub fn pump(&mut self) -> usize {
        match self.try_pump() {
            Ok(n) => n,
            Err(err) => fatal(err),
        }
    }

    pub fn try_pump(&mut self) -> Result<usize, ContractViolation> {
        let mut handled = 0usize;
        loop {
            // A pause requested mid-cycle detaches after the flush, which ends the loop here.
            let Some(subscription) = &self.subscription else {
                break;
            };
            let Some(notification) = self.source.next_notification(subscription) else {
                break;
            };
            self.try_handle(notification)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Returns the object at `position`. Aborts if the source has no object there.
    pub fn object_at(&self, position: Position) -> S::Object {
        match self.try_object_at(position) {
            Ok(object) => object,
            Err(err) => fatal(err),
        }
    }

    pub fn try_object_at(&self, position: Position) -> Result<S::Object, CoordinatorError<S::Error>> {
        self.source
            .object_at(position)
            .ok_or(CoordinatorError::MissingObject(position))
    }

    fn flush(&mut self) {
        self.classifier.end_cycle();
        let changes = core::mem::take(&mut self.changes);
        cdebug!(summary = %changes, "flush");
        self.target.apply(changes);

        if self.detach_after_cycle {
            self.detach_after_cycle = false;
            self.detach();
        }
    }

    fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            ctrace!(id = subscription.id(), "unsubscribe");
            self.source.unsubscribe(subscription);
        }
    }
}

impl<S: ObservedSource, C> Drop for Coordinator<S, C> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription);
        }
    }
}

impl<S, C> core::fmt::Debug for Coordinator<S, C>
where
    S: ObservedSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coordinator")
            .field("paused", &self.paused)
            .field("loaded", &self.loaded)
            .field("subscribed", &self.subscription.is_some())
            .field("phase", &self.classifier.phase())
            .field("pending", &self.changes)
            .finish_non_exhaustive()
    }
}
