use alloc::rc::Rc;

use crate::Position;

/// Builds an in-place refresh for a visible cell.
///
/// Called with the object's pre-change position and the object itself. When set, `Update`
/// notifications become [`crate::ItemChange::Reconfigure`] thunks instead of reload calls,
/// which avoids the flash of an animated reload.
///
/// Not `Send`: everything here runs on the thread that owns the view.
pub type ReconfigureFactory<T> = Rc<dyn Fn(Position, &T)>;

/// Configuration for [`crate::Coordinator`].
pub struct CoordinatorOptions<T> {
    pub reconfigure: Option<ReconfigureFactory<T>>,
    /// Start paused: `load` fetches and reloads but does not subscribe.
    pub paused: bool,
}

impl<T> CoordinatorOptions<T> {
    pub fn new() -> Self {
        Self {
            reconfigure: None,
            paused: false,
        }
    }

    pub fn with_reconfigure(mut self, reconfigure: Option<impl Fn(Position, &T) + 'static>) -> Self {
        self.reconfigure = reconfigure.map(|f| Rc::new(f) as ReconfigureFactory<T>);
        self
    }

    pub fn with_reconfigure_factory(mut self, reconfigure: Option<ReconfigureFactory<T>>) -> Self {
        self.reconfigure = reconfigure;
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }
}

impl<T> Default for CoordinatorOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CoordinatorOptions<T> {
    fn clone(&self) -> Self {
        Self {
            reconfigure: self.reconfigure.clone(),
            paused: self.paused,
        }
    }
}

impl<T> core::fmt::Debug for CoordinatorOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoordinatorOptions")
            .field("reconfigure", &self.reconfigure.is_some())
            .field("paused", &self.paused)
            .finish()
    }
}
