//! Attach/detach state shared by the sub-controllers.

/// Whether a controller currently owns overlay entities.
#[derive(Debug, Clone)]
pub enum Lifecycle<T> {
    Detached,
    Attached(T),
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::Detached
    }
}

impl<T> Lifecycle<T> {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Attached(state) => Some(state),
            Self::Detached => None,
        }
    }

    /// Move to `Detached`, returning the previous state if any.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Attached(state) => Some(state),
            Self::Detached => None,
        }
    }
}
