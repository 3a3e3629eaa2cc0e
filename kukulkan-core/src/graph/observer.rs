//! Change observers.
//!
//! Collaborators that react to edits (an editor repainting, an autosave)
//! subscribe to a session and are called after every successful mutation.

use crate::identity::{AttributeId, SubscriberId};

/// A mutation that was applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A new local value was stored on an attribute.
    ValueSet { attribute: AttributeId },

    /// `source` now drives `destination`.
    Connected {
        source: AttributeId,
        destination: AttributeId,
    },

    /// `source` no longer drives `destination`.
    Disconnected {
        source: AttributeId,
        destination: AttributeId,
    },
}

/// A registered change callback.
pub struct Subscriber {
    id: SubscriberId,
    notify: Box<dyn Fn(&ChangeEvent) + Send + Sync>,
}

impl Subscriber {
    /// Create a new subscriber with the given notification callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            notify: Box::new(notify),
        }
    }

    /// Get the subscriber's unique ID.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Deliver an event to the subscriber.
    pub fn notify(&self, event: &ChangeEvent) {
        (self.notify)(event);
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}
