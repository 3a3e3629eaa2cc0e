//! Shared Session
//!
//! A [`Session`] is a plain single-owner structure. When an editor thread and
//! a background collaborator need the same session, wrap it in a
//! [`SharedSession`]: every access takes the lock, so connections, inputs,
//! outputs and values are only ever mutated by one thread at a time.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::identity::AttributeId;
use crate::value::Value;

use super::session::Session;

/// A cloneable, thread-safe handle to a session.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap an existing session.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Resolve an attribute value.
    pub fn get(&self, id: AttributeId) -> Result<Value> {
        self.inner.lock().get(id)
    }

    /// Set an attribute value.
    pub fn set(&self, id: AttributeId, value: impl Into<Value>) -> Result<()> {
        self.inner.lock().set(id, value)
    }

    /// Connect two attributes.
    pub fn connect(&self, source: AttributeId, destination: AttributeId) -> Result<()> {
        self.inner.lock().connect(source, destination)
    }

    /// Disconnect two attributes.
    pub fn disconnect(&self, source: AttributeId, destination: AttributeId) -> Result<()> {
        self.inner.lock().disconnect(source, destination)
    }

    /// Check the dirty flag and clear it in one step.
    ///
    /// Returns `true` if there were pending changes.
    pub fn take_dirty(&self) -> bool {
        let mut session = self.inner.lock();
        let dirty = session.is_dirty();
        session.mark_clean();
        dirty
    }
}

impl From<Session> for SharedSession {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
