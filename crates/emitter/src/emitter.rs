//! Synchronous event emitter
//!
//! Listeners run on the caller's thread, one after another, in the order
//! they were registered. Each dispatch pass iterates a snapshot of the
//! listeners, so a listener may register, remove or emit on the same
//! emitter while the pass is running. The registry lock is never held while
//! a listener runs.
//!
//! A listener that fails (returns `Err` or panics) during a regular pass is
//! reported on the [`ERROR`] channel and the pass continues. A listener that
//! fails while handling the error channel aborts the pass and the failure is
//! returned to the caller of [`Emitter::emit`].

use crate::args::Arguments;
use crate::error::{EmitterError, Failure};
use crate::event::{EventKey, IntoEvent, ERROR};
use crate::listener::Listener;
use crate::registry::{Insertion, Registry};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

pub struct Emitter {
    registry: Mutex<Registry>,
}

impl Emitter {
    /// Reserved key of the error channel, same as [`crate::ERROR`].
    pub const ERROR: EventKey = ERROR;

    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Register `listener` for `event`.
    ///
    /// Registering a listener that is already present only updates its
    /// one-shot flag; its position in the dispatch order is kept.
    pub fn on(
        &self,
        event: impl IntoEvent,
        listener: &Listener,
        once: bool,
    ) -> Result<bool, EmitterError> {
        let event = event.into_event().ok_or(EmitterError::InvalidEvent)?;

        let insertion = self
            .registry
            .lock()
            .insert(event.clone(), listener.clone(), once);

        match insertion {
            Insertion::Added => {
                tracing::trace!("Added {:?} to '{}' (once: {})", listener, event, once)
            }
            Insertion::Updated => {
                tracing::trace!("Updated {:?} on '{}' (once: {})", listener, event, once)
            }
        }

        Ok(true)
    }

    /// Register `listener` for `event`, removing it after its first call.
    pub fn once(&self, event: impl IntoEvent, listener: &Listener) -> Result<bool, EmitterError> {
        self.on(event, listener, true)
    }

    /// Remove listeners.
    ///
    /// - no event: every event is removed
    /// - event without listener: the event and all its listeners are removed
    /// - event and listener: that listener is removed, and the event with it
    ///   once it has no listeners left
    ///
    /// Removing something that is not registered is not an error; the
    /// emitter is already in the requested state, so this always returns
    /// `true`.
    pub fn off(&self, event: impl IntoEvent, listener: Option<&Listener>) -> bool {
        let Some(event) = event.into_event() else {
            return self.clear();
        };

        // Removed handles are dropped after the guard: a listener's captured
        // state may call back into the emitter when it is dropped.
        match listener {
            None => {
                let removed = self.registry.lock().remove_event(&event);
                if !removed.is_empty() {
                    tracing::trace!("Removed '{}' with {} listener(s)", event, removed.len());
                }
            }
            Some(listener) => {
                let removed = self.registry.lock().remove_listener(&event, listener);
                if removed.is_some() {
                    tracing::trace!("Removed {:?} from '{}'", listener, event);
                }
            }
        }

        true
    }

    /// Remove every event and listener.
    pub fn clear(&self) -> bool {
        let removed = self.registry.lock().clear();
        if !removed.is_empty() {
            tracing::trace!("Cleared {} listener(s)", removed.len());
        }
        true
    }

    /// Snapshot of the registered events.
    pub fn events(&self) -> HashSet<EventKey> {
        self.registry.lock().events()
    }

    /// Snapshot of the listeners of `event`, in dispatch order.
    pub fn listeners(&self, event: impl IntoEvent) -> Vec<Listener> {
        match event.into_event() {
            Some(event) => self.registry.lock().listeners(&event),
            None => Vec::new(),
        }
    }

    pub fn listener_count(&self, event: impl IntoEvent) -> usize {
        match event.into_event() {
            Some(event) => self.registry.lock().listener_count(&event),
            None => 0,
        }
    }

    pub fn has_event(&self, event: impl IntoEvent) -> bool {
        match event.into_event() {
            Some(event) => self.registry.lock().contains(&event),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }

    /// Call every listener of `event` with `args`.
    ///
    /// Returns `Ok(false)` when there is no event or nobody listens to it,
    /// `Ok(true)` once every listener of the pass has been called.
    pub fn emit(&self, event: impl IntoEvent, args: Arguments) -> Result<bool, EmitterError> {
        let Some(event) = event.into_event() else {
            tracing::debug!("Ignoring emit without an event");
            return Ok(false);
        };

        self.dispatch(&event, &args)
    }

    fn dispatch(&self, event: &EventKey, args: &Arguments) -> Result<bool, EmitterError> {
        let snapshot = self.registry.lock().listeners(event);
        if snapshot.is_empty() {
            tracing::debug!("No listeners for '{}'", event);
            return Ok(false);
        }

        tracing::debug!("Dispatching '{}' to {} listener(s)", event, snapshot.len());

        for listener in &snapshot {
            let outcome = match invoke(event, listener, args) {
                Ok(()) => Ok(()),
                Err(failure) if event.is_error() => {
                    tracing::error!("Error listener failed: {}", failure);
                    Err(EmitterError::ErrorListenerFailed(failure))
                }
                Err(failure) => {
                    tracing::warn!("{}, forwarding to error channel", failure);
                    let info = serde_json::to_value(&failure)
                        .unwrap_or_else(|_| Value::String(failure.to_string()));
                    self.dispatch(&ERROR, &args.with_leading(info)).map(|_| ())
                }
            };

            self.release_once(event, listener);
            outcome?;
        }

        tracing::debug!("Finished dispatching '{}'", event);
        Ok(true)
    }

    // Checks the live record: the listener may have been removed or
    // re-registered with another flag while it ran.
    fn release_once(&self, event: &EventKey, listener: &Listener) {
        let removed = {
            let mut registry = self.registry.lock();
            match registry.record(event, listener) {
                Some(record) if record.once => registry.remove_listener(event, listener),
                _ => None,
            }
        };
        if removed.is_some() {
            tracing::trace!("Released one-shot {:?} from '{}'", listener, event);
        }
    }
}

fn invoke(event: &EventKey, listener: &Listener, args: &Arguments) -> Result<(), Failure> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.call(args))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Failure::from_error(event.to_value(), &err)),
        Err(payload) => Err(Failure::from_panic(event.to_value(), payload.as_ref())),
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.registry.lock().summary();
        f.debug_struct("Emitter")
            .field("events", &summary)
            .finish()
    }
}
