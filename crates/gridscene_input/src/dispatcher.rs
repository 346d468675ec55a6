//! Named publish/subscribe over platform events
//!
//! The dispatcher owns the full binding set from construction. Each raw
//! event is offered to every binding; a binding that extracts a payload
//! hands the same payload, by reference, to each subscriber registered
//! under its name in registration order. Delivery is synchronous.

use std::collections::HashMap;
use std::fmt;

use crate::binding::{EventBinding, RawEvent};

/// Subscriber callback
pub type Listener<P> = Box<dyn FnMut(&P)>;

/// Dispatcher setup error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Two bindings share a name
    DuplicateBinding(String),
    /// Subscribing to a name no binding carries
    UnknownBinding(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::DuplicateBinding(name) => write!(f, "Duplicate event binding: {}", name),
            DispatchError::UnknownBinding(name) => write!(f, "No event binding named {}", name),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Fans extracted payloads out to subscribers by binding name
pub struct EventDispatcher<P> {
    bindings: Vec<EventBinding<P>>,
    listeners: HashMap<String, Vec<Listener<P>>>,
}

impl<P> EventDispatcher<P> {
    /// Take ownership of every binding; names must be unique
    pub fn new(bindings: Vec<EventBinding<P>>) -> Result<Self, DispatchError> {
        let mut listeners = HashMap::with_capacity(bindings.len());
        for binding in &bindings {
            if listeners.insert(binding.name().to_string(), Vec::new()).is_some() {
                return Err(DispatchError::DuplicateBinding(binding.name().to_string()));
            }
        }
        log::debug!("Event dispatcher bound {} sources", bindings.len());

        Ok(Self { bindings, listeners })
    }

    /// Append `callback` to the subscribers of `name`
    ///
    /// Registering the same closure logic twice makes it fire twice.
    pub fn add_event_listener(
        &mut self,
        name: &str,
        callback: impl FnMut(&P) + 'static,
    ) -> Result<(), DispatchError> {
        match self.listeners.get_mut(name) {
            Some(list) => {
                list.push(Box::new(callback));
                Ok(())
            }
            None => {
                log::warn!("Listener for unknown binding {} dropped", name);
                Err(DispatchError::UnknownBinding(name.to_string()))
            }
        }
    }

    /// Deliver `event`; returns how many bindings fired
    pub fn dispatch(&mut self, event: &RawEvent) -> usize {
        let mut fired = 0;
        for binding in &self.bindings {
            let Some(payload) = binding.extract(event) else {
                continue;
            };
            fired += 1;
            if let Some(list) = self.listeners.get_mut(binding.name()) {
                for listener in list.iter_mut() {
                    listener(&payload);
                }
            }
        }
        fired
    }

    /// Binding names in construction order
    pub fn binding_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name()).collect()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }
}

impl<P> fmt::Debug for EventDispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}
