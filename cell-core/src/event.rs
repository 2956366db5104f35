//! Host-driven dispatch: the host reports relation state, endpoints react.
//!
//! Each endpoint declares a static table of reactions keyed by [`Event`]. The host
//! either calls [`Endpoint::handle`] with an event it already knows about, or
//! [`dispatch`] to derive events from its own input flags
//! (`endpoint.<name>.joined`, `endpoint.<name>.changed`). Reactions run to
//! completion, one at a time.

use std::fmt;

use log::trace;

use crate::flags::{expand_name, FlagStore};
use crate::keys::flag;

/// Relation lifecycle notification delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The relation reached the joined state.
    Joined,
    /// The relation is not joined (never joined, or broken).
    Departed,
    /// Data received from remote units changed.
    Changed,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Event::Joined => "joined",
            Event::Departed => "departed",
            Event::Changed => "changed",
        };
        f.write_str(s)
    }
}

/// One entry of an endpoint's reaction table.
pub struct Reaction<E> {
    pub name: &'static str,
    pub event: Event,
    pub run: fn(&mut E, &mut dyn FlagStore),
}

impl<E> fmt::Debug for Reaction<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("name", &self.name)
            .field("event", &self.event)
            .finish()
    }
}

/// A relation endpoint bound to one interface name.
pub trait Endpoint: Sized + 'static {
    /// Reactions in the order they run for a given event.
    const REACTIONS: &'static [Reaction<Self>];

    /// Interface name used to namespace flags, e.g. `cell`.
    fn endpoint_name(&self) -> &str;

    /// Fully qualified flag name for a template in this endpoint's namespace.
    fn expand_name(&self, template: &str) -> String {
        expand_name(self.endpoint_name(), template)
    }

    /// Run every reaction registered for `event`. Returns how many ran.
    fn handle(&mut self, event: Event, flags: &mut dyn FlagStore) -> usize {
        let mut ran = 0;
        for reaction in Self::REACTIONS.iter().filter(|r| r.event == event) {
            trace!(
                "{}: {} -> {}",
                self.endpoint_name(),
                event,
                reaction.name
            );
            (reaction.run)(self, flags);
            ran += 1;
        }
        ran
    }
}

/// Events implied by the host's input flags for `endpoint_name`, in delivery order.
pub fn pending_events(endpoint_name: &str, flags: &dyn FlagStore) -> Vec<Event> {
    let mut events = Vec::with_capacity(2);
    if flags.is_set(&expand_name(endpoint_name, flag::JOINED)) {
        events.push(Event::Joined);
    } else {
        events.push(Event::Departed);
    }
    if flags.is_set(&expand_name(endpoint_name, flag::CHANGED)) {
        events.push(Event::Changed);
    }
    events
}

/// Evaluate the host's input flags and run the matching reactions.
/// Returns the events that were handled.
pub fn dispatch<E: Endpoint>(endpoint: &mut E, flags: &mut dyn FlagStore) -> Vec<Event> {
    let events = pending_events(endpoint.endpoint_name(), flags);
    for &event in &events {
        endpoint.handle(event, flags);
    }
    events
}
