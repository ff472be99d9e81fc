//! The cancelable `filtered` notification.
//!
//! One event is dispatched per filter pass, after evaluation and before any
//! candidate is touched. A listener calling [`FilteredEvent::prevent_default`]
//! vetoes the visibility commit for that pass.

/// Payload of a filter pass notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEvent {
    /// Event type, the component name (`filter` by default).
    pub kind: String,
    /// Indexes of the found candidates, in candidate order.
    pub found: Vec<usize>,
    pub bubbles: bool,
    pub cancelable: bool,
    canceled: bool,
}

impl FilteredEvent {
    pub fn new(kind: impl Into<String>, found: Vec<usize>) -> Self {
        Self {
            kind: kind.into(),
            found,
            bubbles: true,
            cancelable: true,
            canceled: false,
        }
    }

    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.canceled = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.canceled
    }
}

pub trait FilterListener {
    fn on_filtered(&mut self, event: &mut FilteredEvent);
}

impl<F> FilterListener for F
where
    F: FnMut(&mut FilteredEvent),
{
    fn on_filtered(&mut self, event: &mut FilteredEvent) {
        self(event)
    }
}

/// Ordered listener registry.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Box<dyn FilterListener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: impl FilterListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Delivers `event` to every listener in registration order. Returns
    /// `false` if any of them canceled it.
    pub fn dispatch(&mut self, event: &mut FilteredEvent) -> bool {
        for listener in &mut self.listeners {
            listener.on_filtered(event);
        }
        !event.default_prevented()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}
