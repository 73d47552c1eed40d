//! Event dispatching

use eyre::{Result, WrapErr};
use serde_json::{Map, Value};

use super::{Event, ListenerSet};

/// Build `{ name, detail: fields, ...fields }` and hand it to every listener in order.
///
/// The first listener error stops delivery and is returned to the caller.
pub fn dispatch_structured(listeners: &ListenerSet<Event>, name: &str, fields: &Map<String, Value>) -> Result<()> {
    let event = Event::new(name, fields);
    log::debug!("Dispatching event '{}' to {} listener(s)", name, listeners.len());

    for (idx, listener) in listeners.iter().enumerate() {
        listener
            .invoke(&event)
            .wrap_err_with(|| format!("Listener #{} failed handling event '{}'", idx, name))?;
    }

    Ok(())
}

/// Hand `payload` unchanged to every listener in order
pub fn dispatch_raw<P: ?Sized>(listeners: &ListenerSet<P>, name: &str, payload: &P) -> Result<()> {
    log::debug!("Dispatching raw event '{}' to {} listener(s)", name, listeners.len());

    for (idx, listener) in listeners.iter().enumerate() {
        listener
            .invoke(payload)
            .wrap_err_with(|| format!("Listener #{} failed handling raw event '{}'", idx, name))?;
    }

    Ok(())
}
