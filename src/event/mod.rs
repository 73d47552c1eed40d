//! Synchronous event fan-out to listener callbacks
//!
//! Listeners live in a caller-owned [`ListenerSet`]; dispatch only iterates it.
//! Mutating the set while a dispatch is running is not supported; clone the
//! set first if a listener needs to change subscriptions.

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub mod dispatch;

pub use dispatch::{dispatch_raw, dispatch_structured};

/// Reference-counted listener callback
pub type Listener<E> = Rc<dyn Fn(&E) -> eyre::Result<()>>;

/// A listener compared by reference identity
pub struct ListenerHandle<E: ?Sized>(Rc<dyn Fn(&E) -> eyre::Result<()>>);

impl<E: ?Sized> ListenerHandle<E> {
    pub fn new(listener: impl Fn(&E) -> eyre::Result<()> + 'static) -> Self {
        Self(Rc::new(listener))
    }

    pub fn invoke(&self, event: &E) -> eyre::Result<()> {
        (self.0)(event)
    }
}

impl<E: ?Sized> From<Rc<dyn Fn(&E) -> eyre::Result<()>>> for ListenerHandle<E> {
    fn from(listener: Rc<dyn Fn(&E) -> eyre::Result<()>>) -> Self {
        Self(listener)
    }
}

impl<E: ?Sized> Clone for ListenerHandle<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E: ?Sized> PartialEq for ListenerHandle<E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<E: ?Sized> Eq for ListenerHandle<E> {}

impl<E: ?Sized> Hash for ListenerHandle<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const ()).hash(state);
    }
}

impl<E: ?Sized> std::fmt::Debug for ListenerHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListenerHandle({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Insertion-ordered, duplicate-free listener collection
pub struct ListenerSet<E: ?Sized> {
    listeners: IndexSet<ListenerHandle<E>>,
}

impl<E: ?Sized> ListenerSet<E> {
    pub fn new() -> Self {
        Self {
            listeners: IndexSet::new(),
        }
    }

    /// Wrap a closure, register it, and return its handle for later removal
    pub fn subscribe(&mut self, listener: impl Fn(&E) -> eyre::Result<()> + 'static) -> ListenerHandle<E> {
        let handle = ListenerHandle::new(listener);
        self.listeners.insert(handle.clone());
        handle
    }

    /// Returns false if this listener is already registered
    pub fn insert(&mut self, handle: ListenerHandle<E>) -> bool {
        self.listeners.insert(handle)
    }

    /// Remove a listener, keeping the order of the rest
    pub fn remove(&mut self, handle: &ListenerHandle<E>) -> bool {
        self.listeners.shift_remove(handle)
    }

    pub fn contains(&self, handle: &ListenerHandle<E>) -> bool {
        self.listeners.contains(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListenerHandle<E>> {
        self.listeners.iter()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: ?Sized> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Clone for ListenerSet<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

/// Flat event record: `{ name, detail, ...fields }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event {
    record: Map<String, Value>,
}

impl Event {
    /// Fields are merged last, so a `name` or `detail` field overrides the built-in slot
    pub fn new(name: &str, fields: &Map<String, Value>) -> Self {
        let mut record = Map::new();
        record.insert("name".to_string(), Value::String(name.to_string()));
        record.insert("detail".to_string(), Value::Object(fields.clone()));
        for (key, value) in fields {
            record.insert(key.clone(), value.clone());
        }
        Self { record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(|v| v.as_str())
    }

    pub fn detail(&self) -> Option<&Value> {
        self.record.get("detail")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.record
    }
}
