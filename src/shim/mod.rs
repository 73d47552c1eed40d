//! Shimmed objects and access interception
//!
//! A shim is any object exposing named members through [`Shim`]. Wrapping one
//! in [`Intercepted`] logs every read and write against it:
//! - `get: <identity>.<member> -> <value>` on the channel matching the value's severity
//! - `set: <identity>.<member> -> <value>` on the info channel
//!
//! [`ShimFactory`] applies the wrapping at construction time so callers never
//! see the raw object.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod factory;
pub mod intercept;
pub mod policy;
pub mod severity;
pub mod sink;
pub mod value;

pub use factory::{Construct, RecordInit, ShimFactory};
pub use intercept::Intercepted;
pub use policy::{InterceptionPolicy, PolicyConfig, PolicyMode};
pub use severity::{AccessClassifier, AccessSeverity};
pub use sink::{AccessRecord, AccessSink, ConsoleSink, FanoutSink, LogSink, RecordingSink};
pub use value::{Function, ObjectRef, Value};

/// Well-known symbolic keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Symbol {
    ToStringTag,
    ToPrimitive,
    Iterator,
}

impl Symbol {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Symbol.toStringTag" => Some(Self::ToStringTag),
            "Symbol.toPrimitive" => Some(Self::ToPrimitive),
            "Symbol.iterator" => Some(Self::Iterator),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::ToStringTag => "Symbol.toStringTag",
            Symbol::ToPrimitive => "Symbol.toPrimitive",
            Symbol::Iterator => "Symbol.iterator",
        }
    }

    /// Symbols consulted for string conversion or type coercion
    pub fn is_meta(&self) -> bool {
        matches!(self, Symbol::ToStringTag | Symbol::ToPrimitive)
    }
}

/// A member key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Symbol(Symbol),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }

    /// Plain text form, as accepted by `Key::from`
    pub fn label(&self) -> &str {
        match self {
            Key::Name(name) => name,
            Key::Symbol(symbol) => symbol.as_str(),
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Symbol(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        match Symbol::from_str(s) {
            Some(symbol) => Key::Symbol(symbol),
            None => Key::Name(s.to_string()),
        }
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Key::Symbol(symbol)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Symbol(symbol) => write!(f, "[{}]", symbol.as_str()),
        }
    }
}

/// Capability set shared by shimmed objects and their interceptors
pub trait Shim {
    /// Name used when no identity is given
    fn type_name(&self) -> &str;

    /// Resolve a member; unbound members resolve to `Value::Missing`
    fn get(&self, key: &Key) -> Value;

    /// Assign a member. Returns false when the object rejected the write.
    fn set(&mut self, key: &Key, value: Value) -> bool;
}

/// A dynamic object with insertion-ordered members
#[derive(Debug, Clone, Default)]
pub struct Record {
    type_name: String,
    members: IndexMap<Key, Value>,
    read_only: IndexSet<Key>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Builder form of [`Record::define`]
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.define(key.into(), value.into());
        self
    }

    /// Bind a member directly, bypassing read-only checks
    pub fn define(&mut self, key: Key, value: Value) {
        self.members.insert(key, value);
    }

    /// Mark a member read-only; later writes are silently rejected
    pub fn freeze(&mut self, key: Key) {
        self.read_only.insert(key);
    }

    pub fn member(&self, key: &Key) -> Value {
        self.members.get(key).cloned().unwrap_or(Value::Missing)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.members.keys()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Shim for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(&self, key: &Key) -> Value {
        self.member(key)
    }

    fn set(&mut self, key: &Key, value: Value) -> bool {
        if self.read_only.contains(key) {
            log::trace!("{}: rejected write to read-only member {}", self.type_name, key);
            return false;
        }
        self.members.insert(key.clone(), value);
        true
    }
}
