//! Logging wrapper around a shimmed object

use std::fmt;
use std::rc::Rc;

use super::{AccessSeverity, AccessSink, InterceptionPolicy, Key, Shim, Value};

/// Routes every member access on `T` through the policy and logs it.
///
/// Reads and writes are forwarded unchanged; the wrapper only adds log lines.
/// The wrapped object is owned and never handed back out.
pub struct Intercepted<T> {
    target: T,
    identity: Option<String>,
    policy: Rc<InterceptionPolicy>,
    sink: Rc<dyn AccessSink>,
}

impl<T: Shim> Intercepted<T> {
    pub fn new(target: T, identity: Option<String>, policy: Rc<InterceptionPolicy>, sink: Rc<dyn AccessSink>) -> Self {
        Self {
            target,
            identity,
            policy,
            sink,
        }
    }

    /// Configured name, or the target's type name
    pub fn identity(&self) -> &str {
        self.identity.as_deref().unwrap_or_else(|| self.target.type_name())
    }

    pub fn read(&self, key: &Key) -> Value {
        let value = self.target.get(key);

        if self.policy.is_loggable(key) {
            let severity = self.policy.classifier().classify(&value);
            let line = format!("get: {}.{} -> {}", self.identity(), key, value.render());
            self.sink.emit(severity, &line);
        }

        value
    }

    /// Always reports success, even when the target rejects the assignment
    pub fn write(&mut self, key: &Key, value: Value) -> bool {
        if self.policy.is_loggable(key) {
            let line = format!("set: {}.{} -> {}", self.identity(), key, value);
            self.sink.emit(AccessSeverity::Info, &line);
        }

        if !self.target.set(key, value) {
            log::trace!("{}: write to {} was not applied", self.identity(), key);
        }
        true
    }

    /// Read a member and invoke it when callable
    pub fn call(&self, key: &Key, args: &[Value]) -> Option<Value> {
        match self.read(key) {
            Value::Function(func) => Some(func.call(args)),
            _ => None,
        }
    }
}

impl<T: Shim> Shim for Intercepted<T> {
    fn type_name(&self) -> &str {
        self.target.type_name()
    }

    fn get(&self, key: &Key) -> Value {
        self.read(key)
    }

    fn set(&mut self, key: &Key, value: Value) -> bool {
        self.write(key, value)
    }
}

impl<T: Shim> fmt::Debug for Intercepted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercepted")
            .field("identity", &self.identity())
            .field("mode", &self.policy.mode())
            .finish_non_exhaustive()
    }
}
