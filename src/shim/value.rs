//! Dynamic values held by shimmed objects

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{Key, Record, Shim};

/// Callable member. Shared by reference so reads hand back the same function.
#[derive(Clone)]
pub struct Function {
    name: String,
    body: Rc<dyn Fn(&[Value]) -> Value>,
}

impl Function {
    pub fn new(name: impl Into<String>, body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    /// A function that accepts anything and returns `Missing`
    pub fn stub(name: impl Into<String>) -> Self {
        Self::new(name, |_| Value::Missing)
    }

    /// Declared name, used when rendering reads
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }

    pub fn same(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// Shared handle to a nested record
pub type ObjectRef = Rc<RefCell<Record>>;

/// A member value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No binding exists at all
    #[default]
    Missing,
    /// A binding exists but carries no content
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Function(Function),
    Object(ObjectRef),
}

impl Value {
    pub fn object(record: Record) -> Self {
        Value::Object(Rc::new(RefCell::new(record)))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Rendering used on the read path: callables show their declared name
    pub fn render(&self) -> String {
        match self {
            Value::Function(func) => func.name().to_string(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) | (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.same(b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "undefined"),
            Value::Empty => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}", if n.is_sign_positive() { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) if *n == 0.0 => write!(f, "0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "fn {}", func.name()),
            Value::Object(obj) => write!(f, "[object {}]", obj.borrow().type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Empty)
    }
}

impl From<serde_json::Value> for Value {
    /// `null` becomes `Empty`, `{"fn": name}` a stub function, other maps a nested `Object` record
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                let mut record = Record::new("Array");
                for (idx, item) in items.into_iter().enumerate() {
                    record.define(Key::name(idx.to_string()), item.into());
                }
                Value::object(record)
            }
            serde_json::Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(serde_json::Value::String(name)) = map.get("fn") {
                        return Value::Function(Function::stub(name.clone()));
                    }
                }
                let mut record = Record::new("Object");
                for (name, item) in map {
                    record.define(Key::from(name.as_str()), item.into());
                }
                Value::object(record)
            }
        }
    }
}
