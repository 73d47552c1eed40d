//! Runtime access tracing for shimmed API objects
//!
//! - [`shim`]: wrap objects so every member read and write is logged by severity
//! - [`event`]: fan events out synchronously to registered listeners

pub mod event;
pub mod script;
pub mod shim;

pub use event::{Event, ListenerHandle, ListenerSet, dispatch_raw, dispatch_structured};
pub use shim::{
    AccessSeverity, AccessSink, Construct, InterceptionPolicy, Intercepted, Key, PolicyMode, Record, Shim, ShimFactory,
    Value,
};
