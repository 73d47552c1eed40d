//! Construct-time wrapping of shim types

use std::marker::PhantomData;
use std::rc::Rc;

use super::{AccessSink, InterceptionPolicy, Intercepted, Key, LogSink, Record, Shim, Value};

/// A shim type that can be built from constructor arguments
pub trait Construct: Shim + Sized {
    type Args;

    fn construct(args: Self::Args) -> Self;
}

/// Builds `T` instances and hands out only their intercepted view
pub struct ShimFactory<T> {
    identity: Option<String>,
    policy: Rc<InterceptionPolicy>,
    sink: Rc<dyn AccessSink>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Construct> ShimFactory<T> {
    pub fn new(identity: Option<&str>, policy: Rc<InterceptionPolicy>, sink: Rc<dyn AccessSink>) -> Self {
        Self {
            identity: identity.map(String::from),
            policy,
            sink,
            _marker: PhantomData,
        }
    }

    /// Strict policy, logging through the `log` facade
    pub fn named(identity: &str) -> Self {
        Self::new(Some(identity), Rc::new(InterceptionPolicy::strict()), Rc::new(LogSink))
    }

    pub fn construct(&self, args: T::Args) -> Intercepted<T> {
        let instance = T::construct(args);
        log::debug!(
            "Constructed shim {}",
            self.identity.as_deref().unwrap_or_else(|| instance.type_name())
        );
        Intercepted::new(instance, self.identity.clone(), self.policy.clone(), self.sink.clone())
    }
}

impl<T> Clone for ShimFactory<T> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            policy: self.policy.clone(),
            sink: self.sink.clone(),
            _marker: PhantomData,
        }
    }
}

/// Constructor arguments for a [`Record`]
#[derive(Debug, Clone, Default)]
pub struct RecordInit {
    pub type_name: String,
    pub members: Vec<(Key, Value)>,
    pub read_only: Vec<Key>,
}

impl RecordInit {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn member(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.members.push((key.into(), value.into()));
        self
    }
}

impl Construct for Record {
    type Args = RecordInit;

    fn construct(args: RecordInit) -> Self {
        let mut record = Record::new(args.type_name);
        for (key, value) in args.members {
            record.define(key, value);
        }
        for key in args.read_only {
            record.freeze(key);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shim::{AccessSeverity, RecordingSink};

    /// Hand-written facade with fixed members
    struct Geolocator {
        accuracy_meters: f64,
        status: Option<String>,
    }

    impl Shim for Geolocator {
        fn type_name(&self) -> &str {
            "Geolocator"
        }

        fn get(&self, key: &Key) -> Value {
            match key.as_name() {
                Some("desiredAccuracyInMeters") => Value::Number(self.accuracy_meters),
                Some("locationStatus") => self.status.clone().into(),
                _ => Value::Missing,
            }
        }

        fn set(&mut self, key: &Key, value: Value) -> bool {
            match (key.as_name(), value) {
                (Some("desiredAccuracyInMeters"), Value::Number(n)) => {
                    self.accuracy_meters = n;
                    true
                }
                _ => false,
            }
        }
    }

    impl Construct for Geolocator {
        type Args = f64;

        fn construct(accuracy_meters: f64) -> Self {
            Self {
                accuracy_meters,
                status: None,
            }
        }
    }

    fn factory<T: Construct>(identity: Option<&str>) -> (ShimFactory<T>, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::new());
        let factory = ShimFactory::new(identity, Rc::new(InterceptionPolicy::strict()), sink.clone());
        (factory, sink)
    }

    #[test]
    fn test_constructed_instance_is_intercepted() {
        let (factory, sink) = factory::<Geolocator>(Some("Windows.Devices.Geolocation.Geolocator"));
        let mut geo = factory.construct(10.0);

        assert_eq!(geo.read(&Key::from("desiredAccuracyInMeters")), Value::Number(10.0));
        assert!(geo.read(&Key::from("locationStatus")).is_empty());
        assert!(geo.read(&Key::from("getGeopositionAsync")).is_missing());
        assert!(geo.write(&Key::from("desiredAccuracyInMeters"), Value::from(5)));

        assert_eq!(
            sink.lines(),
            vec![
                "get: Windows.Devices.Geolocation.Geolocator.desiredAccuracyInMeters -> 10",
                "get: Windows.Devices.Geolocation.Geolocator.locationStatus -> null",
                "get: Windows.Devices.Geolocation.Geolocator.getGeopositionAsync -> undefined",
                "set: Windows.Devices.Geolocation.Geolocator.desiredAccuracyInMeters -> 5",
            ]
        );
        assert_eq!(sink.count(AccessSeverity::Error), 1);
        assert_eq!(sink.count(AccessSeverity::Warning), 1);
    }

    #[test]
    fn test_identity_defaults_to_type_name() {
        let (factory, sink) = factory::<Geolocator>(None);
        let geo = factory.construct(1.0);
        assert_eq!(geo.identity(), "Geolocator");
        geo.get(&Key::from("desiredAccuracyInMeters"));
        assert_eq!(sink.lines(), vec!["get: Geolocator.desiredAccuracyInMeters -> 1"]);
    }

    #[test]
    fn test_construction_does_not_log() {
        let (factory, sink) = factory::<Record>(None);
        let init = RecordInit::new("MediaPlayer").member("volume", 0.5).member("_handle", 1);
        let player = factory.construct(init);
        assert!(sink.is_empty());
        assert_eq!(player.read(&Key::from("volume")), Value::Number(0.5));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_record_init_read_only() {
        let (factory, _sink) = factory::<Record>(None);
        let mut init = RecordInit::new("MediaPlayer").member("duration", 30);
        init.read_only.push(Key::from("duration"));
        let mut player = factory.construct(init);
        assert!(player.write(&Key::from("duration"), Value::from(1)));
        assert_eq!(player.read(&Key::from("duration")), Value::Number(30.0));
    }

    #[test]
    fn test_factory_instances_are_independent() {
        let (factory, _sink) = factory::<Record>(None);
        let mut a = factory.clone().construct(RecordInit::new("A").member("x", 1));
        let b = factory.construct(RecordInit::new("A").member("x", 1));
        a.write(&Key::from("x"), Value::from(2));
        assert_eq!(b.read(&Key::from("x")), Value::Number(1.0));
    }
}
