//! Output channels for access log lines

use colored::*;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use super::AccessSeverity;

/// Log target used by [`LogSink`]
pub const ACCESS_TARGET: &str = "shimtrace::access";

/// Receives one line per logged access
pub trait AccessSink {
    fn emit(&self, severity: AccessSeverity, line: &str);
}

/// Forwards access lines to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AccessSink for LogSink {
    fn emit(&self, severity: AccessSeverity, line: &str) {
        log::log!(target: ACCESS_TARGET, severity.level(), "{}", line);
    }
}

/// Prints access lines to stderr, colored by severity
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format(&self, severity: AccessSeverity, line: &str) -> String {
        if !self.color {
            return format!("[{}] {}", severity, line);
        }
        match severity {
            AccessSeverity::Error => format!("{} {}", "✗".red(), line.red()),
            AccessSeverity::Warning => format!("{} {}", "⚠".yellow(), line.yellow()),
            AccessSeverity::Info => format!("{} {}", "·".dimmed(), line),
        }
    }
}

impl AccessSink for ConsoleSink {
    fn emit(&self, severity: AccessSeverity, line: &str) {
        eprintln!("{}", self.format(severity, line));
    }
}

/// Sends each line to several sinks in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Rc<dyn AccessSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Rc<dyn AccessSink>>) -> Self {
        Self { sinks }
    }
}

impl AccessSink for FanoutSink {
    fn emit(&self, severity: AccessSeverity, line: &str) {
        for sink in &self.sinks {
            sink.emit(severity, line);
        }
    }
}

/// A captured access line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessRecord {
    pub severity: AccessSeverity,
    pub line: String,
}

/// Keeps every access line in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: RefCell<Vec<AccessRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AccessRecord> {
        self.records.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.borrow().iter().map(|r| r.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn count(&self, severity: AccessSeverity) -> usize {
        self.records.borrow().iter().filter(|r| r.severity == severity).count()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl AccessSink for RecordingSink {
    fn emit(&self, severity: AccessSeverity, line: &str) {
        self.records.borrow_mut().push(AccessRecord {
            severity,
            line: line.to_string(),
        });
    }
}
