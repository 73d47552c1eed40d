//! Access severity classification

use serde::{Deserialize, Serialize};

use super::Value;

/// Severity of a logged access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSeverity {
    /// Member is not implemented
    Error,
    /// Member is implemented but unset
    Warning,
    Info,
}

impl AccessSeverity {
    pub fn level(&self) -> log::Level {
        match self {
            AccessSeverity::Error => log::Level::Error,
            AccessSeverity::Warning => log::Level::Warn,
            AccessSeverity::Info => log::Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessSeverity::Error => "error",
            AccessSeverity::Warning => "warning",
            AccessSeverity::Info => "info",
        }
    }
}

impl std::fmt::Display for AccessSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a resolved member value to a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessClassifier {
    warn_on_empty: bool,
}

impl AccessClassifier {
    /// Missing -> Error, Empty -> Warning, anything else -> Info
    pub fn three_level() -> Self {
        Self { warn_on_empty: true }
    }

    /// Missing -> Error, anything else -> Info
    pub fn two_level() -> Self {
        Self { warn_on_empty: false }
    }

    pub fn classify(&self, value: &Value) -> AccessSeverity {
        match value {
            Value::Missing => AccessSeverity::Error,
            Value::Empty if self.warn_on_empty => AccessSeverity::Warning,
            _ => AccessSeverity::Info,
        }
    }
}

impl Default for AccessClassifier {
    fn default() -> Self {
        Self::three_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shim::Function;

    #[test]
    fn test_three_level() {
        let classifier = AccessClassifier::three_level();
        assert_eq!(classifier.classify(&Value::Missing), AccessSeverity::Error);
        assert_eq!(classifier.classify(&Value::Empty), AccessSeverity::Warning);
        assert_eq!(classifier.classify(&Value::from("ok")), AccessSeverity::Info);
    }

    #[test]
    fn test_falsy_values_are_info() {
        let classifier = AccessClassifier::default();
        for value in [Value::from(0), Value::from(""), Value::from(false)] {
            assert_eq!(classifier.classify(&value), AccessSeverity::Info, "{:?}", value);
        }
        let func = Value::Function(Function::stub("play"));
        assert_eq!(classifier.classify(&func), AccessSeverity::Info);
    }

    #[test]
    fn test_two_level_treats_empty_as_info() {
        let classifier = AccessClassifier::two_level();
        assert_eq!(classifier.classify(&Value::Missing), AccessSeverity::Error);
        assert_eq!(classifier.classify(&Value::Empty), AccessSeverity::Info);
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(AccessSeverity::Error.level(), log::Level::Error);
        assert_eq!(AccessSeverity::Warning.level(), log::Level::Warn);
        assert_eq!(AccessSeverity::Info.level(), log::Level::Info);
    }
}
