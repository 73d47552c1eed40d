//! Rules deciding which member accesses get logged

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::{AccessClassifier, Key, Symbol};

/// Names starting with this prefix are private by convention
pub const PRIVATE_PREFIX: char = '_';

const STRICT_EXCLUSIONS: &[&str] = &[
    "addEventListener",
    "removeEventListener",
    "then",
    "toString",
    "Symbol.toStringTag",
    "Symbol.toPrimitive",
];

// Only five of the six permissive entries are known; `valueOf` is an assumed sixth.
const PERMISSIVE_EXCLUSIONS: &[&str] = &[
    "addEventListener",
    "removeEventListener",
    "then",
    "toString",
    "valueOf",
    "targetElement",
];

/// Filtering and severity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Meta symbols and `_`-prefixed names are skipped; three severity levels
    #[default]
    Strict,
    /// Only the exclusion list applies; two severity levels
    Permissive,
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::Strict => "strict",
            PolicyMode::Permissive => "permissive",
        }
    }

    pub fn default_exclusions(&self) -> IndexSet<Key> {
        let names = match self {
            PolicyMode::Strict => STRICT_EXCLUSIONS,
            PolicyMode::Permissive => PERMISSIVE_EXCLUSIONS,
        };
        names.iter().map(|name| Key::from(*name)).collect()
    }

    pub fn classifier(&self) -> AccessClassifier {
        match self {
            PolicyMode::Strict => AccessClassifier::three_level(),
            PolicyMode::Permissive => AccessClassifier::two_level(),
        }
    }
}

/// Why a member is (or is not) logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    MetaSymbol,
    Excluded,
    Private,
    Loggable,
}

impl Verdict {
    pub fn is_loggable(&self) -> bool {
        matches!(self, Verdict::Loggable)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::MetaSymbol => "meta symbol",
            Verdict::Excluded => "excluded",
            Verdict::Private => "private by convention",
            Verdict::Loggable => "loggable",
        }
    }
}

/// Policy settings as read from config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub mode: PolicyMode,
    /// Replaces the mode's default exclusion list when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
    /// Appended to the exclusion list
    pub extra_exclusions: Vec<String>,
}

/// Allow/deny rules for member logging. Immutable once built.
#[derive(Debug, Clone)]
pub struct InterceptionPolicy {
    mode: PolicyMode,
    exclusions: IndexSet<Key>,
}

impl InterceptionPolicy {
    pub fn new(mode: PolicyMode, exclusions: IndexSet<Key>) -> Self {
        Self { mode, exclusions }
    }

    pub fn strict() -> Self {
        Self::new(PolicyMode::Strict, PolicyMode::Strict.default_exclusions())
    }

    pub fn permissive() -> Self {
        Self::new(PolicyMode::Permissive, PolicyMode::Permissive.default_exclusions())
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut exclusions = match &config.exclusions {
            Some(names) => names.iter().map(|name| Key::from(name.as_str())).collect(),
            None => config.mode.default_exclusions(),
        };
        exclusions.extend(config.extra_exclusions.iter().map(|name| Key::from(name.as_str())));
        Self::new(config.mode, exclusions)
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    pub fn exclusions(&self) -> &IndexSet<Key> {
        &self.exclusions
    }

    pub fn classifier(&self) -> AccessClassifier {
        self.mode.classifier()
    }

    pub fn verdict(&self, key: &Key) -> Verdict {
        if self.mode == PolicyMode::Strict && matches!(key, Key::Symbol(symbol) if symbol.is_meta()) {
            return Verdict::MetaSymbol;
        }
        if self.exclusions.contains(key) {
            return Verdict::Excluded;
        }
        if self.mode == PolicyMode::Strict
            && key.as_name().is_some_and(|name| name.starts_with(PRIVATE_PREFIX))
        {
            return Verdict::Private;
        }
        Verdict::Loggable
    }

    pub fn is_loggable(&self, key: &Key) -> bool {
        self.verdict(key).is_loggable()
    }
}

impl Default for InterceptionPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Symbols excluded by every strict policy regardless of configured list
pub fn meta_symbols() -> [Symbol; 2] {
    [Symbol::ToStringTag, Symbol::ToPrimitive]
}
