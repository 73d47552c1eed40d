//! Probe scripts: a shim description plus the accesses to replay against it
//!
//! ```yaml
//! type: Windows.Media.Playback.MediaPlayer
//! identity: MediaPlayer
//! members:
//!   volume: 0.5
//!   source: null
//!   play: { fn: play }
//! read-only: [volume]
//! steps:
//!   - get: volume
//!   - set: { member: volume, value: 1 }
//!   - call: play
//! ```

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;

use crate::shim::{AccessSink, InterceptionPolicy, Key, Record, RecordInit, ShimFactory, Value};

/// A single access to replay
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Get(String),
    Set { member: String, value: serde_json::Value },
    Call(String),
}

/// Probe script structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeScript {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Name shown in log lines instead of the type
    #[serde(default)]
    pub identity: Option<String>,

    /// Initial members (order preserved)
    #[serde(default)]
    pub members: IndexMap<String, serde_json::Value>,

    #[serde(default, rename = "read-only")]
    pub read_only: Vec<String>,

    /// Written as single-key maps (`- get: volume`)
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl ProbeScript {
    /// Load a script from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read probe script: {}", path.as_ref().display()))?;
        Self::from_str(&content)
    }

    /// Parse a script from YAML string
    pub fn from_str(content: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(content).context("Failed to parse probe script")?;
        Ok(script)
    }

    /// Constructor arguments for the scripted object
    pub fn init(&self) -> RecordInit {
        RecordInit {
            type_name: self.type_name.clone(),
            members: self
                .members
                .iter()
                .map(|(name, value)| (Key::from(name.as_str()), Value::from(value.clone())))
                .collect(),
            read_only: self.read_only.iter().map(|name| Key::from(name.as_str())).collect(),
        }
    }

    /// Build the object through a factory and replay every step; returns the number of steps run
    pub fn run(&self, policy: Rc<InterceptionPolicy>, sink: Rc<dyn AccessSink>) -> usize {
        let factory = ShimFactory::<Record>::new(self.identity.as_deref(), policy, sink);
        let mut shim = factory.construct(self.init());

        for step in &self.steps {
            match step {
                Step::Get(member) => {
                    shim.read(&Key::from(member.as_str()));
                }
                Step::Set { member, value } => {
                    shim.write(&Key::from(member.as_str()), Value::from(value.clone()));
                }
                Step::Call(member) => {
                    if shim.call(&Key::from(member.as_str()), &[]).is_none() {
                        log::debug!("{}.{} is not callable", shim.identity(), member);
                    }
                }
            }
        }

        self.steps.len()
    }
}
