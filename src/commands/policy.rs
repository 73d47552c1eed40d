use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::{OutputFormat, PolicyAction};
use crate::config::Config;
use shimtrace::shim::policy::PRIVATE_PREFIX;
use shimtrace::shim::{InterceptionPolicy, Key, PolicyMode};

pub fn run(action: PolicyAction, config: &Config) -> Result<()> {
    let policy = config.policy();
    match action {
        PolicyAction::Check { members } => check(&members, &policy),
        PolicyAction::Show { format } => show(OutputFormat::resolve(format), &policy),
    }
}

fn check(members: &[String], policy: &InterceptionPolicy) -> Result<()> {
    for member in members {
        let verdict = policy.verdict(&Key::from(member.as_str()));
        let marker = if verdict.is_loggable() { "✓".green() } else { "✗".red() };
        println!("{} {} ({})", marker, member, verdict.describe());
    }
    Ok(())
}

#[derive(Serialize)]
struct PolicyView {
    mode: PolicyMode,
    private_prefix: Option<char>,
    exclusions: Vec<String>,
}

fn show(format: OutputFormat, policy: &InterceptionPolicy) -> Result<()> {
    let view = PolicyView {
        mode: policy.mode(),
        private_prefix: (policy.mode() == PolicyMode::Strict).then_some(PRIVATE_PREFIX),
        exclusions: policy.exclusions().iter().map(|key| key.label().to_string()).collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&view)?),
        OutputFormat::Text => {
            println!("{} {}", "mode:".bold(), view.mode.as_str());
            if let Some(prefix) = view.private_prefix {
                println!("{} names starting with '{}'", "private:".bold(), prefix);
            }
            println!("{}", "exclusions:".bold());
            for name in &view.exclusions {
                println!("  - {}", name);
            }
        }
    }

    Ok(())
}
