use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "shimtrace Configuration".bold());
            println!();

            println!("  log_level: {}", config.log_level.as_filter());
            if let Some(ref path) = config.log_file {
                println!("  log_file: {}", path.display());
            }
            println!();

            println!("{}:", "policy".cyan());
            println!("  mode: {}", config.policy.mode.as_str());
            if let Some(ref exclusions) = config.policy.exclusions {
                println!("  exclusions: {}", exclusions.join(", "));
            }
            if !config.policy.extra_exclusions.is_empty() {
                println!("  extra_exclusions: {}", config.policy.extra_exclusions.join(", "));
            }
            println!();

            println!("{}:", "output".cyan());
            println!("  color: {}", config.output.color);
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    let value = match key {
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        "log_file" | "log-file" => config.log_file.as_ref().map(|p| p.display().to_string()),
        "policy.mode" => Some(config.policy.mode.as_str().to_string()),
        "policy.exclusions" => Some(
            config
                .policy()
                .exclusions()
                .iter()
                .map(|key| key.label().to_string())
                .collect::<Vec<_>>()
                .join(","),
        ),
        "output.color" => Some(config.output.color.to_string()),
        _ => None,
    };

    match value {
        Some(v) => println!("{}", v),
        None => eyre::bail!("Unknown config key: {}", key),
    }

    Ok(())
}
