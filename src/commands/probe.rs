use chrono::{DateTime, Utc};
use colored::*;
use eyre::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

use crate::cli::OutputFormat;
use crate::config::Config;
use shimtrace::script::ProbeScript;
use shimtrace::shim::{AccessRecord, AccessSeverity, AccessSink, ConsoleSink, FanoutSink, RecordingSink};

/// Outcome of one probe script
#[derive(Debug, Serialize)]
struct ProbeReport {
    script: PathBuf,
    identity: String,
    ran_at: DateTime<Utc>,
    steps: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    records: Vec<AccessRecord>,
}

pub fn run(path: &Path, format: OutputFormat, config: &Config) -> Result<()> {
    let path = Config::expand_path(path);
    let scripts = collect_scripts(&path)?;
    if scripts.is_empty() {
        eyre::bail!("No probe scripts found in {}", path.display());
    }

    let policy = Rc::new(config.policy());
    let mut reports = Vec::new();

    for script_path in &scripts {
        let script = ProbeScript::load(script_path)?;
        let recorder = Rc::new(RecordingSink::new());

        let sink: Rc<dyn AccessSink> = match format {
            OutputFormat::Text => {
                println!("{} {}", "▶".cyan(), script_path.display());
                Rc::new(FanoutSink::new(vec![
                    recorder.clone() as Rc<dyn AccessSink>,
                    Rc::new(ConsoleSink::new(config.output.color)),
                ]))
            }
            OutputFormat::Json | OutputFormat::Yaml => recorder.clone(),
        };

        log::info!("Running probe script {}", script_path.display());
        let steps = script.run(policy.clone(), sink);

        reports.push(ProbeReport {
            script: script_path.clone(),
            identity: script.identity.clone().unwrap_or_else(|| script.type_name.clone()),
            ran_at: Utc::now(),
            steps,
            errors: recorder.count(AccessSeverity::Error),
            warnings: recorder.count(AccessSeverity::Warning),
            infos: recorder.count(AccessSeverity::Info),
            records: recorder.records(),
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&reports)?),
        OutputFormat::Text => {
            println!();
            for report in &reports {
                println!(
                    "{}: {} steps, {} missing, {} unset, {} ok",
                    report.identity.bold(),
                    report.steps,
                    report.errors.to_string().red(),
                    report.warnings.to_string().yellow(),
                    report.infos.to_string().green()
                );
            }
        }
    }

    Ok(())
}

/// A single file, or every *.yaml / *.yml under a directory (sorted)
fn collect_scripts(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        eyre::bail!("Probe path does not exist: {}", path.display());
    }

    let mut scripts = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        let is_yaml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if entry.file_type().is_file() && is_yaml {
            scripts.push(entry.into_path());
        }
    }

    Ok(scripts)
}
