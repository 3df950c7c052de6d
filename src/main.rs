#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the dropsight CLI.
//!
//! Reads a student record as a JSON object, runs the validation, scaling,
//! and inference pipeline against the loaded artifacts, and prints the
//! prediction as JSON (or a bare label with `--simple`).

use std::io::Read;
use std::path::PathBuf;

use serde::Serialize;

use dropsight::artifacts::ArtifactCatalog;
use dropsight::config::AppConfig;
use dropsight::narrative;
use dropsight::predict::{Prediction, Predictor};
use dropsight::record::StudentRecord;
use dropsight::{app_dirs, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;

    let config = match &options.config_path {
        Some(path) => AppConfig::load_from(path).map_err(|err| err.to_string())?,
        None => AppConfig::load().map_err(|err| err.to_string())?,
    };
    if let Err(err) = logging::init(config.log_filter.as_deref()) {
        eprintln!("Logging disabled: {err}");
    }

    let artifacts_dir = resolve_artifacts_dir(&options, &config)?;
    tracing::info!("Loading artifacts from {}", artifacts_dir.display());
    let catalog = ArtifactCatalog::load(&artifacts_dir);
    let predictor = Predictor::from_catalog(catalog);

    let record = read_record(&options)?;
    let prediction = predictor.predict(&record).map_err(|err| err.to_string())?;

    if options.simple {
        println!("{}", prediction.label);
        return Ok(());
    }
    let report = Report::new(prediction, &record);
    let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}

/// JSON document printed for a full prediction.
#[derive(Debug, Serialize)]
struct Report {
    prediction: Prediction,
    risk_factors: Vec<&'static str>,
    positive_factors: Vec<&'static str>,
}

impl Report {
    fn new(prediction: Prediction, record: &StudentRecord) -> Self {
        let risk_factors = narrative::risk_factors(record)
            .iter()
            .map(|factor| factor.describe())
            .collect();
        let positive_factors = narrative::positive_factors(record)
            .iter()
            .map(|factor| factor.describe())
            .collect();
        Self {
            prediction,
            risk_factors,
            positive_factors,
        }
    }
}

fn resolve_artifacts_dir(options: &CliOptions, config: &AppConfig) -> Result<PathBuf, String> {
    if let Some(dir) = &options.artifacts_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = &config.artifacts_dir {
        return Ok(dir.clone());
    }
    app_dirs::models_dir().map_err(|err| err.to_string())
}

fn read_record(options: &CliOptions) -> Result<StudentRecord, String> {
    if options.sample {
        return Ok(StudentRecord::sample());
    }
    let Some(input) = &options.input else {
        return Err(format!(
            "No input given; pass --input <record.json> or --sample\n\n{}",
            help_text()
        ));
    };
    let text = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|err| format!("Failed to read {}: {err}", input.display()))?
    };
    serde_json::from_str(&text).map_err(|err| format!("Invalid record JSON: {err}"))
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    artifacts_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    sample: bool,
    simple: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--artifacts" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--artifacts requires a value".to_string())?;
                options.artifacts_dir = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--input" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--input requires a value".to_string())?;
                options.input = Some(PathBuf::from(value));
            }
            "--sample" => options.sample = true,
            "--simple" => options.simple = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    if options.sample && options.input.is_some() {
        return Err("--sample and --input are mutually exclusive".to_string());
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "dropsight",
        "",
        "Predicts student dropout risk from a JSON record of enrollment attributes.",
        "",
        "Usage:",
        "  dropsight --input <record.json> [--artifacts <dir>] [--config <config.toml>] [--simple]",
        "  dropsight --sample",
        "",
        "Options:",
        "  --input <file>     Record JSON ('-' reads stdin)",
        "  --sample           Use the built-in sample record",
        "  --artifacts <dir>  Directory with scaler.json / classifier.json",
        "  --config <file>    Explicit config file path",
        "  --simple           Print only the predicted label",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_reads_flags() {
        let options = parse_args(vec![
            "--artifacts".into(),
            "/tmp/models".into(),
            "--sample".into(),
            "--simple".into(),
        ])
        .unwrap();
        assert_eq!(options.artifacts_dir, Some(PathBuf::from("/tmp/models")));
        assert!(options.sample);
        assert!(options.simple);
    }

    #[test]
    fn parse_args_rejects_unknown_flag() {
        let err = parse_args(vec!["--bogus".into()]).unwrap_err();
        assert!(err.contains("Unknown argument"));
    }

    #[test]
    fn sample_and_input_conflict() {
        let err = parse_args(vec![
            "--sample".into(),
            "--input".into(),
            "rec.json".into(),
        ])
        .unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }
}
