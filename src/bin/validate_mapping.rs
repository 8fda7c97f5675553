//! Mapping payload checker.
//!
//! Normalizes a backend mapping payload and prints the canonical fields plus
//! every defaulted or malformed attribute as JSON.
//!
//! Usage:
//!   cargo run --bin validate_mapping -- mapping.json
//!   cargo run --bin validate_mapping -- mapping.json --config mapper.json --issues-only
//!
//! Set `RUST_LOG=warn` to see each finding as it is produced.

use pdf_field_mapper::config::MapperConfig;
use pdf_field_mapper::fields::{FieldNormalizer, MappingPayload};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

struct CheckConfig {
    payload_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    issues_only: bool,
    strict: bool,
}

impl CheckConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            payload_path: None,
            config_path: None,
            issues_only: false,
            strict: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    if i < args.len() {
                        config.config_path = Some(PathBuf::from(&args[i]));
                    }
                },
                "--issues-only" => {
                    config.issues_only = true;
                },
                "--strict" => {
                    config.strict = true;
                },
                other => {
                    config.payload_path = Some(PathBuf::from(other));
                },
            }
            i += 1;
        }
        config
    }
}

fn run(check: &CheckConfig) -> pdf_field_mapper::Result<bool> {
    let mapper = match &check.config_path {
        Some(path) => MapperConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => MapperConfig::default(),
    };
    let Some(payload_path) = &check.payload_path else {
        return Err(pdf_field_mapper::Error::Unsupported(
            "no mapping payload file given".to_string(),
        ));
    };

    let payload = MappingPayload::from_json_str(&fs::read_to_string(payload_path)?)?;
    let normalizer = FieldNormalizer::new(mapper.mapping);
    let (fields, report) = normalizer.normalize_with_report(&payload);

    let output = if check.issues_only {
        json!({ "issues": report.issues })
    } else {
        json!({ "fields": fields, "issues": report.issues })
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("{} fields, {} issues", fields.len(), report.len());

    Ok(report.is_clean())
}

fn main() -> ExitCode {
    env_logger::init();

    let check = CheckConfig::from_args();
    match run(&check) {
        Ok(clean) if clean || !check.strict => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
