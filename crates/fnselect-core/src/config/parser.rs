//! Service file parser with helpful error messages

use super::paths::ServiceFormat;
use super::schema::ServiceConfig;
use super::value;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a service file, picking the format from its extension
pub fn parse_service_file(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read service file: {}", path.display()))?;

    parse_service_str(&content, ServiceFormat::from_path(path))
        .with_context(|| format!("Failed to parse service file: {}", path.display()))
}

/// Parse service file content in the given format
pub fn parse_service_str(content: &str, format: ServiceFormat) -> Result<ServiceConfig> {
    match format {
        ServiceFormat::Toml => parse_service_toml_str(content),
        ServiceFormat::Json => parse_service_json_str(content),
    }
}

/// Parse TOML service content from string
pub fn parse_service_toml_str(content: &str) -> Result<ServiceConfig> {
    let config: ServiceConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Parse JSON service content from string
pub fn parse_service_json_str(content: &str) -> Result<ServiceConfig> {
    let config: ServiceConfig = serde_json::from_str(content).map_err(|e| {
        let context = get_line_context(content, e.line());
        anyhow::anyhow!(
            "JSON parsing error at line {}:\n{}\n\nError: {}",
            e.line(),
            context,
            e
        )
    })?;

    config.validate()?;

    Ok(config)
}

/// Enhance TOML parsing errors with the offending lines
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.message().to_string();

    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    if let Some(line_num) = line_hint {
        let context = get_line_context(content, line_num);
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            context,
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a service to a TOML string
pub fn to_toml(config: &ServiceConfig) -> Result<String> {
    let document = value::service_to_toml(config).context("Failed to serialize service to TOML")?;
    toml::to_string_pretty(&document).with_context(|| "Failed to serialize service to TOML")
}

/// Serialize a service to a JSON string
pub fn to_json(config: &ServiceConfig) -> Result<String> {
    let mut document =
        serde_json::to_value(config).with_context(|| "Failed to serialize service to JSON")?;
    value::plain_datetimes(&mut document);
    serde_json::to_string_pretty(&document).with_context(|| "Failed to serialize service to JSON")
}
