use crate::config::types::{RuleRecord, ThemeConfig, ThemeFormat};
use crate::error::{Result, ThemeError};
use serde::de::Error as _;
use serde_json::Value;
use std::path::Path;

/// JSON themes may be a full document or just the array of rules.
fn theme_from_json(content: &str) -> serde_json::Result<ThemeConfig> {
	match serde_json::from_str::<Value>(content)? {
		document @ Value::Object(_) => serde_json::from_value(document),
		rules @ Value::Array(_) => Ok(ThemeConfig {
			replacements: serde_json::from_value::<Vec<RuleRecord>>(rules)?,
			interactive_commands: None,
		}),
		_ => Err(serde_json::Error::custom(
			"theme root must be an object with 'replacements' or an array of rules",
		)),
	}
}

/// Parse a theme file from the given path.
pub fn parse_theme_file(path: &Path) -> Result<ThemeConfig> {
	if !path.exists() {
		return Err(ThemeError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|source| ThemeError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_theme_str(&content, path, ThemeFormat::from_path(path))
}

/// Parse a theme from a string (useful for testing).
pub fn parse_theme_str(content: &str, path: &Path, format: ThemeFormat) -> Result<ThemeConfig> {
	let config = match format {
		ThemeFormat::Json => {
			theme_from_json(content).map_err(|source| ThemeError::JsonParseError {
				path: path.to_path_buf(),
				source,
			})?
		}
		ThemeFormat::Toml => {
			toml::from_str(content).map_err(|source| ThemeError::TomlParseError {
				path: path.to_path_buf(),
				source,
			})?
		}
	};

	tracing::debug!(
		path = %path.display(),
		rules = config.replacements.len(),
		"parsed theme file"
	);

	Ok(config)
}
