use std::path::PathBuf;

/// Library-level structured errors for clitheme.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
	#[error("Theme file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read theme file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse JSON theme file: {path}")]
	JsonParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to parse TOML theme file: {path}")]
	TomlParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("No theme file found (searched from {start} upward and the home directory)")]
	NoThemeFound { start: PathBuf },

	#[error("Rule #{index} is missing required field '{field}'")]
	MissingField { index: usize, field: &'static str },

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("No command given to run")]
	EmptyCommand,

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },
}

/// A per-line failure raised while rewriting text.
///
/// These never abort a stream: the transformer forwards the original line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
	#[error("replacement for pattern '{pattern}' references unknown group '{group}'")]
	UnknownGroup { pattern: String, group: String },
}

/// Result type alias using ThemeError.
pub type Result<T> = std::result::Result<T, ThemeError>;
