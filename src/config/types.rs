use serde::Deserialize;
use std::path::PathBuf;

/// Locale used by rules that don't declare one.
pub const DEFAULT_LOCALE: &str = "default";

/// Top-level contents of a theme file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
	/// Replacement rules, applied in declaration order.
	pub replacements: Vec<RuleRecord>,

	/// Overrides the built-in list of interpreters launched in interactive mode.
	#[serde(default)]
	pub interactive_commands: Option<Vec<String>>,
}

/// A raw replacement rule as written in the theme file.
///
/// `pattern` and `replacement` are optional here so that an incomplete rule
/// can be skipped by the compiler instead of rejecting the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleRecord {
	/// Regex pattern matched against each output line.
	#[serde(default)]
	pub pattern: Option<String>,

	/// Replacement template. Supports `$1` / `${name}` capture references.
	#[serde(default)]
	pub replacement: Option<String>,

	/// Locale this rule belongs to. Defaults to "default".
	#[serde(default)]
	pub locale: Option<String>,

	/// Command names (basenames) this rule is limited to. Empty means all.
	#[serde(default)]
	pub filter_commands: Vec<String>,
}

impl RuleRecord {
	/// The rule's locale, falling back to the default one.
	pub fn locale(&self) -> &str {
		self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
	}
}

/// Theme file format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeFormat {
	Json,
	Toml,
}

impl ThemeFormat {
	/// Guess the format from a path. Anything that isn't `.toml` is JSON.
	pub fn from_path(path: &std::path::Path) -> Self {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("toml") => ThemeFormat::Toml,
			_ => ThemeFormat::Json,
		}
	}
}

/// A loaded theme with the path it came from.
#[derive(Debug, Clone)]
pub struct LoadedTheme {
	/// The parsed theme.
	pub config: ThemeConfig,

	/// The path this theme was loaded from.
	pub path: PathBuf,
}
