use crate::config::types::RuleRecord;
use crate::error::{Result, ThemeError};
use regex::Regex;
use std::collections::HashSet;

/// A compiled replacement rule ready to be applied to output lines.
#[derive(Debug, Clone)]
pub struct Rule {
	/// Compiled pattern.
	pub pattern: Regex,

	/// Replacement template, may reference capture groups.
	pub replacement: String,

	/// Locale this rule fires in.
	pub locale: String,

	/// Lowercased command names this rule is limited to. Empty means all.
	pub commands: HashSet<String>,

	/// First capture group the template references that the pattern lacks.
	pub unknown_group: Option<String>,
}

impl Rule {
	/// Compile a single rule record. `index` is used for diagnostics only.
	pub fn from_record(index: usize, record: &RuleRecord) -> Result<Self> {
		let pattern_str = non_empty(record.pattern.as_deref())
			.ok_or(ThemeError::MissingField { index, field: "pattern" })?;
		let replacement = non_empty(record.replacement.as_deref()).ok_or(
			ThemeError::MissingField {
				index,
				field: "replacement",
			},
		)?;

		let pattern = Regex::new(pattern_str).map_err(|source| ThemeError::InvalidRegex {
			pattern: pattern_str.to_string(),
			source,
		})?;

		let unknown_group = find_unknown_group(&pattern, replacement);
		if let Some(ref group) = unknown_group {
			tracing::warn!(
				pattern = pattern_str,
				group = group.as_str(),
				"replacement references a capture group the pattern does not define; matching lines will be left unchanged"
			);
		}

		Ok(Rule {
			pattern,
			replacement: replacement.to_string(),
			locale: record.locale().to_string(),
			commands: record
				.filter_commands
				.iter()
				.map(|cmd| cmd.to_lowercase())
				.collect(),
			unknown_group,
		})
	}

	/// Whether this rule is eligible for the given command and locale.
	pub fn applies_to(&self, command: &str, locale: &str) -> bool {
		(self.commands.is_empty() || self.commands.contains(command)) && self.locale == locale
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

/// Ordered collection of compiled rules. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	rules: Vec<Rule>,
}

impl RuleSet {
	pub fn new(rules: Vec<Rule>) -> Self {
		RuleSet { rules }
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
		self.rules.iter()
	}
}

impl<'a> IntoIterator for &'a RuleSet {
	type Item = &'a Rule;
	type IntoIter = std::slice::Iter<'a, Rule>;

	fn into_iter(self) -> Self::IntoIter {
		self.rules.iter()
	}
}

/// Result of compiling a theme's rule records.
#[derive(Debug, Default)]
pub struct Compilation {
	/// Rules that compiled, in declaration order.
	pub rules: RuleSet,

	/// Records that were skipped, with the reason.
	pub rejected: Vec<ThemeError>,
}

/// Compile all rule records, skipping (and logging) the invalid ones.
pub fn compile_rules(records: &[RuleRecord]) -> Compilation {
	let mut rules = Vec::with_capacity(records.len());
	let mut rejected = Vec::new();

	for (index, record) in records.iter().enumerate() {
		match Rule::from_record(index, record) {
			Ok(rule) => rules.push(rule),
			Err(err) => {
				tracing::warn!("skipping invalid rule: {}", error_chain(&err));
				rejected.push(err);
			}
		}
	}

	tracing::debug!(
		compiled = rules.len(),
		skipped = rejected.len(),
		"compiled replacement rules"
	);

	Compilation {
		rules: RuleSet::new(rules),
		rejected,
	}
}

/// Render an error together with its sources on one line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

/// Scan a replacement template for `$name` / `${name}` references and return
/// the first one that `pattern` cannot satisfy.
///
/// Follows the reference syntax of `regex::Captures::expand`: `$$` is a
/// literal dollar, a bare name is the longest run of `[_0-9A-Za-z]`, and an
/// all-digit name is a group index.
fn find_unknown_group(pattern: &Regex, template: &str) -> Option<String> {
	let names: HashSet<&str> = pattern.capture_names().flatten().collect();
	let bytes = template.as_bytes();
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] != b'$' {
			i += 1;
			continue;
		}
		i += 1;
		if i >= bytes.len() {
			break;
		}
		if bytes[i] == b'$' {
			i += 1;
			continue;
		}

		let name = if bytes[i] == b'{' {
			match template[i + 1..].find('}') {
				Some(end) => {
					let name = &template[i + 1..i + 1 + end];
					i += end + 2;
					name
				}
				None => continue,
			}
		} else {
			let start = i;
			while i < bytes.len() && (bytes[i] == b'_' || bytes[i].is_ascii_alphanumeric()) {
				i += 1;
			}
			&template[start..i]
		};

		if name.is_empty() {
			continue;
		}

		let known = match name.parse::<usize>() {
			Ok(index) => index < pattern.captures_len(),
			Err(_) => names.contains(name),
		};
		if !known {
			return Some(name.to_string());
		}
	}

	None
}
