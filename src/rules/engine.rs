use crate::error::TransformError;
use crate::rules::compiler::RuleSet;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Case-folded basename of the wrapped program, used to scope rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandContext(String);

impl CommandContext {
	/// Derive the context from `argv[0]`.
	pub fn from_program(program: &str) -> Self {
		let name = Path::new(program)
			.file_name()
			.map(|name| name.to_string_lossy())
			.unwrap_or(Cow::Borrowed(program));
		CommandContext(name.to_lowercase())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for CommandContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Apply every eligible rule to `line`, in order.
///
/// Each rule sees the output of the previous one. Rules scoped to other
/// commands or another locale are skipped.
pub fn apply(
	line: &str,
	command: &CommandContext,
	locale: &str,
	rules: &RuleSet,
) -> Result<String, TransformError> {
	let mut text = Cow::Borrowed(line);

	for rule in rules {
		if !rule.applies_to(command.as_str(), locale) {
			continue;
		}
		if let Some(ref group) = rule.unknown_group
			&& rule.pattern.is_match(&text)
		{
			return Err(TransformError::UnknownGroup {
				pattern: rule.pattern.as_str().to_string(),
				group: group.clone(),
			});
		}
		let replaced = match rule.pattern.replace_all(&text, rule.replacement.as_str()) {
			Cow::Owned(replaced) => Some(replaced),
			Cow::Borrowed(_) => None,
		};
		if let Some(replaced) = replaced {
			text = Cow::Owned(replaced);
		}
	}

	Ok(text.into_owned())
}

/// Rewrites lines for one launched command.
///
/// Cheap to clone; every clone shares the same compiled rules.
#[derive(Debug, Clone)]
pub struct LineRewriter {
	rules: Arc<RuleSet>,
	command: CommandContext,
	locale: Arc<str>,
}

impl LineRewriter {
	pub fn new(rules: Arc<RuleSet>, command: CommandContext, locale: &str) -> Self {
		LineRewriter {
			rules,
			command,
			locale: Arc::from(locale),
		}
	}

	pub fn command(&self) -> &CommandContext {
		&self.command
	}

	pub fn rewrite(&self, line: &str) -> Result<String, TransformError> {
		apply(line, &self.command, &self.locale, &self.rules)
	}
}
