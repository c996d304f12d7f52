#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn clitheme_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("clitheme").unwrap();
	cmd.env_remove("CLITHEME_CONFIG")
		.env_remove("CLITHEME_LOCALE")
		.env_remove("RUST_LOG");
	cmd
}

/// Write `content` as a theme file named `name` in `dir`.
fn write_theme(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
	let path = dir.path().join(name);
	fs::write(&path, content).unwrap();
	path
}

const ERROR_THEME: &str = r#"
{
	"replacements": [
		{ "pattern": "error", "replacement": "ERR", "locale": "default", "filter_commands": [] }
	]
}
"#;

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	clitheme_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("theming the console output"));
}

#[test]
fn test_version_flag() {
	clitheme_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("clitheme"));
}

#[test]
fn test_no_args_shows_help() {
	clitheme_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_command() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.assert()
		.failure()
		.stderr(predicate::str::contains("No command given"));
}

// ============================================================================
// Theme loading tests
// ============================================================================

#[test]
fn test_missing_theme_file() {
	clitheme_cmd()
		.args(["--apply", "/nonexistent/theme.json", "echo", "hi"])
		.assert()
		.code(1)
		.stdout(predicate::str::is_empty())
		.stderr(predicate::str::contains("Theme file not found"));
}

#[test]
fn test_malformed_theme_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", r#"{ "rules": [] }"#);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "hi"])
		.assert()
		.code(1)
		.stderr(predicate::str::contains("Failed to parse JSON theme file"))
		.stderr(predicate::str::contains("missing field `replacements`"));
}

#[test]
fn test_check_reports_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"{ "replacements": [
			{ "pattern": "error", "replacement": "ERR", "filter_commands": ["Make"] },
			{ "pattern": "warn", "replacement": "WARN", "locale": "en" }
		] }"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("--check")
		.assert()
		.success()
		.stdout(predicate::str::contains("2 rules loaded, 0 skipped"))
		.stdout(predicate::str::contains("filter_commands: make"))
		.stdout(predicate::str::contains("locale: en"));
}

#[test]
fn test_check_fails_on_skipped_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[ { "pattern": "(", "replacement": "x" }, { "pattern": "ok" } ]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("--check")
		.assert()
		.failure()
		.stdout(predicate::str::contains("0 rules loaded, 2 skipped"))
		.stderr(predicate::str::contains("Invalid regex pattern in rule: ("))
		.stderr(predicate::str::contains("missing required field 'replacement'"));
}

#[test]
fn test_discovers_theme_in_current_dir() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_theme(&temp_dir, ".clitheme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--check")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(".clitheme.json"))
		.stdout(predicate::str::contains("1 rules loaded"));
}

#[test]
fn test_theme_path_from_env() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "env-theme.json", ERROR_THEME);

	clitheme_cmd()
		.env("CLITHEME_CONFIG", &theme)
		.arg("--check")
		.assert()
		.success()
		.stdout(predicate::str::contains("env-theme.json"));
}

// ============================================================================
// Command execution tests (Unix only - these use Unix commands)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_command_not_found() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("nonexistent_command_12345")
		.assert()
		.code(127)
		.stdout(predicate::str::is_empty())
		.stderr(predicate::str::contains("not found"));
}

#[cfg(unix)]
#[test]
fn test_replaces_stdout() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["--", "echo", "an error occurred"])
		.assert()
		.success()
		.stdout("an ERR occurred\n");
}

#[cfg(unix)]
#[test]
fn test_rules_apply_in_order() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[ { "pattern": "a", "replacement": "b" }, { "pattern": "b", "replacement": "c" } ]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "a"])
		.assert()
		.success()
		.stdout("c\n");
}

#[cfg(unix)]
#[test]
fn test_replaces_stderr() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["--no-interactive", "sh", "-c", "echo fatal error >&2"])
		.assert()
		.success()
		.stdout(predicate::str::is_empty())
		.stderr(predicate::str::contains("fatal ERR"));
}

#[cfg(unix)]
#[test]
fn test_filter_commands_scope_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[
			{ "pattern": "hello", "replacement": "scoped", "filter_commands": ["foo"] },
			{ "pattern": "world", "replacement": "everyone", "filter_commands": ["ECHO"] }
		]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "hello world"])
		.assert()
		.success()
		.stdout("hello everyone\n");
}

#[cfg(unix)]
#[test]
fn test_locale_scopes_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[
			{ "pattern": "hello", "replacement": "bonjour", "locale": "fr" },
			{ "pattern": "hello", "replacement": "hi" }
		]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "hello"])
		.assert()
		.success()
		.stdout("hi\n");

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["--locale", "fr", "echo", "hello"])
		.assert()
		.success()
		.stdout("bonjour\n");

	clitheme_cmd()
		.env("CLITHEME_LOCALE", "fr")
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "hello"])
		.assert()
		.success()
		.stdout("bonjour\n");
}

#[cfg(unix)]
#[test]
fn test_capture_group_replacement() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[ { "pattern": "(\\w+)Error: (.*)", "replacement": "[$1] $2" } ]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "NameError: name 'x' is not defined"])
		.assert()
		.success()
		.stdout("[Name] name 'x' is not defined\n");
}

#[cfg(unix)]
#[test]
fn test_bad_template_fails_open() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[ { "pattern": "error", "replacement": "${5}" } ]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "an error occurred"])
		.assert()
		.success()
		.stdout("an error occurred\n")
		.stderr(predicate::str::contains("passing it through"));
}

#[cfg(unix)]
#[test]
fn test_invalid_rule_is_skipped_not_fatal() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.json",
		r#"[
			{ "pattern": "[unclosed", "replacement": "x" },
			{ "pattern": "error", "replacement": "ERR" }
		]"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["echo", "error"])
		.assert()
		.success()
		.stdout("ERR\n")
		.stderr(predicate::str::contains("skipping invalid rule"));
}

#[cfg(unix)]
#[test]
fn test_exit_code_propagates() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("false")
		.assert()
		.code(1);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["sh", "-c", "exit 42"])
		.assert()
		.code(42);
}

#[cfg(unix)]
#[test]
fn test_undecodable_output_is_replaced() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["printf", "\\377 error\\n"])
		.assert()
		.success()
		.stdout("\u{FFFD} ERR\n");
}

#[cfg(unix)]
#[test]
fn test_interactive_shell_receives_stdin() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("sh")
		.write_stdin("echo an error\nexit 7\n")
		.assert()
		.code(7)
		.stdout("an ERR\n");
}

#[cfg(unix)]
#[test]
fn test_forced_interactive_mode() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(&temp_dir, "theme.json", ERROR_THEME);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.args(["--interactive", "cat"])
		.write_stdin("one error\ntwo errors\n")
		.assert()
		.success()
		.stdout("one ERR\ntwo ERRs\n");
}

#[cfg(unix)]
#[test]
fn test_theme_overrides_interactive_commands() {
	let temp_dir = tempfile::tempdir().unwrap();
	let theme = write_theme(
		&temp_dir,
		"theme.toml",
		r#"
interactive_commands = ["cat"]

[[replacements]]
pattern = "error"
replacement = "ERR"
"#,
	);

	clitheme_cmd()
		.arg("--apply")
		.arg(&theme)
		.arg("cat")
		.write_stdin("an error\n")
		.assert()
		.success()
		.stdout("an ERR\n");
}
