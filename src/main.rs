use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clitheme::config::{DEFAULT_LOCALE, LoadedTheme, load_theme};
use clitheme::exec::{EXIT_LAUNCH_FAILURE, InteractiveMode, InteractiveShells, Supervisor};
use clitheme::logging::init_logging;
use clitheme::rules::{Compilation, compile_rules, error_chain};

#[derive(Parser)]
#[command(name = "clitheme")]
#[command(
	author,
	version,
	about = "CLI tool for theming the console output of other commands"
)]
#[command(arg_required_else_help = true)]
#[command(
	after_help = "Examples:\n  clitheme --apply theme.json -- python3 script.py\n  clitheme -a theme.json python3 -i"
)]
struct Cli {
	/// Theme file with replacement rules (JSON or TOML). Discovered from .clitheme.* if omitted
	#[arg(short, long, value_name = "FILE", env = "CLITHEME_CONFIG")]
	apply: Option<PathBuf>,

	/// Locale whose rules are applied
	#[arg(short, long, default_value = DEFAULT_LOCALE, env = "CLITHEME_LOCALE")]
	locale: String,

	/// Always forward stdin line by line through a shell
	#[arg(long, conflicts_with = "no_interactive")]
	interactive: bool,

	/// Never treat the command as interactive
	#[arg(long)]
	no_interactive: bool,

	/// How long to wait for output to drain after the command exits
	#[arg(long, value_name = "MS", default_value_t = 2000)]
	drain_timeout_ms: u64,

	/// Load and compile the theme, report problems, and exit
	#[arg(long)]
	check: bool,

	/// Increase log verbosity (-v, -vv, -vvv)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Command to run through clitheme
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	command: Vec<String>,
}

impl Cli {
	fn interactive_mode(&self) -> InteractiveMode {
		if self.interactive {
			InteractiveMode::Always
		} else if self.no_interactive {
			InteractiveMode::Never
		} else {
			InteractiveMode::Auto
		}
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if !cli.check && cli.command.is_empty() {
		anyhow::bail!("No command given. Usage: clitheme --apply <FILE> -- <COMMAND>...");
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let theme = load_theme(cli.apply.as_deref(), &cwd).context("Failed to load theme")?;
	let compiled = compile_rules(&theme.config.replacements);

	if cli.check {
		return Ok(handle_check(&theme, &compiled));
	}

	handle_command(&cli, &theme, compiled)
}

fn handle_check(theme: &LoadedTheme, compiled: &Compilation) -> ExitCode {
	println!("Theme: {}", theme.path.display());
	println!(
		"{} rules loaded, {} skipped",
		compiled.rules.len(),
		compiled.rejected.len()
	);
	println!();

	for (i, rule) in compiled.rules.iter().enumerate() {
		println!("  Rule {}:", i + 1);
		println!("    pattern: {}", rule.pattern.as_str());
		println!("    replacement: {}", rule.replacement);
		println!("    locale: {}", rule.locale);
		if !rule.commands.is_empty() {
			let mut commands: Vec<_> = rule.commands.iter().map(String::as_str).collect();
			commands.sort_unstable();
			println!("    filter_commands: {}", commands.join(", "));
		}
		if let Some(ref group) = rule.unknown_group {
			println!("    warning: unknown capture group '{}'", group);
		}
	}

	for err in &compiled.rejected {
		eprintln!("Skipped: {}", error_chain(err));
	}

	if compiled.rejected.is_empty() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

fn handle_command(cli: &Cli, theme: &LoadedTheme, compiled: Compilation) -> Result<ExitCode> {
	let shells = theme
		.config
		.interactive_commands
		.as_ref()
		.map(InteractiveShells::new)
		.unwrap_or_default();

	let supervisor = Supervisor::new(Arc::new(compiled.rules), cli.locale.as_str())
		.with_interactive_shells(shells)
		.with_interactive_mode(cli.interactive_mode())
		.with_drain_timeout(Duration::from_millis(cli.drain_timeout_ms));

	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()
		.context("Failed to start async runtime")?;

	let code = runtime.block_on(supervisor.run(&cli.command));

	// A blocking read of our stdin may still be pending; don't wait for it.
	runtime.shutdown_timeout(Duration::from_millis(100));

	Ok(ExitCode::from(
		u8::try_from(code).unwrap_or(EXIT_LAUNCH_FAILURE as u8),
	))
}
