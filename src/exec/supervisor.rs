use crate::error::{Result, ThemeError};
use crate::exec::interactive::{InteractiveMode, InteractiveShells, StopReason, forward_input};
use crate::rules::{CommandContext, LineRewriter, RuleSet, error_chain};
use crate::stream::{StreamKind, TransformSummary, spawn_transformer};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Exit code reported when the command can't be found.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Exit code reported for any other failure to launch.
pub const EXIT_LAUNCH_FAILURE: i32 = 1;

/// How long each transformer gets to finish after the child exits.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Lifecycle of one supervised launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Launching,
	Running,
	Draining,
	Terminated,
}

impl Phase {
	fn enter(self, command: &CommandContext) {
		tracing::debug!(command = command.as_str(), "supervisor: {:?}", self);
	}
}

/// Map a launch error to the exit code reported for it.
pub fn exit_code_for(err: &ThemeError) -> i32 {
	match err {
		ThemeError::CommandNotFound { .. } => EXIT_COMMAND_NOT_FOUND,
		_ => EXIT_LAUNCH_FAILURE,
	}
}

/// Turn a child's exit status into a process exit code.
///
/// On Unix a child killed by a signal reports `128 + signal`, as shells do.
pub fn exit_code_of(status: ExitStatus) -> i32 {
	if let Some(code) = status.code() {
		return code;
	}

	#[cfg(unix)]
	{
		use std::os::unix::process::ExitStatusExt;
		if let Some(signal) = status.signal() {
			return 128 + signal;
		}
	}

	EXIT_LAUNCH_FAILURE
}

/// Launches a command and themes its output until it exits.
#[derive(Debug, Clone)]
pub struct Supervisor {
	rules: Arc<RuleSet>,
	locale: String,
	shells: InteractiveShells,
	mode: InteractiveMode,
	drain_timeout: Duration,
}

impl Supervisor {
	pub fn new(rules: Arc<RuleSet>, locale: impl Into<String>) -> Self {
		Supervisor {
			rules,
			locale: locale.into(),
			shells: InteractiveShells::default(),
			mode: InteractiveMode::Auto,
			drain_timeout: DEFAULT_DRAIN_TIMEOUT,
		}
	}

	pub fn with_interactive_shells(mut self, shells: InteractiveShells) -> Self {
		self.shells = shells;
		self
	}

	pub fn with_interactive_mode(mut self, mode: InteractiveMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
		self.drain_timeout = timeout;
		self
	}

	/// Whether `command` will be launched interactively.
	pub fn is_interactive(&self, command: &CommandContext) -> bool {
		match self.mode {
			InteractiveMode::Auto => self.shells.is_interactive(command),
			InteractiveMode::Always => true,
			InteractiveMode::Never => false,
		}
	}

	/// Run `argv` attached to the real stdin, stdout and stderr.
	pub async fn run(&self, argv: &[String]) -> i32 {
		self.run_with(argv, tokio::io::stdin(), tokio::io::stdout(), tokio::io::stderr())
			.await
	}

	/// Run `argv`, reading forwarded input from `input` and writing themed
	/// output to `stdout` / `stderr`. Returns the exit code to report.
	pub async fn run_with<I, O, E>(&self, argv: &[String], input: I, stdout: O, stderr: E) -> i32
	where
		I: AsyncRead + Unpin,
		O: AsyncWrite + Unpin + Send + 'static,
		E: AsyncWrite + Unpin + Send + 'static,
	{
		match self.supervise(argv, input, stdout, stderr).await {
			Ok(code) => code,
			Err(err) => {
				tracing::error!("{}", error_chain(&err));
				exit_code_for(&err)
			}
		}
	}

	async fn supervise<I, O, E>(&self, argv: &[String], input: I, stdout: O, stderr: E) -> Result<i32>
	where
		I: AsyncRead + Unpin,
		O: AsyncWrite + Unpin + Send + 'static,
		E: AsyncWrite + Unpin + Send + 'static,
	{
		let program = argv.first().ok_or(ThemeError::EmptyCommand)?;
		let command = CommandContext::from_program(program);
		Phase::Launching.enter(&command);

		let interactive = self.is_interactive(&command);
		let mut child = spawn_child(argv, interactive)?;
		Phase::Running.enter(&command);

		let child_stdout = child.stdout.take().ok_or_else(|| missing_pipe(program, "stdout"))?;
		let child_stderr = child.stderr.take().ok_or_else(|| missing_pipe(program, "stderr"))?;

		let rewriter = LineRewriter::new(Arc::clone(&self.rules), command.clone(), &self.locale);
		let stdout_task = spawn_transformer(child_stdout, stdout, rewriter.clone(), StreamKind::Stdout);
		let stderr_task = spawn_transformer(child_stderr, stderr, rewriter, StreamKind::Stderr);

		if let Some(child_stdin) = child.stdin.take() {
			let outcome =
				forward_input(BufReader::new(input), child_stdin, exit_or_interrupt(&mut child)).await;
			tracing::debug!(command = command.as_str(), "input forwarding ended: {:?}", outcome);
		}

		Phase::Draining.enter(&command);
		let status = child.wait().await.map_err(|source| ThemeError::CommandFailed {
			command: program.clone(),
			source,
		})?;

		let (out, err) = tokio::join!(
			self.drain(stdout_task, StreamKind::Stdout),
			self.drain(stderr_task, StreamKind::Stderr),
		);
		tracing::debug!(
			stdout_lines = out.map(|s| s.lines),
			stderr_lines = err.map(|s| s.lines),
			"transformers drained"
		);

		Phase::Terminated.enter(&command);
		let code = exit_code_of(status);
		tracing::debug!(command = command.as_str(), code, "command exited");
		Ok(code)
	}

	/// Wait for a transformer to finish, giving up after the drain timeout.
	async fn drain(&self, task: JoinHandle<TransformSummary>, kind: StreamKind) -> Option<TransformSummary> {
		let abort = task.abort_handle();
		match tokio::time::timeout(self.drain_timeout, task).await {
			Ok(Ok(summary)) => Some(summary),
			Ok(Err(err)) => {
				tracing::warn!(stream = kind.as_str(), "transformer task failed: {err}");
				None
			}
			Err(_) => {
				tracing::debug!(
					stream = kind.as_str(),
					"stream still open after {:?}, abandoning it",
					self.drain_timeout
				);
				abort.abort();
				None
			}
		}
	}
}

/// Build the command for `argv`.
///
/// Interactive commands are re-run through the platform shell as a single
/// quoted command line with a piped stdin; everything else runs directly and
/// inherits stdin.
fn build_command(argv: &[String], interactive: bool) -> Command {
	let mut cmd = if interactive {
		let line = shell_words::join(argv);
		let mut shell = shell_command();
		shell.arg(line);
		shell
	} else {
		let mut direct = Command::new(&argv[0]);
		direct.args(&argv[1..]);
		direct
	};

	cmd.stdin(if interactive {
		Stdio::piped()
	} else {
		Stdio::inherit()
	})
	.stdout(Stdio::piped())
	.stderr(Stdio::piped())
	.kill_on_drop(true);

	cmd
}

#[cfg(unix)]
fn shell_command() -> Command {
	let mut cmd = Command::new("sh");
	cmd.arg("-c");
	cmd
}

#[cfg(windows)]
fn shell_command() -> Command {
	let mut cmd = Command::new("cmd");
	cmd.arg("/C");
	cmd
}

fn spawn_child(argv: &[String], interactive: bool) -> Result<Child> {
	tracing::debug!(?argv, interactive, "spawning command");
	build_command(argv, interactive).spawn().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			ThemeError::CommandNotFound {
				command: argv[0].clone(),
			}
		} else {
			ThemeError::CommandFailed {
				command: argv[0].clone(),
				source,
			}
		}
	})
}

fn missing_pipe(program: &str, stream: &str) -> ThemeError {
	ThemeError::CommandFailed {
		command: program.to_string(),
		source: std::io::Error::other(format!("{stream} was not captured")),
	}
}

/// Resolves when the child exits or the user interrupts.
///
/// The interrupt only ends forwarding; the child decides for itself what to
/// do with the signal.
async fn exit_or_interrupt(child: &mut Child) -> StopReason {
	let interrupted = async {
		if tokio::signal::ctrl_c().await.is_err() {
			std::future::pending::<()>().await;
		}
	};

	tokio::select! {
		_ = child.wait() => StopReason::ChildExited,
		_ = interrupted => {
			tracing::info!("interrupted, no longer forwarding input");
			StopReason::Interrupted
		}
	}
}
