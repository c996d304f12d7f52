use crate::rules::CommandContext;
use std::collections::HashSet;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Interpreters that get their stdin fed line by line when no override is configured.
pub const DEFAULT_INTERACTIVE_COMMANDS: [&str; 7] =
	["python", "python3", "ipython", "bash", "sh", "cmd", "zsh"];

/// The set of command names launched in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveShells {
	names: HashSet<String>,
}

impl Default for InteractiveShells {
	fn default() -> Self {
		InteractiveShells::new(DEFAULT_INTERACTIVE_COMMANDS)
	}
}

impl InteractiveShells {
	/// Build a set from command names. Names are case-folded.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		InteractiveShells {
			names: names.into_iter().map(|n| n.as_ref().to_lowercase()).collect(),
		}
	}

	/// A set that never matches.
	pub fn none() -> Self {
		InteractiveShells {
			names: HashSet::new(),
		}
	}

	pub fn is_interactive(&self, command: &CommandContext) -> bool {
		self.names.contains(command.as_str())
	}
}

/// How the interactivity decision is made for a launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractiveMode {
	/// Decide from the command name.
	#[default]
	Auto,
	Always,
	Never,
}

/// Why input forwarding was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	ChildExited,
	Interrupted,
}

/// How an input forwarding loop ended. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
	/// The parent's input reached end-of-file (or could not be read).
	EndOfInput,
	/// The child stopped accepting input.
	SinkClosed,
	/// `stop` resolved first.
	Stopped(StopReason),
}

/// Forward `input` to `sink` one line at a time until input ends, the sink
/// breaks, or `stop` resolves.
///
/// Every line is written with its terminator and flushed immediately. A final
/// line without a newline gets one.
pub async fn forward_input<R, W, S>(mut input: R, mut sink: W, stop: S) -> ForwardOutcome
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
	S: Future<Output = StopReason>,
{
	tokio::pin!(stop);
	let mut line = Vec::new();

	loop {
		tokio::select! {
			reason = &mut stop => return ForwardOutcome::Stopped(reason),
			read = input.read_until(b'\n', &mut line) => {
				match read {
					Ok(0) => return ForwardOutcome::EndOfInput,
					Ok(_) => {}
					Err(err) => {
						tracing::warn!("reading input failed, no longer forwarding: {err}");
						return ForwardOutcome::EndOfInput;
					}
				}

				if !line.ends_with(b"\n") {
					line.push(b'\n');
				}
				if let Err(err) = write_flushed(&mut sink, &line).await {
					tracing::debug!("child stdin closed: {err}");
					return ForwardOutcome::SinkClosed;
				}
				line.clear();
			}
		}
	}
}

async fn write_flushed<W>(sink: &mut W, bytes: &[u8]) -> std::io::Result<()>
where
	W: AsyncWrite + Unpin,
{
	sink.write_all(bytes).await?;
	sink.flush().await
}
