//! Command supervision for clitheme.
//!
//! This module handles:
//! - Deciding whether a command runs interactively
//! - Spawning the command with piped output streams
//! - Forwarding stdin to interactive commands
//! - Draining the output transformers and exit code propagation

pub mod interactive;
pub mod supervisor;

pub use interactive::{
	DEFAULT_INTERACTIVE_COMMANDS, ForwardOutcome, InteractiveMode, InteractiveShells, StopReason,
	forward_input,
};
pub use supervisor::{
	DEFAULT_DRAIN_TIMEOUT, EXIT_COMMAND_NOT_FOUND, EXIT_LAUNCH_FAILURE, Supervisor, exit_code_for,
	exit_code_of,
};
