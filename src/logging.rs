//! Logging setup for the clitheme binary.
//!
//! Diagnostics go to stderr, interleaved with the wrapped command's own
//! stderr, so the format is kept to a bare level and message.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

/// Initialize tracing. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.without_time()
		.with_target(verbose >= 2)
		.try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_log_level() {
		assert_eq!(log_level(0), "warn");
		assert_eq!(log_level(1), "info");
		assert_eq!(log_level(2), "debug");
		assert_eq!(log_level(3), "trace");
		assert_eq!(log_level(9), "trace");
	}
}
