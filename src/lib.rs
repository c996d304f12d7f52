//! clitheme - CLI tool for theming the console output of other commands.
//!
//! This library provides the core functionality for clitheme, including:
//! - Theme file parsing and discovery
//! - Rule compilation and line rewriting
//! - Concurrent, line-by-line transformation of a child's stdout and stderr
//! - Command supervision with stdin forwarding and exit code propagation
//!
//! # Example
//!
//! ```no_run
//! use clitheme::config::load_theme;
//! use clitheme::exec::Supervisor;
//! use clitheme::rules::compile_rules;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let theme = load_theme(Some(Path::new("theme.json")), Path::new(".")).unwrap();
//! let compiled = compile_rules(&theme.config.replacements);
//!
//! let supervisor = Supervisor::new(Arc::new(compiled.rules), "default");
//! let argv = vec!["cargo".to_string(), "build".to_string()];
//! let code = supervisor.run(&argv).await;
//! std::process::exit(code);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod rules;
pub mod stream;

pub use error::{Result, ThemeError, TransformError};
