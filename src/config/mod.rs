//! Theme loading and parsing for clitheme.
//!
//! This module handles:
//! - JSON and TOML theme file parsing
//! - Directory cascade discovery of `.clitheme.*` files

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{THEME_FILE_NAMES, discover_theme, load_theme};
pub use parser::{parse_theme_file, parse_theme_str};
pub use types::{DEFAULT_LOCALE, LoadedTheme, RuleRecord, ThemeConfig, ThemeFormat};
