use crate::config::parser::parse_theme_file;
use crate::config::types::LoadedTheme;
use crate::error::{Result, ThemeError};
use std::path::{Path, PathBuf};

/// File names looked up during discovery, in preference order.
pub const THEME_FILE_NAMES: [&str; 2] = [".clitheme.json", ".clitheme.toml"];

/// Find the theme file that applies to `start_dir`.
///
/// The lookup order is:
/// 1. Start from `start_dir` and look for `.clitheme.json` / `.clitheme.toml`
/// 2. Otherwise, continue up the directory tree
/// 3. Finally, check the same names in the home directory
///
/// The nearest file wins; themes are never merged.
pub fn discover_theme(start_dir: &Path) -> Option<PathBuf> {
	discover_theme_from(start_dir, dirs::home_dir().as_deref())
}

/// Same as [`discover_theme`] with an explicit home directory, if any.
fn discover_theme_from(start_dir: &Path, home_dir: Option<&Path>) -> Option<PathBuf> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		if let Some(found) = theme_in_dir(dir) {
			return Some(found);
		}
		current_dir = dir.parent();
	}

	home_dir.and_then(theme_in_dir)
}

fn theme_in_dir(dir: &Path) -> Option<PathBuf> {
	THEME_FILE_NAMES
		.iter()
		.map(|name| dir.join(name))
		.find(|candidate| candidate.is_file())
}

/// Load the theme at `explicit`, or discover one starting from `start_dir`.
pub fn load_theme(explicit: Option<&Path>, start_dir: &Path) -> Result<LoadedTheme> {
	load_theme_from(explicit, start_dir, dirs::home_dir().as_deref())
}

fn load_theme_from(
	explicit: Option<&Path>,
	start_dir: &Path,
	home_dir: Option<&Path>,
) -> Result<LoadedTheme> {
	let path = match explicit {
		Some(path) => path.to_path_buf(),
		None => discover_theme_from(start_dir, home_dir).ok_or_else(|| ThemeError::NoThemeFound {
			start: start_dir.to_path_buf(),
		})?,
	};

	tracing::info!(path = %path.display(), "loading theme");
	let config = parse_theme_file(&path)?;
	Ok(LoadedTheme { config, path })
}
