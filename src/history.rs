use crate::{config::LauncherConfig, menu::Session};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub const HISTORY_FILE: &str = "launcher_history.txt";

/// History lives beside the settings file.
pub fn history_path(settings_path: &Path) -> PathBuf {
    match settings_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(HISTORY_FILE),
        _ => PathBuf::from(HISTORY_FILE),
    }
}

/// Mod, level and mutator codes joined by single spaces.
pub fn summary_line(config: &LauncherConfig, session: &Session) -> String {
    session.codes(config).join(" ")
}

pub fn append_history(path: &Path, line: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open history file {}", path.display()))?;
    writeln!(file, "{line}").context("write history line")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_sits_next_to_settings() {
        assert_eq!(
            history_path(Path::new("/games/doom/DoomSettings.json")),
            PathBuf::from("/games/doom/launcher_history.txt")
        );
        assert_eq!(
            history_path(Path::new("DoomSettings.json")),
            PathBuf::from(HISTORY_FILE)
        );
    }
}
