use crate::{
    catalog::{null_as_default, Catalog, Entry},
    error::{ConfigError, LaunchError},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const SETTINGS_VERSION: u32 = 2;
pub const DEFAULT_SETTINGS_FILE: &str = "DoomSettings.json";
const DEFAULT_CATEGORY: &str = "CategoryName";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Executable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
}

impl Executable {
    pub fn has_path(&self) -> bool {
        !self.path.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LauncherConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub executables: Vec<Executable>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mods: Catalog,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mutators: Catalog,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: Catalog,
}

/// v1 layout: flat lists, category stored on each entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LauncherConfigV1 {
    #[serde(default, deserialize_with = "null_as_default")]
    executables: Vec<Executable>,
    #[serde(default, deserialize_with = "null_as_default")]
    mods: Vec<LegacyEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    mutators: Vec<LegacyEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    levels: Vec<LegacyEntry>,
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    #[serde(default, rename = "Category")]
    category: Option<String>,
    #[serde(flatten)]
    entry: Entry,
}

impl From<LauncherConfigV1> for LauncherConfig {
    fn from(v1: LauncherConfigV1) -> Self {
        let group = |entries: Vec<LegacyEntry>| {
            Catalog::from_grouped(entries.into_iter().map(|item| (item.category, item.entry)))
        };
        LauncherConfig {
            executables: v1.executables,
            mods: group(v1.mods),
            mutators: group(v1.mutators),
            levels: group(v1.levels),
        }
    }
}

#[derive(Debug)]
pub struct Loaded {
    pub config: LauncherConfig,
    /// Set when the file was rewritten from an older layout.
    pub migrated_from: Option<u32>,
}

impl LauncherConfig {
    pub fn load(path: &Path) -> Result<Loaded, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (first_line, body) = match raw.split_once('\n') {
            Some((first, rest)) => (first, rest),
            None => (raw.as_str(), ""),
        };
        let parse_err = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let loaded = match parse_version_header(first_line) {
            Some(found) if found > SETTINGS_VERSION => {
                return Err(ConfigError::UnsupportedVersion {
                    path: path.to_path_buf(),
                    found,
                    supported: SETTINGS_VERSION,
                });
            }
            Some(SETTINGS_VERSION) => Loaded {
                config: serde_json::from_str(body).map_err(parse_err)?,
                migrated_from: None,
            },
            Some(_) => Self::migrate_v1(path, body)?,
            None => Self::migrate_v1(path, &raw)?,
        };

        loaded.config.validate()?;
        Ok(loaded)
    }

    fn migrate_v1(path: &Path, body: &str) -> Result<Loaded, ConfigError> {
        let legacy: LauncherConfigV1 =
            serde_json::from_str(body).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let config = LauncherConfig::from(legacy);
        config.validate()?;
        config.save(path)?;
        log::info!("migrated {} from v1 to v{SETTINGS_VERSION}", path.display());
        Ok(Loaded {
            config,
            migrated_from: Some(1),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mods.ensure_unique_codes("Mods")?;
        self.mutators.ensure_unique_codes("Mutators")?;
        self.levels.ensure_unique_codes("Levels")?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, format!("v{SETTINGS_VERSION}\n{json}")).map_err(io_err)?;
        Ok(())
    }

    /// Skeleton written when no settings exist yet.
    pub fn skeleton() -> Self {
        let catalog = || {
            let mut catalog = Catalog::default();
            catalog.push(DEFAULT_CATEGORY, Entry::default());
            catalog
        };
        LauncherConfig {
            executables: vec![Executable::default()],
            mods: catalog(),
            mutators: catalog(),
            levels: catalog(),
        }
    }

    pub fn create_default(path: &Path) -> Result<(), ConfigError> {
        Self::skeleton().save(path)
    }

    /// By code when given, else the first executable with a path.
    pub fn select_executable(&self, code: Option<&str>) -> Result<&Executable, LaunchError> {
        match code {
            Some(code) => self
                .executables
                .iter()
                .find(|exe| exe.code.trim().eq_ignore_ascii_case(code.trim()))
                .filter(|exe| exe.has_path())
                .ok_or_else(|| LaunchError::UnknownExecutable(code.to_string())),
            None => self
                .executables
                .iter()
                .find(|exe| exe.has_path())
                .ok_or(LaunchError::NoExecutable),
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILE)
}

fn parse_version_header(line: &str) -> Option<u32> {
    let line = line.trim().trim_start_matches('\u{feff}');
    let digits = line.strip_prefix('v').or_else(|| line.strip_prefix('V'))?;
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_header() {
        assert_eq!(parse_version_header("v2"), Some(2));
        assert_eq!(parse_version_header("V13\r"), Some(13));
        assert_eq!(parse_version_header("{"), None);
        assert_eq!(parse_version_header("v"), None);
        assert_eq!(parse_version_header("version"), None);
    }

    #[test]
    fn executable_selection() {
        let mut config = LauncherConfig::skeleton();
        assert!(matches!(
            config.select_executable(None),
            Err(LaunchError::NoExecutable)
        ));
        config.executables.push(Executable {
            code: "GZ".to_string(),
            description: "GZDoom".to_string(),
            path: "/usr/bin/gzdoom".to_string(),
        });
        assert_eq!(config.select_executable(None).map(|e| e.code.as_str()).ok(), Some("GZ"));
        assert_eq!(
            config.select_executable(Some("gz")).map(|e| e.code.as_str()).ok(),
            Some("GZ")
        );
        assert!(matches!(
            config.select_executable(Some("zan")),
            Err(LaunchError::UnknownExecutable(_))
        ));
    }

    #[test]
    fn v1_entries_group_by_category() {
        let raw = r#"{
            "Executables": [{"Code": "GZ", "Path": "gz.exe"}],
            "Mods": [
                {"Code": "BD", "Category": "Brutal"},
                {"Code": "PB", "Category": null},
                {"Code": "BDX", "Category": "Brutal"}
            ],
            "Mutators": null,
            "Levels": []
        }"#;
        let v1: LauncherConfigV1 = serde_json::from_str(raw).expect("parse");
        let config = LauncherConfig::from(v1);
        let names: Vec<_> = config.mods.category_names().collect();
        assert_eq!(names, vec!["Brutal", "Unknown"]);
        assert_eq!(config.mods.entries_in_category("Brutal").len(), 2);
        assert!(config.mutators.category_names().next().is_none());
    }
}
