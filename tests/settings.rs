// Settings file loading, migration and failure kinds.
use anyhow::Result;
use std::{fs, path::Path};
use tempfile::TempDir;
use wadpick::{
    config::{LauncherConfig, SETTINGS_VERSION},
    error::ConfigError,
};

const V2_BODY: &str = r#"{
  "Executables": [{ "Code": "GZ", "Description": "GZDoom", "Path": "/games/gzdoom" }],
  "Mods": {
    "Gameplay Mods": [
      { "Code": "M1", "Description": "Base", "Path": ["/a/m1.wad"] },
      { "Code": "M2", "Description": "Child", "Parent": "M1", "Path": ["/a/m2.wad"] }
    ]
  },
  "Mutators": { "Tweaks": [{ "Code": "MU", "Path": ["/a/mu.pk3"], "Tags": ["qol"] }] },
  "Levels": { "Megawads": [{ "Code": "L1", "Description": "Level", "Path": ["/a/l1.wad"], "Year": 1994 }] }
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn loads_versioned_settings() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "DoomSettings.json", &format!("v2\n{V2_BODY}"))?;

    let loaded = LauncherConfig::load(&path)?;
    assert!(loaded.migrated_from.is_none());
    let config = loaded.config;
    assert_eq!(config.executables[0].code, "GZ");
    assert_eq!(config.mods.lookup("m2").and_then(|e| e.parent_code()), Some("M1"));
    assert_eq!(config.levels.lookup("L1").and_then(|e| e.year), Some(1994));
    assert_eq!(config.mutators.lookup("mu").map(|e| e.tags.clone()), Some(vec!["qol".to_string()]));
    Ok(())
}

#[test]
fn migrates_headerless_v1_and_rewrites_file() -> Result<()> {
    let dir = TempDir::new()?;
    let v1 = r#"{
  "Executables": [{ "Code": "GZ", "Path": "/games/gzdoom" }],
  "Mods": [
    { "Code": "BD", "Description": "Brutal Doom", "Category": "Gameplay Mods", "Path": ["/m/bd.pk3"] },
    { "Code": "VAN", "Description": "Vanilla", "Path": [] }
  ],
  "Mutators": [],
  "Levels": [{ "Code": "TNT", "Category": "IWADs", "IWad": "tnt.wad" }]
}"#;
    let path = write(&dir, "DoomSettings.json", v1)?;

    let loaded = LauncherConfig::load(&path)?;
    assert_eq!(loaded.migrated_from, Some(1));
    assert_eq!(loaded.config.mods.entries_in_category("Gameplay Mods").len(), 1);
    assert_eq!(loaded.config.mods.entries_in_category("Unknown").len(), 1);
    assert_eq!(
        loaded.config.levels.lookup("tnt").and_then(|e| e.alt_iwad()),
        Some("tnt.wad")
    );

    let rewritten = fs::read_to_string(&path)?;
    assert!(rewritten.starts_with(&format!("v{SETTINGS_VERSION}\n")));

    let reloaded = LauncherConfig::load(&path)?;
    assert!(reloaded.migrated_from.is_none());
    assert_eq!(reloaded.config, loaded.config);
    Ok(())
}

#[test]
fn missing_and_broken_settings_have_distinct_exit_codes() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = LauncherConfig::load(&dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(missing, ConfigError::NotFound(_)));

    let broken_path = write(&dir, "broken.json", "v2\n{ \"Mods\": [")?;
    let broken = LauncherConfig::load(&broken_path).expect_err("broken");
    assert!(matches!(broken, ConfigError::Parse { .. }));

    assert_ne!(missing.exit_code(), broken.exit_code());
    assert!(missing.exit_code() < 0 && broken.exit_code() < 0);
    Ok(())
}

#[test]
fn newer_versions_are_refused() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "future.json", &format!("v9\n{V2_BODY}"))?;
    let err = LauncherConfig::load(&path).expect_err("future");
    assert!(matches!(err, ConfigError::UnsupportedVersion { found: 9, .. }));
    Ok(())
}

#[test]
fn duplicate_codes_across_categories_are_refused() -> Result<()> {
    let dir = TempDir::new()?;
    let body = r#"{
  "Mods": {
    "A": [{ "Code": "dup" }],
    "B": [{ "Code": "DUP" }]
  }
}"#;
    let path = write(&dir, "dup.json", &format!("v2\n{body}"))?;
    let err = LauncherConfig::load(&path).expect_err("duplicate");
    assert!(matches!(err, ConfigError::DuplicateCode { catalog: "Mods", .. }));
    assert_eq!(err.exit_code(), -2);
    Ok(())
}

#[test]
fn rejected_v1_file_is_left_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let body = r#"{
  "Mods": [
    { "Code": "BD", "Category": "Brutal" },
    { "Code": "bd", "Category": "Other" }
  ]
}"#;
    let path = write(&dir, "legacy.json", body)?;
    let err = LauncherConfig::load(&path).expect_err("duplicate");
    assert!(matches!(err, ConfigError::DuplicateCode { catalog: "Mods", .. }));
    assert_eq!(fs::read_to_string(&path)?, body);
    Ok(())
}

#[test]
fn default_settings_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("DoomSettings.json");
    LauncherConfig::create_default(&path)?;
    assert!(Path::new(&path).exists());

    let loaded = LauncherConfig::load(&path)?;
    assert_eq!(loaded.config, LauncherConfig::skeleton());
    assert!(loaded.config.mods.is_empty());
    assert!(loaded.config.select_executable(None).is_err());
    Ok(())
}
