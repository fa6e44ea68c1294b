// Whole-session runs: scripted input through the menu to launch arguments
// and the history line.
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, io::Cursor};
use tempfile::TempDir;
use wadpick::{
    catalog::Entry,
    config::{Executable, LauncherConfig},
    error::{InvariantViolation, LaunchError},
    flatten::flatten,
    history,
    launch::LaunchPlan,
    menu::{Menu, Screen},
    ui::{ConsoleDisplay, LineInput},
};

fn config() -> LauncherConfig {
    let mut config = LauncherConfig::default();
    config.executables.push(Executable {
        code: "GZ".to_string(),
        description: "GZDoom".to_string(),
        path: "/games/gzdoom".to_string(),
    });
    config.mods.push("Gameplay", Entry::new("M1", "Base").with_paths(&["/a/m1.wad"]));
    config.mods.push("Gameplay", Entry::new("M2", "Child").with_parent("M1").with_paths(&["/a/m2.wad"]));
    config.mods.push("Conversions", Entry::new("TC", "Total conversion").with_alt_iwad("tc.wad"));
    config.levels.push("Megawads", Entry::new("L1", "Level").with_paths(&["/a/l1.wad"]));
    config.mutators.push("Tweaks", Entry::new("MU", "Mutator").with_paths(&["/a/mu.pk3"]));
    config
}

fn play(config: &LauncherConfig, script: &str) -> Result<(Vec<Screen>, LaunchPlan, String)> {
    let executable = &config.executables[0];
    let mut menu = Menu::new(config, executable, StdRng::seed_from_u64(3));
    let mut input = LineInput::new(Cursor::new(script.to_string()));
    let mut display = ConsoleDisplay::new(Vec::new(), false);
    menu.run(&mut input, &mut display)?;
    let visited = menu.visited().to_vec();
    let session = menu.into_session();
    let plan = LaunchPlan::build(config, executable, &session, &[])?;
    Ok((visited, plan, history::summary_line(config, &session)))
}

#[test]
fn mod_and_level_give_level_then_mod_paths() -> Result<()> {
    let config = config();
    let (_, plan, summary) = play(&config, "M1\nL1\n")?;
    assert_eq!(plan.args, vec!["-file", "/a/l1.wad", "/a/m1.wad"]);
    assert!(!plan.args.iter().any(|arg| arg == "-iwad"));
    assert_eq!(summary, "M1 L1");
    Ok(())
}

#[test]
fn inherited_mod_paths_follow_parent_order() -> Result<()> {
    let config = config();
    assert_eq!(
        flatten(&config.mods, config.mods.lookup("M2"))?,
        vec!["/a/m1.wad", "/a/m2.wad"]
    );
    let (_, plan, _) = play(&config, "m2\n\n")?;
    assert_eq!(plan.command_line(), "/games/gzdoom -file /a/m1.wad /a/m2.wad");
    Ok(())
}

#[test]
fn self_contained_mod_goes_straight_to_launch() -> Result<()> {
    let config = config();
    let (visited, plan, summary) = play(&config, "tc\n")?;
    assert_eq!(visited, vec![Screen::PickMod, Screen::Execute]);
    assert_eq!(plan.args, vec!["-iwad", "tc.wad", "-file"]);
    assert_eq!(summary, "TC");
    Ok(())
}

#[test]
fn mutator_added_from_level_screen() -> Result<()> {
    let config = config();
    let (visited, plan, summary) = play(&config, "M1\n+\nmu\nL1\n")?;
    assert_eq!(
        visited,
        vec![
            Screen::PickMod,
            Screen::PickLevel,
            Screen::PickMutator,
            Screen::PickLevel,
            Screen::Execute
        ]
    );
    assert_eq!(plan.args, vec!["-file", "/a/l1.wad", "/a/mu.pk3", "/a/m1.wad"]);
    assert_eq!(summary, "M1 L1 MU");
    Ok(())
}

#[test]
fn broken_parent_chain_stops_the_launch() {
    let mut config = config();
    config.mods.push("Broken", Entry::new("OR", "Orphan").with_parent("GONE"));
    let err = play(&config, "or\n\n").expect_err("orphan");
    let launch = err.downcast_ref::<LaunchError>().expect("launch error");
    assert!(matches!(
        launch,
        LaunchError::Invariant(InvariantViolation::MissingParent { .. })
    ));
}

#[test]
fn history_lines_append() -> Result<()> {
    let dir = TempDir::new()?;
    let path = history::history_path(&dir.path().join("DoomSettings.json"));
    history::append_history(&path, "M1 L1")?;
    history::append_history(&path, "TC")?;
    assert_eq!(fs::read_to_string(&path)?, "M1 L1\nTC\n");
    Ok(())
}
