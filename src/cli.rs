use crate::config::default_settings_path;
use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Launch(LaunchOptions),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub config_path: PathBuf,
    pub executable: Option<String>,
    pub dry_run: bool,
    pub history: bool,
    pub no_color: bool,
    /// Everything after `--`, handed to the game untouched.
    pub passthrough: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            config_path: default_settings_path(),
            executable: None,
            dry_run: false,
            history: true,
            no_color: false,
            passthrough: Vec::new(),
        }
    }
}

pub fn parse_args(args: &[String]) -> Result<CliAction> {
    if matches!(args.first().map(|s| s.as_str()), Some("--help" | "-h" | "help")) {
        return Ok(CliAction::Help);
    }
    if matches!(args.first().map(|s| s.as_str()), Some("--version" | "-V" | "version")) {
        return Ok(CliAction::Version);
    }

    let mut options = LaunchOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" => {
                options.passthrough.extend(iter.by_ref().cloned());
                break;
            }
            "--config" | "-c" => {
                let Some(value) = iter.next() else {
                    bail!("--config requires a path");
                };
                options.config_path = PathBuf::from(value);
            }
            value if value.starts_with("--config=") => {
                options.config_path = PathBuf::from(value.trim_start_matches("--config="));
            }
            "--exec" | "-e" => {
                let Some(value) = iter.next() else {
                    bail!("--exec requires an executable code");
                };
                options.executable = Some(value.to_string());
            }
            value if value.starts_with("--exec=") => {
                options.executable = Some(value.trim_start_matches("--exec=").to_string());
            }
            "--dry-run" | "-n" => options.dry_run = true,
            "--no-history" => options.history = false,
            "--no-color" => options.no_color = true,
            "--help" | "-h" => return Ok(CliAction::Help),
            "--version" | "-V" => return Ok(CliAction::Version),
            other => bail!("Unknown argument: {other} (see --help)"),
        }
    }

    Ok(CliAction::Launch(options))
}

pub fn print_help() {
    println!("wadpick v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: wadpick [options] [-- <game args>]");
    println!();
    println!("Options:");
    println!("  -c, --config <path>   Settings file (default: DoomSettings.json)");
    println!("  -e, --exec <code>     Executable to launch (default: first configured)");
    println!("  -n, --dry-run         Print the command line instead of launching");
    println!("      --no-history      Do not append to launcher_history.txt");
    println!("      --no-color        Plain output without colour (also NO_COLOR)");
    println!("  -h, --help            Show this help");
    println!("  -V, --version         Show version");
    println!();
    println!("At a prompt: type a code, '*' to pick at random, '+' to add a mutator,");
    println!("or leave blank to skip the level or return from the mutator screen.");
}
