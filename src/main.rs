use anyhow::Result;
use std::path::Path;
use wadpick::{
    cli::{self, CliAction, LaunchOptions},
    config::{LauncherConfig, SETTINGS_VERSION},
    error::ConfigError,
    history,
    launch::LaunchPlan,
    menu::Menu,
    ui::{self, ConsoleDisplay, LineInput},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match cli::parse_args(&args)? {
        CliAction::Help => {
            cli::print_help();
            Ok(())
        }
        CliAction::Version => {
            println!("wadpick v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::Launch(options) => run(options),
    }
}

fn run(options: LaunchOptions) -> Result<()> {
    let loaded = match LauncherConfig::load(&options.config_path) {
        Ok(loaded) => loaded,
        Err(err) => exit_on_config_error(&options.config_path, err),
    };
    if let Some(from) = loaded.migrated_from {
        println!("Migrated v{from} config to v{SETTINGS_VERSION}.");
    }
    let config = loaded.config;

    let executable = config.select_executable(options.executable.as_deref())?;
    log::info!("using executable {} ({})", executable.code, executable.path);

    let mut menu = Menu::new(&config, executable, rand::thread_rng());
    let mut display = ConsoleDisplay::stdout(ui::color_enabled(options.no_color));
    menu.run(&mut LineInput::stdin(), &mut display)?;
    let session = menu.into_session();

    let plan = LaunchPlan::build(&config, executable, &session, &options.passthrough)?;
    if options.dry_run {
        println!("{}", plan.command_line());
        return Ok(());
    }
    plan.spawn()?;

    if options.history {
        let path = history::history_path(&options.config_path);
        let line = history::summary_line(&config, &session);
        if let Err(err) = history::append_history(&path, &line) {
            log::warn!("history not written: {err:#}");
        }
    }
    Ok(())
}

fn exit_on_config_error(path: &Path, err: ConfigError) -> ! {
    match &err {
        ConfigError::NotFound(_) => match LauncherConfig::create_default(path) {
            Ok(()) => println!(
                "Failed to load configuration settings.\nA default empty settings file was created at {}.",
                path.display()
            ),
            Err(write_err) => eprintln!("{err}; default settings not written: {write_err}"),
        },
        _ => eprintln!("{err}"),
    }
    std::process::exit(err.exit_code());
}
