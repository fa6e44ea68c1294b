use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};
use wadpick::batch::{self, BatchLayout, LineRange, TitleRange, DEFAULT_ROOT_PREFIX};

struct Args {
    script: PathBuf,
    layout: BatchLayout,
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.is_empty() || matches!(raw[0].as_str(), "--help" | "-h") {
        print_help();
        return Ok(());
    }
    let args = parse_args(&raw)?;

    let catalog = batch::parse_file(&args.script, &args.layout)?;
    let json = batch::to_json(&catalog)?;
    fs::write(&args.output, &json)
        .with_context(|| format!("write {}", args.output.display()))?;
    println!("{json}");
    Ok(())
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut script = None;
    let mut mods = None;
    let mut titles = Vec::new();
    let mut root_prefix = DEFAULT_ROOT_PREFIX.to_string();
    let mut output = PathBuf::from("output.json");
    let mut iter = raw.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--mods" => mods = Some(LineRange::parse(&value("--mods")?)?),
            "--titles" => titles.push(TitleRange::parse(&value("--titles")?)?),
            "--root" => root_prefix = value("--root")?,
            "--output" | "-o" => output = PathBuf::from(value("--output")?),
            other if other.starts_with('-') => bail!("Unknown argument: {other}"),
            other => {
                if script.replace(PathBuf::from(other)).is_some() {
                    bail!("only one batch script may be given");
                }
            }
        }
    }

    let Some(script) = script else {
        bail!("missing batch script path");
    };
    let Some(mods) = mods else {
        bail!("--mods <start>:<end> is required");
    };
    Ok(Args {
        script,
        layout: BatchLayout {
            mods,
            titles,
            root_prefix,
        },
        output,
    })
}

fn print_help() {
    println!("batch-parse v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: batch-parse <script.bat> --mods <start>:<end> [--titles <start>:<end>:<category>]...");
    println!("                   [--root <path prefix>] [--output <file>]");
    println!();
    println!("Line numbers are zero-based; ranges are half-open.");
    println!("Paths are tokens starting with the root prefix (default {DEFAULT_ROOT_PREFIX}).");
}
