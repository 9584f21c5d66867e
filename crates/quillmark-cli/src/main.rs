use anyhow::{Context, Result};
use clap::Parser;
use quillmark_config::Config;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "quillmark")]
#[command(about = "Convert markdown to HTML, JSON, plain or terminal text")]
struct Args {
    /// Markdown file to convert; reads stdin when omitted
    file: Option<PathBuf>,

    /// Renderer: html, ast, terminal or text
    #[arg(short, long)]
    renderer: Option<String>,

    /// Plugin to enable (repeatable); adds to plugins from the config file
    #[arg(short, long = "plugin")]
    plugins: Vec<String>,

    /// Pass raw HTML through instead of escaping it
    #[arg(long)]
    no_escape: bool,

    /// Config file to use instead of ~/.config/quillmark/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Command-line flags win over the config file.
fn merge(mut config: Config, args: &Args) -> Config {
    if let Some(renderer) = &args.renderer {
        config.renderer = renderer.clone();
    }
    if args.no_escape {
        config.escape = false;
    }
    for plugin in &args.plugins {
        if !config.plugins.contains(plugin) {
            config.plugins.push(plugin.clone());
        }
    }
    config
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// `RUST_LOG` decides the level unless `--verbose` asks for debug output;
/// with neither, only warnings are shown.
fn log_level(verbose: bool, rust_log_set: bool) -> Option<log::LevelFilter> {
    if verbose {
        Some(log::LevelFilter::Debug)
    } else if rust_log_set {
        None
    } else {
        Some(log::LevelFilter::Warn)
    }
}

fn log_builder(verbose: bool, rust_log_set: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = log_level(verbose, rust_log_set) {
        builder.filter_level(level);
    }
    builder
}

fn main() -> Result<()> {
    let args = Args::parse();

    log_builder(args.verbose, std::env::var_os("RUST_LOG").is_some()).init();

    let config_path = args
        .config
        .as_deref()
        .map_or_else(Config::config_path, Config::expand_path);
    log::debug!("Config path: {}", config_path.display());
    let config = match Config::load_from_path(&config_path) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let config = merge(config, &args);
    let markdown = match config.build_markdown() {
        Ok(markdown) => markdown,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let input = read_input(args.file.as_ref())?;
    let output = markdown.convert(&input);
    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}
