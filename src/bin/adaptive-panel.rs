use std::path::{Path, PathBuf};
use std::process;

use adaptive_panel::common::config::{Config, config_file, default_config_text};
use adaptive_panel::common::log;
use anyhow::Context;
use clap::Parser;
use tracing::debug;

/// Inspects and checks the adaptive panel color configuration.
///
/// Without flags the effective configuration is printed, with every value the
/// file leaves out filled in from the defaults.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration file and report every issue found.
    #[arg(long, conflicts_with = "print_default")]
    validate: bool,

    /// Print the built-in default configuration.
    #[arg(long)]
    print_default: bool,
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();
    log::init_logging();

    if opt.print_default {
        print!("{}", default_config_text());
        return;
    }

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    debug!(path = %config_path.display(), "using config file");

    if opt.validate {
        let config = match Config::read(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e:#}");
                process::exit(1);
            }
        };
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
        } else {
            for issue in issues {
                eprintln!("{}", issue);
            }
            process::exit(1);
        }
        return;
    }

    if let Err(e) = print_effective(&config_path) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn print_effective(path: &Path) -> anyhow::Result<()> {
    let config = Config::read_or_default(path)?;
    let text = toml::to_string(&config).context("serializing configuration")?;
    print!("{text}");
    Ok(())
}
