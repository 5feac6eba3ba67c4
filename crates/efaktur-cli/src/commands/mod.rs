//! CLI subcommands.

pub mod compare;
pub mod config;
pub mod extract;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use efaktur_core::EfakturConfig;

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// `<config dir>/efaktur/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("efaktur")
        .join("config.json")
}

/// Load the explicit config file, else the default one, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EfakturConfig> {
    if let Some(path) = config_path {
        return Ok(EfakturConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(EfakturConfig::from_file(&default_path)?)
    } else {
        Ok(EfakturConfig::default())
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Write to `output` if given, otherwise print to stdout.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
