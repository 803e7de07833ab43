//! Command-line arguments and dispatch

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use xsync_core::{analyze_channels, analyze_files, ExtractConfig, LagReport, Quality, SyncError};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "xsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file; alone, its first two channels are compared
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Second input; compares the first channel of each file
    #[arg(value_name = "FILE2")]
    pub second: Option<PathBuf>,

    /// Resampler quality when the inputs' sample rates differ
    #[arg(long, value_enum, default_value_t = QualityArg::Balanced, env = "XSYNC_QUALITY")]
    pub quality: QualityArg,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Fast,
    Balanced,
    Best,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Fast => Quality::Fast,
            QualityArg::Balanced => Quality::Balanced,
            QualityArg::Best => Quality::Best,
        }
    }
}

impl Cli {
    /// Default log filter, overridden by RUST_LOG
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn extract_config(&self) -> ExtractConfig {
        let mut config = ExtractConfig::with_quality(self.quality.into());
        config.validate();
        config
    }
}

/// Run the analysis the arguments ask for
pub fn run(cli: &Cli) -> Result<LagReport, SyncError> {
    let config = cli.extract_config();
    match &cli.second {
        None => analyze_channels(&cli.file, &config),
        Some(second) => analyze_files(&cli.file, second, &config),
    }
}

/// First line of a clap error, without clap's usage block
pub fn argument_error_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or("invalid arguments").trim();
    let message = first.strip_prefix("error:").unwrap_or(first).trim();
    format!("error: invalid arguments: {}", message)
}
