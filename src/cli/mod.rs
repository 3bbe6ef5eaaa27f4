//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::fetch::{
    cmap::{DEFAULT_BASE_URL, DEFAULT_TABLE, DEFAULT_VARIABLE},
    FIRST_YEAR, LAST_YEAR,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Directory holding `data/` and `figs/`
    #[arg(long, global = true, env = "CONVEYOR_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch annual mean SST for every path point
    Fetch {
        /// Query again even if the SST table already exists
        #[arg(long)]
        force: bool,
        /// API key; read from `data/api_key.csv` when absent
        #[arg(long, env = "CMAP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,
        #[arg(long, default_value = DEFAULT_VARIABLE)]
        variable: String,
        #[arg(long, default_value_t = FIRST_YEAR)]
        first_year: i32,
        #[arg(long, default_value_t = LAST_YEAR)]
        last_year: i32,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Draw the conveyor's route
    Path {},
    /// Render one anomaly map per year
    Frames {
        /// Year anomalies are measured against; the first year by default
        #[arg(long)]
        baseline_year: Option<i32>,
        /// TrueType font for titles and labels
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Export SST and anomalies to parquet
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        baseline_year: Option<i32>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_validate_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_default_fetch_arguments() {
        let cli = Cli::try_parse_from(["conveyor", "fetch"]).unwrap();
        match cli.command {
            Commands::Fetch {
                force,
                table,
                variable,
                first_year,
                last_year,
                ..
            } => {
                assert!(!force);
                assert_eq!(table, "tblSST_AVHRR_OI_NRT");
                assert_eq!(variable, "sst");
                assert_eq!((first_year, last_year), (1982, 2021));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn should_accept_global_project_dir() {
        let cli = Cli::try_parse_from(["conveyor", "frames", "--project-dir", "/tmp/run", "--baseline-year", "1990"]).unwrap();
        assert_eq!(cli.project_dir, PathBuf::from("/tmp/run"));
        assert!(matches!(
            cli.command,
            Commands::Frames {
                baseline_year: Some(1990),
                font: None
            }
        ));
    }
}
