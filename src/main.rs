mod cli;
mod colormap;
mod error;
mod fetch;
mod geodesic;
mod parquet;
mod projection;
mod render;
mod segments;
mod table;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{
    command::{self, FetchOptions, Settings},
    Cli, Commands,
};
use env_logger::Env;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::new(&cli.project_dir);

    let saved = match cli.command {
        Commands::Fetch {
            force,
            api_key,
            table,
            variable,
            first_year,
            last_year,
            base_url,
        } => {
            let options = FetchOptions {
                force,
                api_key,
                table,
                variable,
                first_year,
                last_year,
                base_url,
            };
            command::fetch(&settings, options).await?
        }
        Commands::Path {} => command::path(&settings)?,
        Commands::Frames { baseline_year, font } => command::frames(&settings, baseline_year, font.as_deref())?,
        Commands::Export { output, baseline_year } => command::export(&settings, output, baseline_year)?,
    };

    println!("File saved to `{}`", saved.display());

    Ok(())
}
