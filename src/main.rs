use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use vista::cli::{preset_listing, Cli};
use vista::VistaApp;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.list {
        println!("{}", preset_listing());
        return Ok(());
    }

    let config = cli.into_config();
    info!("Starting vista with scene '{}'", config.preset);

    let app = VistaApp::new(config).context("failed to set up the scene")?;
    app.run().context("vista exited with an error")?;
    Ok(())
}
