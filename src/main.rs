mod app;
mod bodies;
mod config;
mod driver;
mod geometry;
mod input;
mod logging;
mod render;
mod retained;
mod scene;
mod surface;
mod svg;
mod world;

use anyhow::Result;
use clap::Parser;
use config::{Args, Settings};
use tracing::info;

fn main() -> Result<()> {
    let settings = Settings::from_args(Args::parse())?;
    logging::init_logging(settings.log_file.as_deref())?;
    info!(?settings, "starting");
    app::run(&settings)
}
