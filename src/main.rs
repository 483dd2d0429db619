mod app;
mod bubbles;
mod config;
mod dots;
mod input;
mod jelly;
mod math;
mod noise;
mod paint;
mod palette;
mod render;
mod scene;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    app::run(config::Args::parse())
}
