//! `dram`: classify a bottle photo or browse the sample gallery.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use tracing::debug;

use crate::args::{Command, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    logging::init_tracing();

    let command = args::parse(std::env::args().skip(1))?;
    debug!(?command, "Parsed command line");

    match command {
        Command::Classify { image } => commands::classify(&image).await,
        Command::Gallery {
            catalog,
            search,
            spirit_type,
            select,
        } => commands::gallery(&catalog, &search, spirit_type, select).await,
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}
