pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "An offline-capable image feed fetcher and cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the feed from the network and print the entries
    Fetch,
    /// Print the cached feed entries without touching the network
    Cached,
    /// Fetch an image through the cache and report its dimensions
    Image {
        /// URL of the image
        url: String,

        /// Write the decoded image to this path
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Remove all cached feed text and images
    ClearCache,
}
