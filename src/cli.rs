use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse a JSON catalog of stays
#[derive(Parser)]
#[command(name = "stayboard")]
#[command(about = "Render, search and favorite listings from a JSON catalog", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep favorites in memory for this run only
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the listings page as HTML
    Render {
        /// Search text applied before rendering
        #[arg(short, long)]
        query: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print one line per listing
    List {
        #[arg(short, long)]
        query: Option<String>,
        /// Print the normalized listings as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Toggle a listing in the favorites
    Favorite {
        /// Listing id as shown by `list`
        id: String,
    },
    /// Print favorite ids
    Favorites,
    /// Read events from stdin (`/fav <id>` or search text) and rewrite the page after each
    Watch {
        #[arg(short, long)]
        out: PathBuf,
    },
}
