//! Command line interface for mdforge

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdforge
#[derive(Parser, Debug)]
#[command(author, version, about = "Markdown to standalone HTML with diagrams, charts and math")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All supported subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a Markdown file as a standalone HTML page.
    Export {
        /// Markdown file to export.
        input: PathBuf,

        /// Output file. `.html` is appended when missing. Without it the
        /// output is chosen in a save dialog (native dialogs) or placed next
        /// to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Title of the exported page.
        #[arg(short = 'T', long)]
        title: Option<String>,

        /// Language of the exported page (`en`, `zh-CN`).
        #[arg(short, long)]
        lang: Option<String>,

        /// Open the exported page in the default browser.
        #[arg(long)]
        open: bool,
    },

    /// Print the HTML fragment for a Markdown file.
    Render {
        /// Markdown file to render.
        input: PathBuf,
    },

    /// Print the application version.
    Version,
}
