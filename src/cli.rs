use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "variantforge")]
#[command(author, version, about = "Derive, store, and remove image variants of uploaded files")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Produce and store every configured variant of an image
    Process {
        /// Image file to process
        #[arg(required = true)]
        input: PathBuf,

        /// Original upload name (defaults to the input's file name)
        #[arg(long)]
        name: Option<String>,

        /// Directory to store variants in (overrides storage.root)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// URL prefix for stored variants (overrides storage.base_url)
        #[arg(long)]
        base_url: Option<String>,

        /// Write the resulting records to this JSON file
        #[arg(long)]
        records: Option<PathBuf>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove stored variants listed in a records file
    Remove {
        /// JSON records file written by `process --records`
        #[arg(required = true)]
        records: PathBuf,

        /// Directory variants were stored in (overrides storage.root)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// URL prefix used when storing (overrides storage.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the per-transform field schema as JSON
    Schema,

    /// Check that GraphicsMagick / ImageMagick are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config or the default locations if not specified)
        file: Option<PathBuf>,
    },
}
