//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use litter_pipeline::PipelineConfig;

/// Geocode Philadelphia litter index blocks and fetch Street View imagery.
#[derive(Parser, Debug)]
#[command(name = "litterview", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Geocode every block and write the augmented CSV
    Coords(StageArgs),

    /// Geocode, then download Street View images for every block
    Images(ImageArgs),

    /// Inspect or edit the configuration file
    Config {
        /// Config operation
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags shared by `coords` and `images`.
#[derive(Args, Debug, Clone, Default)]
pub struct StageArgs {
    /// Blocks CSV to read
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the geocoded CSV
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Only process the first N blocks
    #[arg(long)]
    pub limit: Option<usize>,
}

impl StageArgs {
    /// Overrides file settings with the flags given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
    }
}

/// Flags of the `images` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ImageArgs {
    /// Input and output flags
    #[command(flatten)]
    pub stage: StageArgs,

    /// Concurrent download workers (0 = two per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Root folder for per-block image folders
    #[arg(long)]
    pub image_dir: Option<PathBuf>,
}

impl ImageArgs {
    /// Overrides file settings with the flags given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        self.stage.apply(config);
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(image_dir) = &self.image_dir {
            config.image_dir = image_dir.clone();
        }
    }
}

/// `litterview config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the config file path in effect
    Path,

    /// Print one value by dotted key, e.g. `imagery.width`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set one value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a config file with default values
    Init {
        /// Where to write it (default: the per-user config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print settings as LITTERVIEW_* environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker run
        #[arg(long)]
        docker_env: bool,
    },
}
