use std::path::PathBuf;

use clap::Parser;

/// cc-server - local development server for cookiecutter templates
#[derive(Parser, Debug)]
#[command(name = "cc-server")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Cookiecutter template source directory
    #[arg(value_name = "TEMPLATE", required_unless_present = "version")]
    pub template: Option<PathBuf>,

    /// Output directory for the rendered preview
    #[arg(short, long, default_value = "./serve/")]
    pub output: PathBuf,

    /// Settings file (defaults to cookiecutter-server.yml in the template)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum seconds between two render+sync cycles (0 disables debouncing)
    #[arg(long, default_value_t = 5.0, value_name = "SECONDS")]
    pub delay: f64,

    /// Paths protected from the output purge
    #[arg(long, value_delimiter = ',', default_value = ".git")]
    pub exclude: Vec<String>,

    /// Emit NDJSON events for CI instead of human-readable output
    #[arg(long)]
    pub json: bool,

    /// Print the program name and version, then exit
    #[arg(short = 'v', long)]
    pub version: bool,
}
