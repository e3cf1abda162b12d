//! cc-server CLI - local development server for cookiecutter templates
//!
//! Usage: cc-server <TEMPLATE> [-o <dir>]
//!
//! Watches the template directory and keeps a rendered preview in the
//! output directory until interrupted with Ctrl+C.

mod cli;
mod commands;
mod logging;
mod ui;

use anyhow::Result;
use clap::Parser;

use crate::commands::serve::{cmd_serve, ServeArgs};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init_logging();

    let template = cli.template.expect("TEMPLATE is required by the parser");
    cmd_serve(ServeArgs {
        template,
        output: cli.output,
        config: cli.config,
        delay: cli.delay,
        exclude: cli.exclude,
        json: cli.json,
    })
}
