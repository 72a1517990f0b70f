//! Kawara - a static blog generator for markdown content.

#![allow(dead_code)]

mod cli;
mod config;
mod content;
mod feed;
mod logger;
mod markdown;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { build_args } => cli::build::build_site(&config, build_args),
        Commands::Search { args } => cli::search::run_search(args, &config),
    }
}
