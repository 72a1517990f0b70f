//! Command-line interface module.

mod args;
pub mod build;
pub mod search;

pub use args::{BuildArgs, Cli, Commands, SearchArgs};
