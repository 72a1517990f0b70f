//! Utility modules for the blog generator.

pub mod date;
pub mod plural;

pub use plural::plural_count;
