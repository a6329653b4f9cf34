//! Library side of the `tdv` command-line tool.

pub mod config;
pub mod input;
pub mod logging;
pub mod query;
pub mod summary;
