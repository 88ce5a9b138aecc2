//! CLI command implementations.
//!
//! - **run**: recompute derived columns for a dataset and save it
//! - **stages**: print the stage catalogue
//! - **init**: write a starter configuration file

pub mod init;
pub mod run;
pub mod stages;

pub use init::init_config;
pub use run::{handle_run, RunConfig};
pub use stages::{catalogue_table, print_stages};
