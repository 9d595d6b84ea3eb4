//! Packaging and release publication for the pigcel macOS build.
pub mod artifact;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod logging;
pub mod reference;
pub mod result;
pub mod runner;

pub use command::{package, publish};
pub use result::Result;

#[cfg(test)]
pub mod test_helpers;
