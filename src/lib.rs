#[cfg(test)]
#[macro_use]
extern crate registry_test;

pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod model;
pub mod registry;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use host::{Host, HostError};
pub use registry::VotingRegistry;
