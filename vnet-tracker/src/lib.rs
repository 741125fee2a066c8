//! Tracks which contracts a CI pipeline deployed on the virtual testnets it provisioned.
//!
//! The provisioning step records an [`types::InfrastructureSnapshot`] through the [`store`]; a later step
//! [`scanner::scan`]s the build-tool logs, [`correlator::correlate`]s the deployments with the snapshot and
//! [`persister::persist`]s the resulting report. Teardown pauses the recorded environments ([`cleanup`]).

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod correlator;
pub mod error;
pub mod persister;
pub mod pipeline;
pub mod provisioner;
pub mod scanner;
pub mod store;
pub mod types;
pub mod utils;

pub use error::{TrackerError, TrackerResult};

#[cfg(test)]
mod tests;
