//! Utility modules for deploy-pruner

pub mod dryrun;
pub mod errors;
pub mod logger;
pub mod prereqs;
