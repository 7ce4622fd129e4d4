//! Command implementations for deploy-pruner

pub mod cleanup;
