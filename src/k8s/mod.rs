//! Kubernetes operations

pub mod discovery;
pub mod kubectl;
pub mod labels;
pub mod resources;

#[cfg(test)]
pub(crate) mod fake;
