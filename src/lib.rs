//! Post-deploy cleanup of resources left behind by previous releases

pub mod commands;
pub mod config;
pub mod k8s;
pub mod utils;
