//! Configuration

pub mod identity;
pub mod settings;
