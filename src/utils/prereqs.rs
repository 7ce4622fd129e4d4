//! Prerequisite checking for required tools

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrereqError {
    #[error("Tool '{name}' not found in PATH ({hint})")]
    NotFound { name: String, hint: String },
}

/// Prerequisite that checks if a command exists
pub struct CommandPrereq {
    pub name: String,
    pub hint: String,
}

impl CommandPrereq {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }

    /// kubectl, or whatever binary stands in for it
    pub fn kubectl(binary: &str) -> Self {
        Self::new(binary, "Install from: https://kubernetes.io/docs/tasks/tools/")
    }

    /// Check if the tool is available
    pub fn check(&self) -> Result<(), PrereqError> {
        which::which(&self.name).map_err(|_| PrereqError::NotFound {
            name: self.name.clone(),
            hint: self.hint.clone(),
        })?;
        Ok(())
    }
}
