//! Enhanced error types with actionable suggestions

use colored::Colorize;
use thiserror::Error;

use crate::k8s::kubectl::CommandError;

/// Enhanced error with suggestions
#[derive(Error, Debug)]
#[error("{message}")]
pub struct CleanupError {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl CleanupError {
    /// Create a new error with suggestions
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Add a suggestion to the error
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Display the error with suggestions
    pub fn display(&self) {
        eprintln!("{} {}", "err:".red().bold(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &self.suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }

    // Common error patterns

    /// Cluster tool could not be started
    pub fn kubectl_not_found(message: String) -> Self {
        Self::new(message)
            .suggest("Install kubectl: https://kubernetes.io/docs/tasks/tools/")
            .suggest("Use --kubectl to point at a specific binary")
    }

    /// Permission denied error
    pub fn permission_denied(message: String) -> Self {
        Self::new(message)
            .suggest("Verify the deploy service account may list and delete these resource types")
            .suggest("Narrow the query with --resource-type")
    }

    /// Cluster unreachable error
    pub fn cluster_unreachable(message: String) -> Self {
        Self::new(message)
            .suggest("Check the kubeconfig and current context")
            .suggest("Verify network connectivity to the cluster")
    }

    /// Unknown resource type error
    pub fn unknown_resource_type(message: String) -> Self {
        Self::new(message)
            .suggest("Check --resource-type against: kubectl api-resources --verbs=list -o name")
            .suggest("Qualify the type with its API group, e.g. deployments.apps")
    }
}

/// Helper to display error and exit
pub fn display_error_and_exit(error: CleanupError) -> ! {
    error.display();
    std::process::exit(1);
}

/// Convert anyhow error to CleanupError, keeping the full context chain
pub fn enhance_error(err: anyhow::Error) -> CleanupError {
    let message = format!("{:#}", err);

    let spawn_failed = err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<CommandError>(), Some(CommandError::Spawn { .. })));
    if spawn_failed || message.contains("not found in PATH") {
        return CleanupError::kubectl_not_found(message);
    }

    let lower = message.to_lowercase();

    if lower.contains("forbidden") || lower.contains("unauthorized") {
        return CleanupError::permission_denied(message);
    }

    if lower.contains("connection refused") || lower.contains("unable to connect") {
        return CleanupError::cluster_unreachable(message);
    }

    if lower.contains("doesn't have a resource type") {
        return CleanupError::unknown_resource_type(message);
    }

    CleanupError::new(message).suggest("Run with -v for more details")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn command_failure(stderr: &str) -> anyhow::Error {
        let result: Result<(), CommandError> = Err(CommandError::Failed {
            command: "kubectl get".to_string(),
            code: Some(1),
            stderr: stderr.to_string(),
        });
        result
            .context("Failed to list resources of type Deployment")
            .unwrap_err()
    }

    #[test]
    fn test_error_suggestions() {
        let err = CleanupError::new("test")
            .suggest("suggestion 1")
            .suggest("suggestion 2");
        assert_eq!(err.suggestions.len(), 2);
    }

    #[test]
    fn test_enhance_keeps_context_chain() {
        let err = enhance_error(command_failure("something odd"));
        assert!(err.message.starts_with("Failed to list resources of type Deployment: "));
        assert!(err.message.contains("something odd"));
        assert_eq!(err.suggestions.len(), 1);
    }

    #[test]
    fn test_enhance_spawn_failure() {
        let result: Result<(), CommandError> = Err(CommandError::Spawn {
            command: "kubectl version".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        let err = enhance_error(result.context("Failed to discover").unwrap_err());
        assert!(err.suggestions[0].contains("Install kubectl"));
    }

    #[test]
    fn test_enhance_forbidden() {
        let err = enhance_error(command_failure(
            "Error from server (Forbidden): jobs.batch is forbidden",
        ));
        assert!(err.suggestions[0].contains("service account"));
    }

    #[test]
    fn test_enhance_unknown_type() {
        let err = enhance_error(command_failure(
            "error: the server doesn't have a resource type \"widgets\"",
        ));
        assert!(err.suggestions[0].contains("--resource-type"));
    }
}
