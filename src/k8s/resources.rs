//! Listing, diffing and deleting labelled resources

use std::collections::HashSet;

use anyhow::{Context, Result};

use super::kubectl::Kubectl;
use super::labels::{ReleaseScope, build_selector};
use crate::config::identity::DeployIdentity;

/// Arguments for one `get` query returning resource names
pub fn get_args(selector: &str, namespace: &str, resource_type: &str) -> Vec<String> {
    let mut args = vec![
        "get".to_string(),
        "-o".to_string(),
        "name".to_string(),
        "-l".to_string(),
        selector.to_string(),
    ];
    if !namespace.is_empty() {
        args.push(format!("--namespace={}", namespace));
    }
    args.push(resource_type.to_string());
    args
}

/// Arguments deleting a single resource, treating "not found" as success
pub fn delete_args(resource: &str) -> Vec<String> {
    vec![
        "delete".to_string(),
        resource.to_string(),
        "--ignore-not-found=true".to_string(),
    ]
}

/// List labelled resources across every (type, namespace) pair.
///
/// `namespaces` is comma-separated; an empty string queries once without a
/// namespace flag. Results keep query order and may contain duplicates. The
/// first failing query aborts the whole listing.
pub fn list_resources(
    kubectl: &Kubectl,
    identity: &DeployIdentity,
    scope: ReleaseScope,
    namespaces: &str,
    resource_types: &[String],
) -> Result<Vec<String>> {
    let selector = build_selector(identity, scope);
    let mut found = Vec::new();

    for resource_type in resource_types {
        for namespace in namespaces.split(',') {
            let output = kubectl
                .run(&get_args(&selector, namespace, resource_type))
                .with_context(|| {
                    format!("Failed to list resources of type {}", resource_type)
                })?;

            found.extend(
                output
                    .split('\n')
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
    }

    tracing::debug!(?scope, count = found.len(), "listed resources");
    Ok(found)
}

/// Elements of `deployed` absent from `current`, keeping order and duplicates
pub fn stale_resources(deployed: &[String], current: &[String]) -> Vec<String> {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();

    deployed
        .iter()
        .filter(|resource| !current.contains(resource.as_str()))
        .cloned()
        .collect()
}

/// Delete `resources` one at a time, stopping at the first failure.
///
/// Returns the identifiers that were deleted.
pub fn delete_resources(kubectl: &Kubectl, resources: &[String]) -> Result<Vec<String>> {
    let mut deleted = Vec::with_capacity(resources.len());

    for resource in resources {
        crate::log_info!("Deleting {}", resource);
        kubectl
            .run(&delete_args(resource))
            .with_context(|| format!("Failed to delete resource {}", resource))?;
        deleted.push(resource.clone());
    }

    Ok(deleted)
}
