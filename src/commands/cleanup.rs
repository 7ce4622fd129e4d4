//! Stale resource cleanup: discover, list, diff, delete

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::identity::DeployIdentity;
use crate::config::settings::Settings;
use crate::k8s::discovery::discover_resource_types;
use crate::k8s::kubectl::{Kubectl, render_command};
use crate::k8s::labels::ReleaseScope;
use crate::k8s::resources::{self, delete_args, list_resources, stale_resources};
use crate::utils::dryrun;

/// Everything one cleanup run needs, resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    pub identity: DeployIdentity,
    /// Comma-separated namespaces; empty means no namespace flag
    pub namespaces: String,
    /// Comma-separated resource types; empty means discover
    pub resource_type_override: String,
    pub dry_run: bool,
}

impl CleanupOptions {
    /// Build options from settings already merged with command-line values
    pub fn from_settings(identity: DeployIdentity, settings: &Settings) -> Self {
        Self {
            identity,
            namespaces: settings.defaults.namespaces.clone(),
            resource_type_override: settings.defaults.resource_types.clone(),
            dry_run: settings.behavior.dry_run,
        }
    }
}

/// Resources found for this pipeline target and the subset to remove
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    pub deployed: Vec<String>,
    pub current: Vec<String>,
    pub stale: Vec<String>,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub identity: DeployIdentity,
    pub dry_run: bool,
    pub deployed: usize,
    pub current: usize,
    pub stale: Vec<String>,
    pub deleted: Vec<String>,
}

impl CleanupReport {
    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }
}

/// Work out which deployed resources are no longer part of the current release
pub fn resources_to_delete(kubectl: &Kubectl, options: &CleanupOptions) -> Result<CleanupPlan> {
    let resource_types = discover_resource_types(kubectl, &options.resource_type_override)?;

    crate::log_info!("Listing resources deployed by any release...");
    let deployed = list_resources(
        kubectl,
        &options.identity,
        ReleaseScope::AllReleases,
        &options.namespaces,
        &resource_types,
    )?;

    crate::log_info!(
        "Listing resources deployed by release {}...",
        options.identity.release
    );
    let current = list_resources(
        kubectl,
        &options.identity,
        ReleaseScope::CurrentRelease,
        &options.namespaces,
        &resource_types,
    )?;

    let stale = stale_resources(&deployed, &current);
    crate::log_info!(
        "Found {} deployed, {} current, {} stale resources",
        deployed.len(),
        current.len(),
        stale.len()
    );

    Ok(CleanupPlan {
        deployed,
        current,
        stale,
    })
}

/// Delete the stale resources, returning those removed
pub fn delete_resources(kubectl: &Kubectl, stale: &[String]) -> Result<Vec<String>> {
    resources::delete_resources(kubectl, stale)
}

/// Run a full cleanup
pub fn run(kubectl: &Kubectl, options: &CleanupOptions) -> Result<CleanupReport> {
    let plan = resources_to_delete(kubectl, options)?;

    let deleted = if plan.stale.is_empty() {
        crate::log_info!("No stale resources to delete");
        Vec::new()
    } else if options.dry_run {
        let actions: Vec<String> = plan
            .stale
            .iter()
            .map(|resource| render_command(kubectl.binary(), &delete_args(resource)))
            .collect();
        dryrun::log_actions(&actions);
        Vec::new()
    } else {
        let deleted = delete_resources(kubectl, &plan.stale)?;
        crate::log_info!("Deleted {} stale resources", deleted.len());
        deleted
    };

    Ok(CleanupReport {
        identity: options.identity.clone(),
        dry_run: options.dry_run,
        deployed: plan.deployed.len(),
        current: plan.current.len(),
        stale: plan.stale,
        deleted,
    })
}
