//! Resource type discovery

use anyhow::{Context, Result};

use super::kubectl::Kubectl;

/// Arguments listing every resource kind that supports the `list` verb
pub fn api_resources_args() -> Vec<String> {
    ["api-resources", "--verbs=list", "-o", "name"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Resolve the resource types to query.
///
/// A non-empty comma-separated `override_csv` is used verbatim without asking
/// the cluster. Otherwise every listable kind the cluster serves is returned.
pub fn discover_resource_types(kubectl: &Kubectl, override_csv: &str) -> Result<Vec<String>> {
    if !override_csv.is_empty() {
        let types: Vec<String> = override_csv.split(',').map(str::to_string).collect();
        crate::log_info!("Using resource types from override: {}", types.join(", "));
        return Ok(types);
    }

    let output = kubectl
        .run(&api_resources_args())
        .context("Failed to discover listable resource types")?;

    let types: Vec<String> = output
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    crate::log_info!("Discovered {} listable resource types", types.len());
    Ok(types)
}
