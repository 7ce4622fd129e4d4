//! Label selectors identifying resources owned by a delivery pipeline target

use crate::config::identity::DeployIdentity;

/// Prefix shared by every ownership label
pub const LABEL_PREFIX: &str = "deploy.cloud.google.com/";

/// Which releases a selector should match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseScope {
    /// Anything this pipeline/target ever deployed
    AllReleases,
    /// Only the release currently being deployed
    CurrentRelease,
}

impl ReleaseScope {
    pub fn includes_release_label(self) -> bool {
        matches!(self, ReleaseScope::CurrentRelease)
    }
}

/// Build the `-l` selector for `identity`.
///
/// Clause order is fixed (release first when scoped, then pipeline, target,
/// location, project) so generated commands are reproducible. Empty identity
/// values are emitted as empty label values.
pub fn build_selector(identity: &DeployIdentity, scope: ReleaseScope) -> String {
    let mut clauses = Vec::with_capacity(5);

    if scope.includes_release_label() {
        clauses.push(clause("release-id", &identity.release));
    }
    clauses.push(clause("delivery-pipeline-id", &identity.pipeline));
    clauses.push(clause("target-id", &identity.target));
    clauses.push(clause("location", &identity.location));
    clauses.push(clause("project-id", &identity.project));

    clauses.join(",")
}

fn clause(attribute: &str, value: &str) -> String {
    format!("{}{}={}", LABEL_PREFIX, attribute, value)
}
