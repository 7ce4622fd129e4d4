//! Ownership identity of the current rollout

use serde::Serialize;

pub const RELEASE_ENV: &str = "CLOUD_DEPLOY_RELEASE";
pub const PROJECT_ENV: &str = "CLOUD_DEPLOY_PROJECT";
pub const LOCATION_ENV: &str = "CLOUD_DEPLOY_LOCATION";
pub const PIPELINE_ENV: &str = "CLOUD_DEPLOY_DELIVERY_PIPELINE";
pub const TARGET_ENV: &str = "CLOUD_DEPLOY_TARGET";

/// The five attributes that label every resource a pipeline target deploys.
///
/// Read once at startup and passed by reference afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployIdentity {
    pub project: String,
    pub location: String,
    pub pipeline: String,
    pub target: String,
    pub release: String,
}

impl DeployIdentity {
    /// Read the identity from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the identity from an arbitrary variable lookup.
    ///
    /// Unset variables become empty values; a warning is logged for each.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                crate::log_warn!("{} is not set, using an empty label value", key);
                String::new()
            })
        };

        Self {
            project: read(PROJECT_ENV),
            location: read(LOCATION_ENV),
            pipeline: read(PIPELINE_ENV),
            target: read(TARGET_ENV),
            release: read(RELEASE_ENV),
        }
    }
}
