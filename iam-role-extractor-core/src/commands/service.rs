//! IAM Role Extractor Service Layer
//!
//! The service holds a [`RoleDirectory`] and provides the high-level render
//! operation used by the CLI. Tests and alternative backends plug their own
//! directory in through [`RoleExtractorService::with_directory`].

use crate::aws::{load_config, AwsOptions, AwsRoleDirectory};
use crate::directory::RoleDirectory;

/// Main service struct that holds the role directory
pub struct RoleExtractorService<D = AwsRoleDirectory> {
    pub(crate) directory: D,
}

impl RoleExtractorService<AwsRoleDirectory> {
    /// Create a service backed by the IAM API.
    ///
    /// Configuration is loaded using the default credential provider chain,
    /// with the region and profile from `options` applied on top.
    pub async fn new(options: &AwsOptions) -> Self {
        let config = load_config(options).await;
        Self::with_directory(AwsRoleDirectory::from_config(&config))
    }
}

impl<D: RoleDirectory> RoleExtractorService<D> {
    pub fn with_directory(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    // render() method implementation is in render.rs
}
