//! The role lookup capability the fragment assembler depends on.

use async_trait::async_trait;

use crate::error::RoleExtractorResult;
use crate::types::{ManagedPolicyAttachment, RoleSnapshot};

/// Read-only access to IAM role data.
///
/// Listings return the first page only; callers must not assume the result is
/// complete for roles with very large policy counts.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Fetch the role itself. Returns `NotFound` if the role does not exist.
    async fn get_role(&self, role_name: &str) -> RoleExtractorResult<RoleSnapshot>;

    /// Names of the role's inline policies, in service order.
    async fn list_inline_policy_names(&self, role_name: &str) -> RoleExtractorResult<Vec<String>>;

    /// Managed policies attached to the role, in service order.
    async fn list_attached_managed_policies(
        &self,
        role_name: &str,
    ) -> RoleExtractorResult<Vec<ManagedPolicyAttachment>>;

    /// URL-encoded JSON document of one inline policy.
    async fn get_inline_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> RoleExtractorResult<String>;
}
