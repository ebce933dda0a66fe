//! Role rendering logic for IAM Role Extractor service

use futures::future::try_join_all;
use log::{debug, info};

use crate::directory::RoleDirectory;
use crate::error::{RoleExtractorError, RoleExtractorResult};
use crate::synthesis::template::{inline_policy_segment, RoleTemplate};
use crate::synthesis::{sanitize_identifier, transcode_document};
use crate::types::RenderedFragment;

/// Reject role names that cannot identify a role.
pub fn validate_role_name(role_name: &str) -> RoleExtractorResult<()> {
    if role_name.trim().is_empty() {
        return Err(RoleExtractorError::configuration(
            "Role name is required. Please specify the --role-name argument.",
        ));
    }
    Ok(())
}

impl<D: RoleDirectory> super::service::RoleExtractorService<D> {
    /// Render a role as a CloudFormation `AWS::IAM::Role` fragment.
    ///
    /// The role lookup runs first, then both policy listings, then every
    /// inline policy document concurrently. Any failure aborts the render;
    /// no partial fragment is returned. Policies appear in listing order.
    pub async fn render(&self, role_name: &str) -> RoleExtractorResult<RenderedFragment> {
        validate_role_name(role_name)?;

        let role = self.directory.get_role(role_name).await?;
        debug!("Fetched role '{}' (path {})", role.name, role.path);

        let (inline_policy_names, managed_policies) = futures::try_join!(
            self.directory.list_inline_policy_names(role_name),
            self.directory.list_attached_managed_policies(role_name)
        )?;
        info!(
            "Role '{}' has {} inline and {} managed policies",
            role_name,
            inline_policy_names.len(),
            managed_policies.len()
        );

        let inline_policies = try_join_all(
            inline_policy_names
                .iter()
                .map(|policy_name| self.inline_policy(role_name, policy_name)),
        )
        .await?;

        let trust_policy_yaml =
            transcode_document(&role.trust_policy).map_err(RoleExtractorError::trust_policy)?;

        let managed_policy_arns: Vec<String> =
            managed_policies.into_iter().map(|policy| policy.arn).collect();

        let logical_id = sanitize_identifier(role_name);

        let text = RoleTemplate {
            logical_id: &logical_id,
            role_name,
            description: role.description.as_deref(),
            trust_policy_yaml: &trust_policy_yaml,
            max_session_duration: role.max_session_duration,
            path: &role.path,
            inline_policies: &inline_policies,
            managed_policy_arns: &managed_policy_arns,
        }
        .render()?;

        info!("Rendered role '{}' as resource '{}'", role_name, logical_id);
        Ok(RenderedFragment::new(logical_id, text))
    }

    /// Fetch one inline policy and build its `Policies` list entry.
    async fn inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> RoleExtractorResult<String> {
        self.fetch_inline_policy(role_name, policy_name)
            .await
            .map_err(|e| RoleExtractorError::inline_policy(policy_name, e))
    }

    async fn fetch_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> RoleExtractorResult<String> {
        let raw = self
            .directory
            .get_inline_policy_document(role_name, policy_name)
            .await?;
        let document_yaml = transcode_document(&raw)?;
        inline_policy_segment(policy_name, &document_yaml)
    }
}
