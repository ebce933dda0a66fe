//! AWS IAM client wrapper for role read operations
//!
//! Listings request a single page. Truncated listings are logged and returned
//! as-is.

use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_iam::error::{DisplayErrorContext, SdkError};
use aws_sdk_iam::operation::get_role::GetRoleError;
use aws_sdk_iam::operation::get_role_policy::GetRolePolicyError;
use aws_sdk_iam::operation::list_attached_role_policies::{
    ListAttachedRolePoliciesError, ListAttachedRolePoliciesOutput,
};
use aws_sdk_iam::operation::list_role_policies::{ListRolePoliciesError, ListRolePoliciesOutput};
use aws_sdk_iam::types::Role;
use aws_sdk_iam::Client as IamClient;
use log::{debug, warn};

use crate::directory::RoleDirectory;
use crate::error::{RoleExtractorError, RoleExtractorResult};
use crate::types::{ManagedPolicyAttachment, RoleSnapshot, DEFAULT_MAX_SESSION_DURATION};

/// [`RoleDirectory`] backed by the IAM API.
#[derive(Debug, Clone)]
pub struct AwsRoleDirectory {
    client: IamClient,
}

impl AwsRoleDirectory {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(IamClient::new(config))
    }
}

fn remote_call_error<E>(operation: &'static str, role_name: &str, err: E) -> RoleExtractorError
where
    E: std::error::Error,
{
    RoleExtractorError::remote_call(operation, role_name, DisplayErrorContext(err).to_string())
}

fn role_not_found(role_name: &str) -> RoleExtractorError {
    RoleExtractorError::NotFound {
        entity: "role",
        name: role_name.to_string(),
    }
}

/// Map an SDK failure to `not_found` when the service reports `NoSuchEntity`,
/// otherwise to `RemoteCall`.
fn map_sdk_error<E, R>(
    err: SdkError<E, R>,
    is_no_such_entity: fn(&E) -> bool,
    not_found: impl FnOnce() -> RoleExtractorError,
    operation: &'static str,
    role_name: &str,
) -> RoleExtractorError
where
    E: std::error::Error + 'static,
    R: Debug,
{
    if err.as_service_error().is_some_and(is_no_such_entity) {
        not_found()
    } else {
        remote_call_error(operation, role_name, err)
    }
}

/// Convert a `GetRole` response role into a snapshot.
fn role_snapshot(role: &Role, role_name: &str) -> RoleExtractorResult<RoleSnapshot> {
    let trust_policy = role.assume_role_policy_document().ok_or_else(|| {
        RoleExtractorError::remote_call(
            "get role",
            role_name,
            "response did not include an AssumeRolePolicyDocument",
        )
    })?;

    Ok(RoleSnapshot {
        name: role.role_name().to_string(),
        description: role.description().map(str::to_string),
        path: role.path().to_string(),
        max_session_duration: role
            .max_session_duration()
            .unwrap_or(DEFAULT_MAX_SESSION_DURATION),
        trust_policy: trust_policy.to_string(),
    })
}

/// Log when a listing stopped at the first page. Returns whether it did.
fn warn_if_truncated(truncated: bool, listing: &str, role_name: &str, returned: usize) -> bool {
    if truncated {
        warn!(
            "{} listing for role '{}' is truncated; only the first {} policies are rendered",
            listing, role_name, returned
        );
    }
    truncated
}

fn inline_policy_names(response: ListRolePoliciesOutput, role_name: &str) -> Vec<String> {
    warn_if_truncated(
        response.is_truncated(),
        "Inline policy",
        role_name,
        response.policy_names.len(),
    );
    response.policy_names
}

/// Managed policy attachments in response order. Entries without an ARN are
/// skipped.
fn attachments(
    response: &ListAttachedRolePoliciesOutput,
    role_name: &str,
) -> Vec<ManagedPolicyAttachment> {
    warn_if_truncated(
        response.is_truncated(),
        "Managed policy",
        role_name,
        response.attached_policies().len(),
    );

    response
        .attached_policies()
        .iter()
        .filter_map(|policy| match policy.policy_arn() {
            Some(arn) => Some(ManagedPolicyAttachment::new(arn)),
            None => {
                warn!(
                    "Skipping managed policy {:?} on role '{}': no ARN in response",
                    policy.policy_name(),
                    role_name
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl RoleDirectory for AwsRoleDirectory {
    async fn get_role(&self, role_name: &str) -> RoleExtractorResult<RoleSnapshot> {
        debug!("Calling GetRole for '{}'", role_name);
        let response = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    e,
                    GetRoleError::is_no_such_entity_exception,
                    || role_not_found(role_name),
                    "get role",
                    role_name,
                )
            })?;

        let role = response.role().ok_or_else(|| role_not_found(role_name))?;
        role_snapshot(role, role_name)
    }

    async fn list_inline_policy_names(&self, role_name: &str) -> RoleExtractorResult<Vec<String>> {
        debug!("Calling ListRolePolicies for '{}'", role_name);
        let response = self
            .client
            .list_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    e,
                    ListRolePoliciesError::is_no_such_entity_exception,
                    || role_not_found(role_name),
                    "list inline policies",
                    role_name,
                )
            })?;

        Ok(inline_policy_names(response, role_name))
    }

    async fn list_attached_managed_policies(
        &self,
        role_name: &str,
    ) -> RoleExtractorResult<Vec<ManagedPolicyAttachment>> {
        debug!("Calling ListAttachedRolePolicies for '{}'", role_name);
        let response = self
            .client
            .list_attached_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    e,
                    ListAttachedRolePoliciesError::is_no_such_entity_exception,
                    || role_not_found(role_name),
                    "list managed policies",
                    role_name,
                )
            })?;

        Ok(attachments(&response, role_name))
    }

    async fn get_inline_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> RoleExtractorResult<String> {
        debug!("Calling GetRolePolicy for '{}' on '{}'", policy_name, role_name);
        let response = self
            .client
            .get_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    e,
                    GetRolePolicyError::is_no_such_entity_exception,
                    || RoleExtractorError::NotFound {
                        entity: "inline policy",
                        name: policy_name.to_string(),
                    },
                    "get inline policy",
                    role_name,
                )
            })?;

        Ok(response.policy_document)
    }
}
