//! Data types shared by the role directory and the fragment assembler.

use std::fmt;

/// Default `MaxSessionDuration` IAM applies to roles created without one.
pub const DEFAULT_MAX_SESSION_DURATION: i32 = 3600;

/// Snapshot of an IAM role as returned by `GetRole`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSnapshot {
    pub name: String,
    pub description: Option<String>,
    pub path: String,
    pub max_session_duration: i32,
    /// URL-encoded JSON trust policy.
    pub trust_policy: String,
}

/// A managed policy attached to a role. Only the ARN is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicyAttachment {
    pub arn: String,
}

impl ManagedPolicyAttachment {
    pub fn new(arn: impl Into<String>) -> Self {
        Self { arn: arn.into() }
    }
}

/// A rendered CloudFormation fragment for one `AWS::IAM::Role` resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFragment {
    logical_id: String,
    text: String,
}

impl RenderedFragment {
    pub(crate) fn new(logical_id: String, text: String) -> Self {
        Self { logical_id, text }
    }

    /// Logical resource name the fragment is keyed by.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for RenderedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
