//! This crate provides the core logic for IAM Role Extractor:
//! - IAM role, inline policy, and managed policy lookups
//! - URL-encoded JSON policy documents converted to YAML
//! - Assembly of a CloudFormation `AWS::IAM::Role` fragment
//!

mod aws;
pub mod commands;
mod directory;
mod error;
pub mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use aws::{AwsOptions, AwsRoleDirectory};
pub use commands::{validate_role_name, RoleExtractorService};
pub use directory::RoleDirectory;
pub use error::{RoleExtractorError, RoleExtractorResult};
pub use synthesis::{decode_document, indent, sanitize_identifier, to_structured_text};
pub use types::{
    ManagedPolicyAttachment, RenderedFragment, RoleSnapshot, DEFAULT_MAX_SESSION_DURATION,
};
