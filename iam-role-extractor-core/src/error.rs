//! Error types for IAM Role Extractor operations.

use thiserror::Error;

/// Errors raised while extracting and rendering an IAM role.
#[derive(Debug, Error)]
pub enum RoleExtractorError {
    /// Required input is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The IAM entity does not exist.
    #[error("IAM {entity} '{name}' was not found")]
    NotFound { entity: &'static str, name: String },

    /// A call to the IAM service failed.
    #[error("Failed to {operation} for role '{role_name}': {message}")]
    RemoteCall {
        operation: &'static str,
        role_name: String,
        message: String,
    },

    /// A fetched permission document is not valid percent-encoded UTF-8.
    #[error("Failed to URL decode policy document: {0}")]
    Decode(String),

    /// A permission document could not be converted to YAML.
    #[error("Failed to convert policy document to YAML: {0}")]
    Conversion(String),

    /// An inline policy could not be fetched or transcoded.
    #[error("Inline policy '{policy_name}' could not be rendered")]
    InlinePolicy {
        policy_name: String,
        #[source]
        source: Box<RoleExtractorError>,
    },

    /// The role's trust policy could not be transcoded.
    #[error("Trust policy could not be rendered")]
    TrustPolicy {
        #[source]
        source: Box<RoleExtractorError>,
    },
}

impl RoleExtractorError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn remote_call(
        operation: &'static str,
        role_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteCall {
            operation,
            role_name: role_name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn inline_policy(policy_name: impl Into<String>, source: Self) -> Self {
        Self::InlinePolicy {
            policy_name: policy_name.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn trust_policy(source: Self) -> Self {
        Self::TrustPolicy {
            source: Box::new(source),
        }
    }

    /// True when the error means the requested IAM entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::InlinePolicy { source, .. } | Self::TrustPolicy { source } => {
                source.is_not_found()
            }
            _ => false,
        }
    }
}

pub type RoleExtractorResult<T> = Result<T, RoleExtractorError>;
