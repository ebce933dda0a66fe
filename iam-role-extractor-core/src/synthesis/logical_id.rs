//! CloudFormation logical resource names derived from IAM role names.

/// Strip hyphens from a role name so it can key a template resource.
///
/// Lossy: `a-bc` and `ab-c` both map to `abc`.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.replace('-', "")
}
