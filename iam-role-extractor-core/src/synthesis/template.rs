//! CloudFormation `AWS::IAM::Role` fragment assembly.
//!
//! Policy documents are nested at fixed columns: the trust policy under
//! `AssumeRolePolicyDocument` at column 6, each inline policy document under
//! its `PolicyDocument` key at column 10. List entries start at column 6.

use crate::error::{RoleExtractorError, RoleExtractorResult};
use crate::synthesis::transcode::indent;

pub(crate) const RESOURCE_TYPE: &str = "AWS::IAM::Role";
pub(crate) const TRUST_POLICY_INDENT: usize = 6;
pub(crate) const INLINE_POLICY_INDENT: usize = 10;
const LIST_ITEM_PREFIX: &str = "\n      - ";

/// Render a string as a single-line YAML scalar, quoting only when needed.
pub(crate) fn yaml_scalar(value: &str) -> RoleExtractorResult<String> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| RoleExtractorError::Conversion(e.to_string()))?;
    let yaml = yaml.trim_end_matches('\n');
    if yaml.contains('\n') {
        // Block scalars cannot sit after a key on the same line; a JSON string
        // is a valid double-quoted YAML scalar.
        return serde_json::to_string(value)
            .map_err(|e| RoleExtractorError::Conversion(e.to_string()));
    }
    Ok(yaml.to_string())
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn yaml_list(items: &[String]) -> String {
    if items.is_empty() {
        " []".to_string()
    } else {
        format!("{LIST_ITEM_PREFIX}{}", items.join(LIST_ITEM_PREFIX))
    }
}

/// Build one `Policies` list entry. The caller supplies the policy document
/// already converted to YAML; it is shifted under `PolicyDocument` here.
pub(crate) fn inline_policy_segment(
    policy_name: &str,
    document_yaml: &str,
) -> RoleExtractorResult<String> {
    Ok(format!(
        "PolicyName: {}\n        PolicyDocument:\n{}",
        yaml_scalar(policy_name)?,
        indent(document_yaml, INLINE_POLICY_INDENT)
    ))
}

/// Everything needed to render one role resource.
#[derive(Debug)]
pub(crate) struct RoleTemplate<'a> {
    pub logical_id: &'a str,
    pub role_name: &'a str,
    pub description: Option<&'a str>,
    pub trust_policy_yaml: &'a str,
    pub max_session_duration: i32,
    pub path: &'a str,
    pub inline_policies: &'a [String],
    pub managed_policy_arns: &'a [String],
}

impl RoleTemplate<'_> {
    pub(crate) fn render(&self) -> RoleExtractorResult<String> {
        let mut out = String::new();
        out.push_str(&format!("{}:\n", self.logical_id));
        out.push_str(&format!("  Type: {RESOURCE_TYPE}\n"));
        out.push_str("  Properties:\n");
        out.push_str(&format!("    RoleName: {}\n", yaml_scalar(self.role_name)?));
        if let Some(description) = self.description {
            out.push_str(&format!("    Description: {}\n", yaml_scalar(description)?));
        }
        out.push_str("    AssumeRolePolicyDocument:\n");
        out.push_str(&indent(self.trust_policy_yaml, TRUST_POLICY_INDENT));
        out.push('\n');
        out.push_str(&format!(
            "    MaxSessionDuration: {}\n",
            self.max_session_duration
        ));
        out.push_str(&format!("    Path: {}\n", single_quoted(self.path)));
        out.push_str(&format!("    Policies:{}\n", yaml_list(self.inline_policies)));

        let arns = self
            .managed_policy_arns
            .iter()
            .map(|arn| yaml_scalar(arn))
            .collect::<RoleExtractorResult<Vec<_>>>()?;
        out.push_str(&format!("    ManagedPolicyArns:{}\n", yaml_list(&arns)));

        Ok(out)
    }
}
