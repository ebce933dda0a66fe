use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use iam_role_extractor_core::{
    ManagedPolicyAttachment, RoleDirectory, RoleExtractorError, RoleExtractorResult,
    RoleExtractorService, RoleSnapshot,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::{json, Value};

fn encode(json: &str) -> String {
    utf8_percent_encode(json, NON_ALPHANUMERIC).to_string()
}

/// In-memory role directory that records every call it receives.
struct MockDirectory {
    role: Option<RoleSnapshot>,
    inline_policies: Vec<(String, String)>,
    failing_policies: Vec<String>,
    /// Policy name -> number of times its fetch yields before completing.
    delays: HashMap<String, usize>,
    managed_policies: Vec<ManagedPolicyAttachment>,
    calls: Mutex<Vec<String>>,
}

impl MockDirectory {
    fn new() -> Self {
        Self {
            role: Some(RoleSnapshot {
                name: "test-role-name".to_string(),
                description: Some("mock-description".to_string()),
                path: "/".to_string(),
                max_session_duration: 3600,
                trust_policy: encode(r#"{"a":1}"#),
            }),
            inline_policies: vec![
                ("policy1".to_string(), encode(r#"{"b":2}"#)),
                ("policy2".to_string(), encode(r#"{"b":2}"#)),
            ],
            failing_policies: Vec::new(),
            delays: HashMap::new(),
            managed_policies: vec![ManagedPolicyAttachment::new("mock-policy-1-arn")],
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait]
impl RoleDirectory for MockDirectory {
    async fn get_role(&self, role_name: &str) -> RoleExtractorResult<RoleSnapshot> {
        self.record(format!("GetRole:{role_name}"));
        self.role.clone().ok_or_else(|| RoleExtractorError::NotFound {
            entity: "role",
            name: role_name.to_string(),
        })
    }

    async fn list_inline_policy_names(&self, role_name: &str) -> RoleExtractorResult<Vec<String>> {
        self.record(format!("ListRolePolicies:{role_name}"));
        Ok(self
            .inline_policies
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn list_attached_managed_policies(
        &self,
        role_name: &str,
    ) -> RoleExtractorResult<Vec<ManagedPolicyAttachment>> {
        self.record(format!("ListAttachedRolePolicies:{role_name}"));
        Ok(self.managed_policies.clone())
    }

    async fn get_inline_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> RoleExtractorResult<String> {
        for _ in 0..self.delays.get(policy_name).copied().unwrap_or(0) {
            tokio::task::yield_now().await;
        }
        self.record(format!("GetRolePolicy:{role_name}:{policy_name}"));

        if self.failing_policies.iter().any(|p| p == policy_name) {
            return Err(RoleExtractorError::remote_call(
                "get inline policy",
                role_name,
                "throttled",
            ));
        }

        self.inline_policies
            .iter()
            .find(|(name, _)| name == policy_name)
            .map(|(_, document)| document.clone())
            .ok_or_else(|| RoleExtractorError::NotFound {
                entity: "inline policy",
                name: policy_name.to_string(),
            })
    }
}

#[tokio::test]
async fn test_render_role_end_to_end() {
    let service = RoleExtractorService::with_directory(MockDirectory::new());

    let fragment = service
        .render("test-role-name")
        .await
        .expect("render should succeed");
    let text = fragment.as_str();

    assert_eq!(fragment.logical_id(), "testrolename");
    assert!(text.starts_with("testrolename:\n"), "fragment was:\n{text}");
    assert!(text.contains("    RoleName: test-role-name\n"), "fragment was:\n{text}");
    assert!(text.contains("    Description: mock-description\n"));
    assert!(text.contains("    AssumeRolePolicyDocument:\n      a: 1\n"));
    assert!(text.contains("    MaxSessionDuration: 3600\n"));
    assert!(text.contains("    Path: '/'\n"));
    assert!(text.contains(
        "    Policies:\n      - PolicyName: policy1\n        PolicyDocument:\n          b: 2\n      - PolicyName: policy2\n        PolicyDocument:\n          b: 2\n"
    ));
    assert!(text.contains("    ManagedPolicyArns:\n      - mock-policy-1-arn\n"));
    assert_eq!(text.matches("PolicyName:").count(), 2);

    let parsed: Value = serde_yaml::from_str(text).expect("fragment should be valid YAML");
    let properties = &parsed["testrolename"]["Properties"];
    assert_eq!(parsed["testrolename"]["Type"], json!("AWS::IAM::Role"));
    assert_eq!(properties["AssumeRolePolicyDocument"], json!({"a": 1}));
    assert_eq!(
        properties["Policies"],
        json!([
            {"PolicyName": "policy1", "PolicyDocument": {"b": 2}},
            {"PolicyName": "policy2", "PolicyDocument": {"b": 2}}
        ])
    );
    assert_eq!(properties["ManagedPolicyArns"], json!(["mock-policy-1-arn"]));
}

#[tokio::test]
async fn test_render_role_without_policies() {
    let mut directory = MockDirectory::new();
    directory.inline_policies.clear();
    directory.managed_policies.clear();
    let service = RoleExtractorService::with_directory(directory);

    let fragment = service.render("test-role-name").await.expect("render should succeed");
    let text = fragment.to_string();

    assert!(text.contains("    Policies: []\n"), "fragment was:\n{text}");
    assert!(text.contains("    ManagedPolicyArns: []\n"), "fragment was:\n{text}");
    let parsed: Value = serde_yaml::from_str(&text).expect("fragment should be valid YAML");
    assert_eq!(parsed["testrolename"]["Properties"]["Policies"], json!([]));
    assert_eq!(parsed["testrolename"]["Properties"]["ManagedPolicyArns"], json!([]));
}

#[tokio::test]
async fn test_render_role_not_found() {
    let mut directory = MockDirectory::new();
    directory.role = None;
    let service = RoleExtractorService::with_directory(directory);

    let err = service
        .render("test-role-name")
        .await
        .expect_err("missing role should fail");

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "IAM role 'test-role-name' was not found");
    assert_eq!(service.directory_calls(), vec!["GetRole:test-role-name"]);
}

#[tokio::test]
async fn test_render_requires_role_name() {
    let service = RoleExtractorService::with_directory(MockDirectory::new());

    let err = service.render("").await.expect_err("empty role name should fail");

    assert!(matches!(err, RoleExtractorError::Configuration(_)));
    assert!(service.directory_calls().is_empty());
}

#[tokio::test]
async fn test_render_fails_fast_on_inline_policy_fetch_error() {
    let mut directory = MockDirectory::new();
    directory.failing_policies.push("policy2".to_string());
    let service = RoleExtractorService::with_directory(directory);

    let err = service
        .render("test-role-name")
        .await
        .expect_err("failed policy fetch should abort the render");

    match &err {
        RoleExtractorError::InlinePolicy { policy_name, source } => {
            assert_eq!(policy_name, "policy2");
            assert!(matches!(**source, RoleExtractorError::RemoteCall { .. }));
        }
        other => panic!("expected InlinePolicy error, got {other:?}"),
    }
    let source = std::error::Error::source(&err).expect("source should be kept");
    assert!(source.to_string().contains("throttled"));
}

#[tokio::test]
async fn test_render_fails_on_malformed_inline_policy_document() {
    let mut directory = MockDirectory::new();
    directory.inline_policies[0].1 = "%7B%22b%22%3A2%zz".to_string();
    let service = RoleExtractorService::with_directory(directory);

    let err = service
        .render("test-role-name")
        .await
        .expect_err("malformed document should abort the render");

    match err {
        RoleExtractorError::InlinePolicy { policy_name, source } => {
            assert_eq!(policy_name, "policy1");
            assert!(matches!(*source, RoleExtractorError::Decode(_)));
        }
        other => panic!("expected InlinePolicy error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_render_fails_on_invalid_trust_policy_json() {
    let mut directory = MockDirectory::new();
    if let Some(role) = directory.role.as_mut() {
        role.trust_policy = encode("{\"a\":");
    }
    let service = RoleExtractorService::with_directory(directory);

    let err = service
        .render("test-role-name")
        .await
        .expect_err("invalid trust policy should abort the render");

    match err {
        RoleExtractorError::TrustPolicy { source } => {
            assert!(matches!(*source, RoleExtractorError::Conversion(_)));
        }
        other => panic!("expected TrustPolicy error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_render_keeps_listing_order_when_fetches_finish_out_of_order() {
    let mut directory = MockDirectory::new();
    directory.inline_policies = vec![
        ("slow".to_string(), encode(r#"{"order":1}"#)),
        ("medium".to_string(), encode(r#"{"order":2}"#)),
        ("fast".to_string(), encode(r#"{"order":3}"#)),
    ];
    directory.delays.insert("slow".to_string(), 8);
    directory.delays.insert("medium".to_string(), 4);
    let service = RoleExtractorService::with_directory(directory);

    let fragment = service.render("test-role-name").await.expect("render should succeed");

    let fetch_order: Vec<String> = service
        .directory_calls()
        .into_iter()
        .filter(|call| call.starts_with("GetRolePolicy:"))
        .collect();
    assert_eq!(
        fetch_order,
        vec![
            "GetRolePolicy:test-role-name:fast",
            "GetRolePolicy:test-role-name:medium",
            "GetRolePolicy:test-role-name:slow",
        ]
    );

    let parsed: Value = serde_yaml::from_str(fragment.as_str()).expect("valid YAML");
    let names: Vec<&str> = parsed["testrolename"]["Properties"]["Policies"]
        .as_array()
        .expect("Policies should be a list")
        .iter()
        .filter_map(|policy| policy["PolicyName"].as_str())
        .collect();
    assert_eq!(names, vec!["slow", "medium", "fast"]);
}

#[tokio::test]
async fn test_render_nested_policy_document() {
    let mut directory = MockDirectory::new();
    let document = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["s3:GetObject","s3:ListBucket"],"Resource":["arn:aws:s3:::bucket","arn:aws:s3:::bucket/*"],"Condition":{"Bool":{"aws:SecureTransport":"true"}}}]}"#;
    directory.inline_policies = vec![("s3-access".to_string(), encode(document))];
    let service = RoleExtractorService::with_directory(directory);

    let fragment = service.render("test-role-name").await.expect("render should succeed");

    let parsed: Value = serde_yaml::from_str(fragment.as_str()).expect("valid YAML");
    let original: Value = serde_json::from_str(document).expect("valid JSON");
    assert_eq!(
        parsed["testrolename"]["Properties"]["Policies"][0]["PolicyDocument"],
        original
    );
    assert_eq!(
        parsed["testrolename"]["Properties"]["Policies"][0]["PolicyName"],
        json!("s3-access")
    );
}

trait DirectoryCalls {
    fn directory_calls(&self) -> Vec<String>;
}

impl DirectoryCalls for RoleExtractorService<MockDirectory> {
    fn directory_calls(&self) -> Vec<String> {
        self.directory().calls()
    }
}
