//! AWS SDK integration: configuration loading and the IAM backed role directory.

pub(crate) mod iam_client;

pub use iam_client::AwsRoleDirectory;

/// Overrides applied on top of the default AWS configuration chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Load AWS configuration using the standard credential provider chain.
pub(crate) async fn load_config(options: &AwsOptions) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(profile) = &options.profile {
        log::debug!("Using AWS profile '{}'", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(region) = &options.region {
        log::debug!("Using AWS region '{}'", region);
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    loader.load().await
}
