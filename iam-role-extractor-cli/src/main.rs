//! IAM Role Extractor CLI
//!
//! Reads an existing IAM role and prints it as a CloudFormation YAML fragment.
//!
//! # Usage
//! ```bash
//! iam-role-extractor extract-role --role-name my-app-role
//! iam-role-extractor extract-role -r my-app-role -s --file-name my-app-role.yaml
//! ```
//!
//! AWS credentials and region come from the default provider chain
//! (`AWS_PROFILE`, `AWS_REGION`, shared config files, instance metadata).
//! `--profile` and `--region` override it. `RUST_LOG` overrides the log level.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use iam_role_extractor_core::{validate_role_name, AwsOptions, RoleExtractorService};
use log::debug;

mod output;

use output::{write_fragment, OutputOptions};

#[derive(Parser, Debug)]
#[command(name = "iam-role-extractor")]
#[command(version, about = "Render an existing IAM role as a CloudFormation YAML fragment", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract an IAM role, its trust policy, and its policies
    ExtractRole(ExtractRoleArgs),
}

#[derive(Args, Debug)]
struct ExtractRoleArgs {
    /// AWS IAM role name to extract
    #[arg(short = 'r', long)]
    role_name: String,

    /// Do not print the YAML fragment to stdout
    #[arg(short = 's', long)]
    suppress_output_stdout: bool,

    /// File to write the YAML fragment to. An existing file is replaced.
    #[arg(long, value_name = "PATH")]
    file_name: Option<PathBuf>,

    /// AWS region (overrides the default provider chain)
    #[arg(long)]
    region: Option<String>,

    /// AWS named profile (overrides the default provider chain)
    #[arg(long)]
    profile: Option<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn extract_role(args: ExtractRoleArgs) -> Result<()> {
    validate_role_name(&args.role_name)?;

    let aws_options = AwsOptions {
        region: args.region,
        profile: args.profile,
    };
    debug!("Loading AWS configuration: {:?}", aws_options);
    let service = RoleExtractorService::new(&aws_options).await;

    let fragment = service
        .render(&args.role_name)
        .await
        .with_context(|| format!("Failed to extract IAM role '{}'", args.role_name))?;

    let options = OutputOptions {
        suppress_stdout: args.suppress_output_stdout,
        file_name: args.file_name,
    };
    write_fragment(fragment.as_str(), &mut std::io::stdout().lock(), &options)
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::ExtractRole(args) => extract_role(args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
