//! Command-line interface for cfn-manage.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use cfn_manage_aws::AwsProvisioner;
use cfn_manage_core::logging::init_logging;
use cfn_manage_core::{ClientConfig, IndexMap, StackConfig, StackDescriptor};

mod commands;
mod output;
mod progress;

pub use commands::*;
pub use output::*;
pub use progress::*;

/// CLI arguments parser
#[derive(Parser, Debug)]
#[command(author, version, about = "Create, update and delete CloudFormation stacks", long_about = None)]
pub struct Cli {
    /// Client config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the request that would be sent instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the stack (returns once CloudFormation accepts the request)
    Create(StackArgs),

    /// Update the stack's template and parameters
    Update(StackArgs),

    /// Delete the stack and wait until it is gone
    Delete(StackArgs),

    /// Show the derived capabilities, parameters and tags
    Show(StackArgs),
}

/// Where the stack definition comes from
#[derive(Args, Debug, Clone, Default)]
pub struct StackArgs {
    /// TOML stack file
    #[arg(short = 'f', long, value_name = "FILE", conflicts_with_all = ["name", "template_url", "iam", "parameters"])]
    pub stack_file: Option<PathBuf>,

    /// Stack name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Template location (S3 URL)
    #[arg(short, long)]
    pub template_url: Option<String>,

    /// The template creates or changes IAM resources
    #[arg(long)]
    pub iam: bool,

    /// Stack parameter, repeatable, order is kept
    #[arg(short = 'p', long = "parameter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub parameters: Vec<(String, String)>,
}

impl StackArgs {
    /// Resolve the arguments into a descriptor
    pub fn descriptor(&self) -> Result<StackDescriptor> {
        if let Some(path) = &self.stack_file {
            let config = StackConfig::from_file(path)
                .with_context(|| format!("reading stack file {}", path.display()))?;
            return Ok(StackDescriptor::from_config(&config)?);
        }

        let (Some(name), Some(template_url)) = (&self.name, &self.template_url) else {
            bail!("either --stack-file or both --name and --template-url are required");
        };
        let extra: IndexMap<String, String> = self.parameters.iter().cloned().collect();
        Ok(StackDescriptor::new(
            name.clone(),
            template_url.clone(),
            self.iam,
            extra,
        )?)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn load_client_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display())),
        None => Ok(ClientConfig::default()),
    }
}

/// Run the CLI application
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli).await
}

/// Execute a parsed command line
pub async fn execute(cli: Cli) -> Result<()> {
    let config = load_client_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Show(args) => {
            let stack = args.descriptor()?;
            commands::execute_show(&stack)?;
        }
        Commands::Create(args) => {
            let mut stack = args.descriptor()?;
            if cli.dry_run {
                print_json(&stack.create_request())?;
                return Ok(());
            }
            let provisioner = AwsProvisioner::from_config(&config).await;
            commands::execute_create(&mut stack, &provisioner).await?;
        }
        Commands::Update(args) => {
            let mut stack = args.descriptor()?;
            if cli.dry_run {
                print_json(&stack.update_request())?;
                return Ok(());
            }
            let provisioner = AwsProvisioner::from_config(&config).await;
            commands::execute_update(&mut stack, &provisioner).await?;
        }
        Commands::Delete(args) => {
            let mut stack = args.descriptor()?;
            if cli.dry_run {
                print_json(&stack.delete_request())?;
                return Ok(());
            }
            let provisioner = AwsProvisioner::from_config(&config).await;
            commands::execute_delete(&mut stack, &provisioner, &config.waiter).await?;
        }
    }

    Ok(())
}
