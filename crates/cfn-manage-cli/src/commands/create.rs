use anyhow::Result;
use tracing::info;

use cfn_manage_core::{Provisioner, StackDescriptor};

use crate::output::{format_success, print_json};

/// Execute the create command
pub async fn execute<P>(stack: &mut StackDescriptor, provisioner: &P) -> Result<()>
where
    P: Provisioner + ?Sized,
{
    info!(stack = stack.name(), "creating stack");
    stack.create_stack(provisioner).await?;

    eprintln!("{}", format_success(&format!("create of {} accepted", stack.name())));
    if let Some(response) = stack.last_create_result() {
        print_json(response)?;
    }
    Ok(())
}
