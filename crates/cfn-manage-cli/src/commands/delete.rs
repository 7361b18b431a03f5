use anyhow::Result;
use tracing::info;

use cfn_manage_core::{Provisioner, StackDescriptor, WaiterConfig};

use crate::output::{format_success, print_json};
use crate::progress::WaitSpinner;

/// Execute the delete command, blocking until the stack is gone
pub async fn execute<P>(
    stack: &mut StackDescriptor,
    provisioner: &P,
    waiter: &WaiterConfig,
) -> Result<()>
where
    P: Provisioner + ?Sized,
{
    info!(stack = stack.name(), max_wait = ?waiter.max_wait(), "deleting stack");

    let spinner = WaitSpinner::start(&format!("Deleting {}...", stack.name()));
    let result = stack.delete_stack(provisioner, waiter).await;
    match &result {
        Ok(()) => spinner.finish(&format!("{} deleted", stack.name())),
        Err(_) => spinner.abandon(&format!("delete of {} did not complete", stack.name())),
    }
    result?;

    eprintln!("{}", format_success(&format!("{} deleted", stack.name())));
    if let Some(response) = stack.last_delete_result() {
        print_json(response)?;
    }
    Ok(())
}
