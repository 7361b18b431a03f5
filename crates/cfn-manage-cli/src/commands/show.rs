use anyhow::Result;
use serde_json::json;

use cfn_manage_core::StackDescriptor;

use crate::output::print_json;

/// Execute the show command; no requests are sent
pub fn execute(stack: &StackDescriptor) -> Result<()> {
    print_json(&json!({
        "StackName": stack.name(),
        "TemplateURL": stack.template_url(),
        "Capabilities": stack.capabilities(),
        "Parameters": stack.parameters(),
        "Tags": stack.tags(),
    }))
}
