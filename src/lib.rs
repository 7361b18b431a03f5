//! Manage AWS CloudFormation stacks.
//!
//! Create, update and delete a stack from a name, a template URL and an
//! ordered set of parameters. The owner, product and environment parameters
//! are also applied as stack tags.

pub use cfn_manage_aws as aws;
pub use cfn_manage_core as core;

pub use cfn_manage_aws::AwsProvisioner;
pub use cfn_manage_core::{CfnError, CfnResult, StackDescriptor};
