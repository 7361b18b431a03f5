use async_trait::async_trait;

use crate::error::CfnResult;
use crate::types::{
    CreateStackRequest, DeleteStackRequest, StackResponse, StackStatus, UpdateStackRequest,
};

/// Client for the service that provisions stacks.
///
/// Every method is a single request/response round trip. Implementations
/// report provider rejections as [`crate::CfnError::Provisioning`] and never
/// retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Start creating a stack
    async fn create_stack(&self, request: &CreateStackRequest) -> CfnResult<StackResponse>;

    /// Start updating an existing stack
    async fn update_stack(&self, request: &UpdateStackRequest) -> CfnResult<StackResponse>;

    /// Start deleting a stack
    async fn delete_stack(&self, request: &DeleteStackRequest) -> CfnResult<StackResponse>;

    /// Current status of a stack, `None` once the service no longer knows it
    async fn describe_stack_status(&self, stack_name: &str) -> CfnResult<Option<StackStatus>>;
}
