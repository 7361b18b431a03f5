//! In-memory stand-in for CloudFormation, for exercising stack code in tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CfnError, CfnResult};
use crate::provisioner::Provisioner;
use crate::types::{
    Capability, CreateStackRequest, DeleteStackRequest, Parameter, StackResponse, StackStatus,
    Tag, UpdateStackRequest,
};

/// A request received by [`InMemoryProvisioner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Create(CreateStackRequest),
    Update(UpdateStackRequest),
    Delete(DeleteStackRequest),
    Describe(String),
}

/// Stack as held by the in-memory service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStack {
    pub stack_id: String,
    pub status: StackStatus,
    pub template_url: String,
    pub capabilities: Vec<Capability>,
    pub parameters: Vec<Parameter>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Default)]
struct State {
    templates: HashSet<String>,
    stacks: HashMap<String, MemoryStack>,
    failing_deletes: HashSet<String>,
    requests: Vec<RecordedRequest>,
    next_id: u64,
}

impl State {
    fn next_request_id(&mut self) -> String {
        self.next_id += 1;
        format!("req-{:08}", self.next_id)
    }
}

/// Provisioner that keeps stacks in memory.
///
/// Creates and updates complete instantly. A deleted stack reports
/// `DELETE_IN_PROGRESS` on the first status poll and is gone after that.
#[derive(Debug, Default)]
pub struct InMemoryProvisioner {
    state: Mutex<State>,
}

impl InMemoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a template URL resolvable
    pub fn with_template(mut self, template_url: impl Into<String>) -> Self {
        self.state.get_mut().templates.insert(template_url.into());
        self
    }

    /// The next delete of `stack_name` ends in `DELETE_FAILED`
    pub async fn fail_next_delete(&self, stack_name: impl Into<String>) {
        self.state.lock().await.failing_deletes.insert(stack_name.into());
    }

    /// Snapshot of a stack, if the service knows it
    pub async fn stack(&self, stack_name: &str) -> Option<MemoryStack> {
        self.state.lock().await.stacks.get(stack_name).cloned()
    }

    /// Every request received so far, oldest first
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

#[async_trait]
impl Provisioner for InMemoryProvisioner {
    async fn create_stack(&self, request: &CreateStackRequest) -> CfnResult<StackResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(RecordedRequest::Create(request.clone()));

        if state.stacks.contains_key(&request.stack_name) {
            return Err(CfnError::provisioning(format!(
                "AlreadyExistsException: Stack [{}] already exists",
                request.stack_name
            )));
        }
        if !state.templates.contains(&request.template_url) {
            return Err(CfnError::provisioning(format!(
                "ValidationError: TemplateURL {} could not be fetched",
                request.template_url
            )));
        }

        let request_id = state.next_request_id();
        let stack_id = format!(
            "arn:aws:cloudformation:us-east-1:123456789012:stack/{}/{}",
            request.stack_name, request_id
        );
        state.stacks.insert(
            request.stack_name.clone(),
            MemoryStack {
                stack_id: stack_id.clone(),
                status: StackStatus::CreateComplete,
                template_url: request.template_url.clone(),
                capabilities: request.capabilities.clone(),
                parameters: request.parameters.clone(),
                tags: request.tags.clone(),
            },
        );
        debug!(stack = %request.stack_name, "created in-memory stack");

        Ok(StackResponse {
            stack_id: Some(stack_id),
            request_id: Some(request_id),
        })
    }

    async fn update_stack(&self, request: &UpdateStackRequest) -> CfnResult<StackResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(RecordedRequest::Update(request.clone()));

        if !state.templates.contains(&request.template_url) {
            return Err(CfnError::provisioning(format!(
                "ValidationError: TemplateURL {} could not be fetched",
                request.template_url
            )));
        }
        let request_id = state.next_request_id();
        let stack = state.stacks.get_mut(&request.stack_name).ok_or_else(|| {
            CfnError::provisioning(format!(
                "ValidationError: Stack [{}] does not exist",
                request.stack_name
            ))
        })?;

        if stack.template_url == request.template_url
            && stack.parameters == request.parameters
            && stack.capabilities == request.capabilities
        {
            return Err(CfnError::provisioning(
                "ValidationError: No updates are to be performed.",
            ));
        }

        stack.template_url = request.template_url.clone();
        stack.parameters = request.parameters.clone();
        stack.capabilities = request.capabilities.clone();
        stack.status = StackStatus::UpdateComplete;

        Ok(StackResponse {
            stack_id: Some(stack.stack_id.clone()),
            request_id: Some(request_id),
        })
    }

    async fn delete_stack(&self, request: &DeleteStackRequest) -> CfnResult<StackResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(RecordedRequest::Delete(request.clone()));

        let fail = state.failing_deletes.remove(&request.stack_name);
        if let Some(stack) = state.stacks.get_mut(&request.stack_name) {
            stack.status = if fail {
                StackStatus::DeleteFailed
            } else {
                StackStatus::DeleteInProgress
            };
        }

        Ok(StackResponse {
            stack_id: None,
            request_id: Some(state.next_request_id()),
        })
    }

    async fn describe_stack_status(&self, stack_name: &str) -> CfnResult<Option<StackStatus>> {
        let mut state = self.state.lock().await;
        state
            .requests
            .push(RecordedRequest::Describe(stack_name.to_string()));

        let Some(stack) = state.stacks.get_mut(stack_name) else {
            return Ok(None);
        };
        let status = stack.status.clone();
        match status {
            StackStatus::DeleteInProgress => stack.status = StackStatus::DeleteComplete,
            StackStatus::DeleteComplete => {
                state.stacks.remove(stack_name);
                return Ok(None);
            }
            _ => {}
        }
        Ok(Some(status))
    }
}
