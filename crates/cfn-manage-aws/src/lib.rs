//! CloudFormation-backed [`Provisioner`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksError;
use aws_sdk_cloudformation::operation::RequestId;
use aws_sdk_cloudformation::types as sdk;
use aws_sdk_cloudformation::Client;
use tracing::debug;

use cfn_manage_core::{
    CfnError, CfnResult, ClientConfig, CreateStackRequest, DeleteStackRequest, Parameter,
    Provisioner, StackResponse, StackStatus, Tag, UpdateStackRequest,
};

/// Provisioner that talks to the CloudFormation API.
///
/// One SDK client is built up front and shared by every call.
#[derive(Debug, Clone)]
pub struct AwsProvisioner {
    client: Client,
}

impl AwsProvisioner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS chain plus any overrides in `config`
    pub async fn from_config(config: &ClientConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;
        debug!(region = ?shared.region(), "loaded aws config");

        Self::new(Client::new(&shared))
    }
}

fn to_sdk_parameters(parameters: &[Parameter]) -> Vec<sdk::Parameter> {
    parameters
        .iter()
        .map(|p| {
            sdk::Parameter::builder()
                .parameter_key(&p.parameter_key)
                .parameter_value(&p.parameter_value)
                .build()
        })
        .collect()
}

fn to_sdk_tags(tags: &[Tag]) -> CfnResult<Vec<sdk::Tag>> {
    tags.iter()
        .map(|t| {
            Ok(sdk::Tag::builder()
                .key(&t.key)
                .value(&t.value)
                .build())
        })
        .collect()
}

fn to_sdk_capabilities(request_caps: &[cfn_manage_core::Capability]) -> Vec<sdk::Capability> {
    request_caps
        .iter()
        .map(|c| sdk::Capability::from(c.as_str()))
        .collect()
}

fn provisioning_error<E, R>(operation: &str, err: SdkError<E, R>) -> CfnError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    CfnError::provisioning(format!("{} failed: {}", operation, DisplayErrorContext(&err)))
}

/// DescribeStacks answers a ValidationError for names it does not know
fn is_missing_stack<R>(err: &SdkError<DescribeStacksError, R>) -> bool {
    err.as_service_error()
        .map(|e| {
            e.code() == Some("ValidationError")
                && e.message().is_some_and(|m| m.contains("does not exist"))
        })
        .unwrap_or(false)
}

#[async_trait]
impl Provisioner for AwsProvisioner {
    async fn create_stack(&self, request: &CreateStackRequest) -> CfnResult<StackResponse> {
        let output = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .timeout_in_minutes(request.timeout_in_minutes)
            .on_failure(sdk::OnFailure::from(request.on_failure.as_str()))
            .set_capabilities(Some(to_sdk_capabilities(&request.capabilities)))
            .template_url(&request.template_url)
            .set_parameters(Some(to_sdk_parameters(&request.parameters)))
            .set_tags(Some(to_sdk_tags(&request.tags)?))
            .send()
            .await
            .map_err(|e| provisioning_error("CreateStack", e))?;

        Ok(StackResponse {
            stack_id: output.stack_id().map(str::to_string),
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn update_stack(&self, request: &UpdateStackRequest) -> CfnResult<StackResponse> {
        let output = self
            .client
            .update_stack()
            .stack_name(&request.stack_name)
            .set_capabilities(Some(to_sdk_capabilities(&request.capabilities)))
            .template_url(&request.template_url)
            .set_parameters(Some(to_sdk_parameters(&request.parameters)))
            .send()
            .await
            .map_err(|e| provisioning_error("UpdateStack", e))?;

        Ok(StackResponse {
            stack_id: output.stack_id().map(str::to_string),
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn delete_stack(&self, request: &DeleteStackRequest) -> CfnResult<StackResponse> {
        let output = self
            .client
            .delete_stack()
            .stack_name(&request.stack_name)
            .send()
            .await
            .map_err(|e| provisioning_error("DeleteStack", e))?;

        Ok(StackResponse {
            stack_id: None,
            request_id: output.request_id().map(str::to_string),
        })
    }

    async fn describe_stack_status(&self, stack_name: &str) -> CfnResult<Option<StackStatus>> {
        match self.client.describe_stacks().stack_name(stack_name).send().await {
            Ok(output) => Ok(output
                .stacks()
                .first()
                .and_then(|stack| stack.stack_status())
                .map(|status| StackStatus::from(status.as_str()))),
            Err(err) if is_missing_stack(&err) => Ok(None),
            Err(err) => Err(provisioning_error("DescribeStacks", err)),
        }
    }
}
