//! A single CloudFormation stack and its lifecycle operations.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::StackConfig;
use crate::error::{CfnError, CfnResult};
use crate::provisioner::Provisioner;
use crate::types::{
    Capability, CreateStackRequest, DeleteStackRequest, OnFailure, Parameter, StackResponse, Tag,
    UpdateStackRequest, CREATE_TIMEOUT_MINUTES,
};
use crate::waiter::{wait_until_deleted, WaiterConfig};

/// Extra argument keys that are also applied as stack tags
pub const RESERVED_TAG_KEYS: [&str; 3] = ["owner", "product", "environment"];

/// Identity fields that may not be passed as extra arguments
const IDENTITY_KEYS: [&str; 3] = ["name", "template_url", "iam"];

/// A stack's identity, template and derived parameter/tag lists.
///
/// Parameters and tags are computed once at construction. The `last_*`
/// fields hold the response of the most recent successful call of each kind.
#[derive(Debug, Clone, Serialize)]
pub struct StackDescriptor {
    name: String,
    template_url: String,
    iam: bool,
    capabilities: Vec<Capability>,
    parameters: Vec<Parameter>,
    tags: Vec<Tag>,
    last_create_result: Option<StackResponse>,
    last_update_result: Option<StackResponse>,
    last_delete_result: Option<StackResponse>,
}

impl StackDescriptor {
    /// Describe a stack.
    ///
    /// Every entry in `extra` becomes a template parameter, in map order. The
    /// entries keyed by one of [`RESERVED_TAG_KEYS`] are also applied as tags.
    pub fn new(
        name: impl Into<String>,
        template_url: impl Into<String>,
        iam: bool,
        extra: IndexMap<String, String>,
    ) -> CfnResult<Self> {
        let name = name.into();
        let template_url = template_url.into();

        if name.trim().is_empty() {
            return Err(CfnError::invalid_argument("stack name is required"));
        }
        if template_url.trim().is_empty() {
            return Err(CfnError::invalid_argument("template url is required"));
        }
        if let Some(key) = extra.keys().find(|k| IDENTITY_KEYS.contains(&k.as_str())) {
            return Err(CfnError::invalid_argument(format!(
                "{} cannot be passed as a stack parameter",
                key
            )));
        }

        let capabilities = if iam { vec![Capability::Iam] } else { Vec::new() };

        let mut parameters = Vec::with_capacity(extra.len());
        let mut tags = Vec::new();
        for (key, value) in extra {
            debug!(key = %key, value = %value, "stack parameter");
            if RESERVED_TAG_KEYS.contains(&key.as_str()) {
                tags.push(Tag::new(key.clone(), value.clone()));
            }
            parameters.push(Parameter::new(key, value));
        }

        let stack = Self {
            name,
            template_url,
            iam,
            capabilities,
            parameters,
            tags,
            last_create_result: None,
            last_update_result: None,
            last_delete_result: None,
        };
        debug!(stack = %stack, "initialized stack descriptor");
        Ok(stack)
    }

    /// Start building a descriptor with parameters added one at a time
    pub fn builder(name: impl Into<String>, template_url: impl Into<String>) -> StackBuilder {
        StackBuilder {
            name: name.into(),
            template_url: template_url.into(),
            iam: false,
            extra: IndexMap::new(),
        }
    }

    /// Build a descriptor from a parsed stack file
    pub fn from_config(config: &StackConfig) -> CfnResult<Self> {
        Self::new(
            config.name.clone(),
            config.template_url.clone(),
            config.iam,
            config.parameters.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_url(&self) -> &str {
        &self.template_url
    }

    pub fn iam(&self) -> bool {
        self.iam
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn last_create_result(&self) -> Option<&StackResponse> {
        self.last_create_result.as_ref()
    }

    pub fn last_update_result(&self) -> Option<&StackResponse> {
        self.last_update_result.as_ref()
    }

    pub fn last_delete_result(&self) -> Option<&StackResponse> {
        self.last_delete_result.as_ref()
    }

    /// Request body sent by [`Self::create_stack`]
    pub fn create_request(&self) -> CreateStackRequest {
        CreateStackRequest {
            stack_name: self.name.clone(),
            timeout_in_minutes: CREATE_TIMEOUT_MINUTES,
            on_failure: OnFailure::Rollback,
            capabilities: self.capabilities.clone(),
            template_url: self.template_url.clone(),
            parameters: self.parameters.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Request body sent by [`Self::update_stack`]
    pub fn update_request(&self) -> UpdateStackRequest {
        UpdateStackRequest {
            stack_name: self.name.clone(),
            capabilities: self.capabilities.clone(),
            template_url: self.template_url.clone(),
            parameters: self.parameters.clone(),
        }
    }

    /// Request body sent by [`Self::delete_stack`]
    pub fn delete_request(&self) -> DeleteStackRequest {
        DeleteStackRequest {
            stack_name: self.name.clone(),
        }
    }

    /// Ask the provisioner to create the stack.
    ///
    /// Returns once the request is acknowledged; creation continues remotely.
    pub async fn create_stack<P>(&mut self, provisioner: &P) -> CfnResult<()>
    where
        P: Provisioner + ?Sized,
    {
        debug!(stack = %self.name, "BEGIN create_stack");
        let response = provisioner.create_stack(&self.create_request()).await?;
        self.last_create_result = Some(response);
        debug!(stack = %self.name, "END create_stack");
        Ok(())
    }

    /// Ask the provisioner to update the stack. Tags are not sent.
    pub async fn update_stack<P>(&mut self, provisioner: &P) -> CfnResult<()>
    where
        P: Provisioner + ?Sized,
    {
        debug!(stack = %self.name, "BEGIN update_stack");
        let response = provisioner.update_stack(&self.update_request()).await?;
        self.last_update_result = Some(response);
        debug!(stack = %self.name, "END update_stack");
        Ok(())
    }

    /// Delete the stack and wait until the provisioner reports it gone
    pub async fn delete_stack<P>(&mut self, provisioner: &P, waiter: &WaiterConfig) -> CfnResult<()>
    where
        P: Provisioner + ?Sized,
    {
        debug!(stack = %self.name, "BEGIN delete_stack");
        let response = provisioner.delete_stack(&self.delete_request()).await?;
        self.last_delete_result = Some(response);

        wait_until_deleted(provisioner, &self.name, waiter).await?;
        debug!(stack = %self.name, "END delete_stack");
        Ok(())
    }
}

impl fmt::Display for StackDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StackDescriptor(name={}, template_url={}, iam={}, tags={:?}, parameters={:?})",
            self.name, self.template_url, self.iam, self.tags, self.parameters
        )
    }
}

/// Incremental construction of a [`StackDescriptor`]
#[derive(Debug, Clone)]
pub struct StackBuilder {
    name: String,
    template_url: String,
    iam: bool,
    extra: IndexMap<String, String>,
}

impl StackBuilder {
    pub fn iam(mut self, iam: bool) -> Self {
        self.iam = iam;
        self
    }

    /// Add an extra argument. A repeated key keeps its first position.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> CfnResult<StackDescriptor> {
        StackDescriptor::new(self.name, self.template_url, self.iam, self.extra)
    }
}
