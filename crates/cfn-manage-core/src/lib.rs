//! Core types and traits for managing a CloudFormation stack.
//!
//! [`StackDescriptor`] turns a stack name, template location, IAM flag and an
//! ordered map of extra arguments into the capability, parameter and tag
//! lists CloudFormation expects, and drives create, update and delete calls
//! through a [`Provisioner`].

pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod provisioner;
pub mod stack;
pub mod types;
pub mod waiter;

// Re-export commonly used types
pub use crate::config::{ClientConfig, StackConfig};
pub use crate::error::{CfnError, CfnResult};
pub use crate::memory::InMemoryProvisioner;
pub use crate::provisioner::Provisioner;
pub use crate::stack::{StackBuilder, StackDescriptor, RESERVED_TAG_KEYS};
pub use crate::types::{
    Capability, CreateStackRequest, DeleteStackRequest, OnFailure, Parameter, StackResponse,
    StackStatus, Tag, UpdateStackRequest,
};
pub use crate::waiter::{wait_until_deleted, WaiterConfig};

pub use indexmap::IndexMap;
