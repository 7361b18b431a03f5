use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CfnError, CfnResult};
use crate::waiter::WaiterConfig;

/// Settings for reaching the provisioning service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// AWS region, falls back to the environment's default chain
    pub region: Option<String>,
    /// Named profile from the shared credentials file
    pub profile: Option<String>,
    /// Override endpoint, e.g. a local CloudFormation emulator
    pub endpoint_url: Option<String>,
    /// Delete waiter bounds
    pub waiter: WaiterConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CfnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Create config from TOML string
    pub fn from_toml(content: &str) -> CfnResult<Self> {
        toml::from_str(content)
            .map_err(|e| CfnError::Config(format!("Failed to parse client config: {}", e)))
    }
}

/// A stack described in a TOML file.
///
/// ```toml
/// name = "network"
/// template_url = "https://bucket.s3.amazonaws.com/network.json"
/// iam = false
///
/// [parameters]
/// owner = "platform"
/// cidr = "10.0.0.0/16"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    pub name: String,
    pub template_url: String,
    #[serde(default)]
    pub iam: bool,
    /// Extra arguments, kept in document order
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

impl StackConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CfnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(content: &str) -> CfnResult<Self> {
        toml::from_str(content)
            .map_err(|e| CfnError::Config(format!("Failed to parse stack file: {}", e)))
    }
}
