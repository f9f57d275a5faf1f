//! Service Configuration
//!
//! Per-tenant configuration delivered by the host gateway when it
//! instantiates an adapter. Mirrors the service record stored by the
//! platform: AWS credentials, region, and optional adapter parameters.

use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default AWS region when the service record does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Tenant service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// AWS access key id
    #[serde(default)]
    pub access_key: Option<String>,
    /// AWS secret access key
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Optional STS session token
    #[serde(default)]
    pub session_token: Option<String>,
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override (SimpleDB-compatible stores, test servers)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Adapter-specific parameters
    #[serde(default)]
    pub parameters: Parameters,
}

/// Optional adapter parameters nested under `config.parameters`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Parameters {
    /// Seed schema merged into every domain-creation payload
    #[serde(default)]
    pub default_create_table: Option<Value>,
    /// Reinterpret an unmatched top-level path segment as a table name.
    /// Compatibility mode for pre-2.x clients; off by default.
    #[serde(default)]
    pub table_fallback: bool,
}

impl ServiceConfig {
    /// Parse a service record's `config` object
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| AdapterError::Config(format!("invalid service config: {e}")))
    }

    /// Effective region (configured or default)
    pub fn effective_region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Effective backend endpoint (override or the regional AWS endpoint)
    pub fn effective_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://sdb.{}.amazonaws.com", self.effective_region()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_config() {
        let config = ServiceConfig::from_value(&json!({
            "access_key": "AKIDEXAMPLE",
            "secret_key": "secret",
            "region": "eu-west-1",
            "parameters": {
                "default_create_table": {"indexed": true},
                "table_fallback": true
            }
        }))
        .unwrap();

        assert_eq!(config.effective_region(), "eu-west-1");
        assert_eq!(
            config.effective_endpoint(),
            "https://sdb.eu-west-1.amazonaws.com"
        );
        assert!(config.parameters.table_fallback);
        assert!(config.parameters.default_create_table.is_some());
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_value(&json!({})).unwrap();
        assert_eq!(config.effective_region(), DEFAULT_REGION);
        assert!(!config.parameters.table_fallback);
    }

    #[test]
    fn test_endpoint_override_trims_trailing_slash() {
        let config = ServiceConfig::from_value(&json!({
            "endpoint": "http://localhost:8080/"
        }))
        .unwrap();
        assert_eq!(config.effective_endpoint(), "http://localhost:8080");
    }
}
