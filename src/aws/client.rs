//! SimpleDB client
//!
//! Thin client over the SimpleDB query API: builds the action parameter
//! set for each operation, signs it, and posts it through the shared HTTP
//! wrapper. One client instance is the single backend connection of one
//! adapter instance.

use super::auth::AwsCredentials;
use super::http::SdbHttpClient;
use crate::config::ServiceConfig;
use crate::error::{AdapterError, Result};
use serde_json::Value;
use url::Url;

/// SimpleDB query API version sent with every action
const API_VERSION: &str = "2009-04-15";

/// One page of a paginated domain listing
#[derive(Debug, Clone)]
pub struct DomainPage {
    pub domain_names: Vec<String>,
    pub next_token: Option<String>,
}

/// One page of a Select result
#[derive(Debug, Clone)]
pub struct SelectPage {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

/// Client for one tenant's SimpleDB backend
#[derive(Clone, Debug)]
pub struct SimpleDbClient {
    credentials: AwsCredentials,
    http: SdbHttpClient,
    endpoint: String,
    host: String,
}

impl SimpleDbClient {
    /// Create a client from the tenant's service configuration.
    /// Fails on missing credentials or an unparseable endpoint; the
    /// owning adapter treats either as fatal.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let credentials = AwsCredentials::from_config(config)?;
        let endpoint = config.effective_endpoint();
        let host = Url::parse(&endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| {
                AdapterError::Config(format!("invalid backend endpoint '{endpoint}'"))
            })?;

        Ok(Self {
            credentials,
            http: SdbHttpClient::new()?,
            endpoint,
            host,
        })
    }

    /// Sign and post one action call
    async fn call(&self, action: &str, params: Vec<(String, String)>) -> Result<Value> {
        tracing::debug!(action, "simpledb call");

        let mut all = params;
        all.push(("Action".into(), action.into()));
        all.push(("Version".into(), API_VERSION.into()));

        let signed = self.credentials.sign(&self.host, &all);
        self.http.post_form(&self.endpoint, &signed).await
    }

    /// Fetch one page of domain names, `max` bounded by the API to 100
    pub async fn list_domains_page(
        &self,
        max: u32,
        next_token: Option<&str>,
    ) -> Result<DomainPage> {
        let mut params = vec![("MaxNumberOfDomains".to_string(), max.to_string())];
        if let Some(token) = next_token {
            params.push(("NextToken".into(), token.to_string()));
        }

        let response = self.call("ListDomains", params).await?;

        let domain_names = response
            .get("DomainNames")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let next_token = response
            .get("NextToken")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(DomainPage {
            domain_names,
            next_token,
        })
    }

    /// Item counts and sizes for one domain
    pub async fn domain_metadata(&self, domain: &str) -> Result<Value> {
        self.call("DomainMetadata", vec![("DomainName".into(), domain.into())])
            .await
    }

    pub async fn create_domain(&self, domain: &str) -> Result<()> {
        self.call("CreateDomain", vec![("DomainName".into(), domain.into())])
            .await?;
        Ok(())
    }

    pub async fn delete_domain(&self, domain: &str) -> Result<()> {
        self.call("DeleteDomain", vec![("DomainName".into(), domain.into())])
            .await?;
        Ok(())
    }

    /// Run a Select expression, one page at a time
    pub async fn select(&self, expression: &str, next_token: Option<&str>) -> Result<SelectPage> {
        let mut params = vec![("SelectExpression".to_string(), expression.to_string())];
        if let Some(token) = next_token {
            params.push(("NextToken".into(), token.to_string()));
        }

        let response = self.call("Select", params).await?;

        let items = response
            .get("Items")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let next_token = response
            .get("NextToken")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(SelectPage { items, next_token })
    }

    /// All attributes of one item
    pub async fn get_attributes(&self, domain: &str, item: &str) -> Result<Value> {
        self.call(
            "GetAttributes",
            vec![
                ("DomainName".into(), domain.into()),
                ("ItemName".into(), item.into()),
            ],
        )
        .await
    }

    /// Write item attributes from a flat JSON object; `replace` overwrites
    /// existing values instead of appending
    pub async fn put_attributes(
        &self,
        domain: &str,
        item: &str,
        attributes: &Value,
        replace: bool,
    ) -> Result<()> {
        let obj = attributes.as_object().ok_or_else(|| {
            AdapterError::InvalidArgument("item attributes must be a JSON object".into())
        })?;

        let mut params = vec![
            ("DomainName".to_string(), domain.to_string()),
            ("ItemName".to_string(), item.to_string()),
        ];
        for (i, (name, value)) in obj.iter().enumerate() {
            params.push((format!("Attribute.{i}.Name"), name.clone()));
            params.push((format!("Attribute.{i}.Value"), scalar_to_string(value)));
            if replace {
                params.push((format!("Attribute.{i}.Replace"), "true".into()));
            }
        }

        self.call("PutAttributes", params).await?;
        Ok(())
    }

    pub async fn delete_attributes(&self, domain: &str, item: &str) -> Result<()> {
        self.call(
            "DeleteAttributes",
            vec![
                ("DomainName".into(), domain.into()),
                ("ItemName".into(), item.into()),
            ],
        )
        .await?;
        Ok(())
    }
}

/// SimpleDB attribute values are strings; scalars are written verbatim,
/// everything else as compact JSON
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("plain")), "plain");
        assert_eq!(scalar_to_string(&json!(42)), "42");
        assert_eq!(scalar_to_string(&json!(true)), "true");
        assert_eq!(scalar_to_string(&json!(null)), "");
        assert_eq!(scalar_to_string(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_client_debug_omits_secret_key() {
        let config = ServiceConfig {
            access_key: Some("AKIDEXAMPLE".into()),
            secret_key: Some("TOPSECRETVALUE".into()),
            ..Default::default()
        };
        let client = SimpleDbClient::new(&config).unwrap();
        let formatted = format!("{client:?}");
        assert!(formatted.contains("AKIDEXAMPLE"));
        assert!(!formatted.contains("TOPSECRETVALUE"));
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let config = ServiceConfig {
            access_key: Some("AKIDEXAMPLE".into()),
            secret_key: Some("secret".into()),
            endpoint: Some("not a url".into()),
            ..Default::default()
        };
        let err = SimpleDbClient::new(&config).unwrap_err();
        assert_eq!(err.status(), 500);
    }
}
