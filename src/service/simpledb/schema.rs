//! Schema sub-resource handler
//!
//! Translates REST verbs on `schema/*` into domain-level backend calls:
//! listing, describing, creating, and deleting domains.

use super::SimpleDbService;
use crate::error::{AdapterError, Result};
use crate::request::{RestResponse, Verb};
use serde_json::{json, Map, Value};

pub(super) async fn handle(
    service: &SimpleDbService,
    verb: Verb,
    path: &str,
    payload: &Option<Value>,
) -> Result<RestResponse> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.first() {
        None => match verb {
            Verb::Get => list_schemas(service).await,
            Verb::Post => create_schema(service, payload).await,
            _ => Err(AdapterError::InvalidArgument(
                "schema root supports GET and POST only".into(),
            )),
        },
        Some(name) => {
            let name = service.validate_domain_name(name).await?;
            match verb {
                Verb::Get => describe_schema(service, name).await,
                Verb::Delete => delete_schema(service, name).await,
                Verb::Put | Verb::Patch => Err(AdapterError::InvalidArgument(
                    "schema-less domains cannot be altered".into(),
                )),
                Verb::Post => Err(AdapterError::InvalidArgument(
                    "POST a new schema to the schema root".into(),
                )),
            }
        }
    }
}

async fn list_schemas(service: &SimpleDbService) -> Result<RestResponse> {
    let names = service.cached_domains().await?;
    Ok(RestResponse::ok(json!({ "resource": names })))
}

async fn describe_schema(service: &SimpleDbService, name: &str) -> Result<RestResponse> {
    let metadata = service.client().domain_metadata(name).await?;
    Ok(RestResponse::ok(json!({
        "name": name,
        "metadata": metadata,
    })))
}

/// Create a domain named by the payload, merged over the tenant's
/// `default_create_table` seed definition
async fn create_schema(
    service: &SimpleDbService,
    payload: &Option<Value>,
) -> Result<RestResponse> {
    let mut definition = match service.default_create_table() {
        Some(Value::Object(defaults)) => defaults.clone(),
        _ => Map::new(),
    };
    if let Some(Value::Object(given)) = payload {
        definition.extend(given.clone());
    }

    let name = definition
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AdapterError::InvalidArgument("table name can not be empty".into()))?
        .to_string();

    service.client().create_domain(&name).await?;
    tracing::debug!(name, "created domain");

    Ok(RestResponse::created(Value::Object(definition)))
}

async fn delete_schema(service: &SimpleDbService, name: &str) -> Result<RestResponse> {
    service.client().delete_domain(name).await?;
    tracing::debug!(name, "deleted domain");
    Ok(RestResponse::ok(json!({ "name": name })))
}
