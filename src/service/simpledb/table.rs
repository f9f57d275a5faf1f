//! Table sub-resource handler
//!
//! Translates REST verbs on `table/*` into item-level backend calls:
//! Select-driven record listing plus single-item get/put/delete. Every
//! path names its domain first, and that name is validated against the
//! adapter's domain cache before any data call.

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

    match segments.as_slice() {
        [] => match verb {
            Verb::Get => list_tables(service).await,
            _ => Err(AdapterError::InvalidArgument(
                "item operations require a table name".into(),
            )),
        },
        [name] => {
            let name = service.validate_domain_name(name).await?;
            match verb {
                Verb::Get => list_items(service, name).await,
                Verb::Post => create_item(service, name, payload).await,
                _ => Err(AdapterError::InvalidArgument(
                    "item updates and deletes require an item name".into(),
                )),
            }
        }
        [name, item, ..] => {
            let name = service.validate_domain_name(name).await?;
            match verb {
                Verb::Get => get_item(service, name, item).await,
                Verb::Put | Verb::Patch => replace_item(service, name, item, payload).await,
                Verb::Delete => delete_item(service, name, item).await,
                Verb::Post => Err(AdapterError::InvalidArgument(
                    "POST new items to the table path".into(),
                )),
            }
        }
    }
}

async fn list_tables(service: &SimpleDbService) -> Result<RestResponse> {
    let names = service.cached_domains().await?;
    let tables: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
    Ok(RestResponse::ok(json!({ "resource": tables })))
}

/// List every record of a domain, draining Select continuation tokens
async fn list_items(service: &SimpleDbService, name: &str) -> Result<RestResponse> {
    let expression = format!("select * from {}", quote_domain(name));
    let mut records = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = service.client().select(&expression, token.as_deref()).await?;
        records.extend(page.items.iter().map(item_to_record));

        if page.next_token.is_none() {
            break;
        }
        token = page.next_token;
    }

    Ok(RestResponse::ok(json!({
        "name": name,
        "record": records,
    })))
}

async fn get_item(service: &SimpleDbService, name: &str, item: &str) -> Result<RestResponse> {
    let response = service.client().get_attributes(name, item).await?;
    let attributes = response
        .get("Attributes")
        .and_then(|v| v.as_array())
        .filter(|arr| !arr.is_empty())
        .ok_or_else(|| AdapterError::NotFound(format!("record '{item}' not found")))?;

    let mut record = attributes_to_object(attributes);
    record.insert("id".to_string(), json!(item));
    Ok(RestResponse::ok(Value::Object(record)))
}

async fn create_item(
    service: &SimpleDbService,
    name: &str,
    payload: &Option<Value>,
) -> Result<RestResponse> {
    let (id, attributes) = split_record(payload)?;
    service
        .client()
        .put_attributes(name, &id, &attributes, false)
        .await?;
    Ok(RestResponse::created(json!({ "id": id })))
}

async fn replace_item(
    service: &SimpleDbService,
    name: &str,
    item: &str,
    payload: &Option<Value>,
) -> Result<RestResponse> {
    let attributes = payload
        .as_ref()
        .filter(|p| p.is_object())
        .cloned()
        .ok_or_else(|| {
            AdapterError::InvalidArgument("item payload must be a JSON object".into())
        })?;
    service
        .client()
        .put_attributes(name, item, &attributes, true)
        .await?;
    Ok(RestResponse::ok(json!({ "id": item })))
}

async fn delete_item(service: &SimpleDbService, name: &str, item: &str) -> Result<RestResponse> {
    service.client().delete_attributes(name, item).await?;
    Ok(RestResponse::ok(json!({ "id": item })))
}

/// Pull the record id out of a create payload; the remaining fields are
/// the item attributes
fn split_record(payload: &Option<Value>) -> Result<(String, Value)> {
    let Some(Value::Object(record)) = payload else {
        return Err(AdapterError::InvalidArgument(
            "item payload must be a JSON object".into(),
        ));
    };

    let mut attributes = record.clone();
    let id = attributes
        .remove("id")
        .and_then(|v| v.as_str().map(str::to_string))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AdapterError::InvalidArgument("item payload requires an 'id'".into()))?;

    Ok((id, Value::Object(attributes)))
}

/// Select item `{"Name": id, "Attributes": [...]}` to a flat record
fn item_to_record(item: &Value) -> Value {
    let mut record = item
        .get("Attributes")
        .and_then(|v| v.as_array())
        .map(|arr| attributes_to_object(arr))
        .unwrap_or_default();

    if let Some(id) = item.get("Name").and_then(|v| v.as_str()) {
        record.insert("id".to_string(), json!(id));
    }
    Value::Object(record)
}

/// Attribute list `[{"Name": k, "Value": v}, ...]` to a JSON object.
/// Repeated names collapse to the last value.
fn attributes_to_object(attributes: &[Value]) -> Map<String, Value> {
    let mut object = Map::new();
    for attribute in attributes {
        if let Some(name) = attribute.get("Name").and_then(|v| v.as_str()) {
            let value = attribute.get("Value").cloned().unwrap_or(Value::Null);
            object.insert(name.to_string(), value);
        }
    }
    object
}

/// Quote a domain name into a Select expression; embedded backticks are
/// doubled per the query grammar
fn quote_domain(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
