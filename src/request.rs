//! REST request and response types
//!
//! The slice of the host gateway's request context that adapters consume:
//! verb, resource path, query parameters, and an optional JSON payload.

use crate::access::Action;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP verb of an inbound REST request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    /// Access-control action this verb requires
    pub fn action(self) -> Action {
        match self {
            Verb::Get => Action::Read,
            Verb::Post => Action::Create,
            Verb::Put | Verb::Patch => Action::Update,
            Verb::Delete => Action::Delete,
        }
    }
}

/// Inbound REST request as handed over by the gateway dispatcher
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub verb: Verb,
    /// Resource path below the service mount point, no leading slash
    pub path: String,
    pub query: HashMap<String, String>,
    pub payload: Option<Value>,
}

impl RestRequest {
    pub fn new(verb: Verb, path: &str) -> Self {
        Self {
            verb,
            path: path.trim_matches('/').to_string(),
            query: HashMap::new(),
            payload: None,
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Read a boolean query flag. Truthy values: `true`, `1`, `yes`, `on`.
    pub fn query_bool(&self, name: &str) -> bool {
        self.query
            .get(name)
            .map(|v| {
                let v = v.to_ascii_lowercase();
                v == "true" || v == "1" || v == "yes" || v == "on"
            })
            .unwrap_or(false)
    }

    /// Path split into non-empty segments
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// First path segment, if any
    pub fn resource(&self) -> Option<&str> {
        self.segments().first().copied()
    }

    /// Path below the first segment
    pub fn child_path(&self) -> String {
        let segments = self.segments();
        segments.get(1..).unwrap_or_default().join("/")
    }
}

/// Response handed back to the gateway dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status: u16,
    pub payload: Value,
}

impl RestResponse {
    pub fn ok(payload: Value) -> Self {
        Self {
            status: 200,
            payload,
        }
    }

    pub fn created(payload: Value) -> Self {
        Self {
            status: 201,
            payload,
        }
    }
}
