//! SimpleDB service adapter
//!
//! Exposes a tenant's SimpleDB backend as a REST service with two
//! sub-resources, `schema/*` and `table/*`. The adapter owns the single
//! backend connection for its (request-scoped) lifetime and a lazily
//! populated cache of the backend's domain names, which backs name
//! validation and the permission-filtered `as_access_components` listing.

mod schema;
mod table;

use crate::access::AccessOracle;
use crate::aws::client::SimpleDbClient;
use crate::config::ServiceConfig;
use crate::error::{AdapterError, Result};
use crate::request::{RestRequest, RestResponse, Verb};
use serde_json::{json, Value};
use tokio::sync::OnceCell;

/// Page size for the paginated domain listing
const LIST_DOMAINS_PAGE_SIZE: u32 = 100;

/// The two sub-resource kinds exposed under this service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResource {
    Schema,
    Table,
}

impl SubResource {
    pub const ALL: [SubResource; 2] = [SubResource::Schema, SubResource::Table];

    pub fn name(self) -> &'static str {
        match self {
            SubResource::Schema => "schema",
            SubResource::Table => "table",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubResource::Schema => "Schema",
            SubResource::Table => "Table",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == segment)
    }
}

/// Routing decision for one inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteOutcome {
    /// Empty path: service-level request
    Service,
    /// A registered sub-resource matched the first segment
    Sub(SubResource),
    /// No sub-resource matched; carries the unresolved segment
    Unknown(String),
}

/// SimpleDB service adapter, one instance per inbound request
#[derive(Debug)]
pub struct SimpleDbService {
    client: SimpleDbClient,
    domain_cache: OnceCell<Vec<String>>,
    default_create_table: Option<Value>,
    table_fallback: bool,
}

impl SimpleDbService {
    /// Create an adapter from the tenant's service configuration.
    /// Fails when the backend connection cannot be built; the adapter
    /// never serves without one.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: SimpleDbClient::new(config)?,
            domain_cache: OnceCell::new(),
            default_create_table: config.parameters.default_create_table.clone(),
            table_fallback: config.parameters.table_fallback,
        })
    }

    pub(crate) fn client(&self) -> &SimpleDbClient {
        &self.client
    }

    pub(crate) fn default_create_table(&self) -> Option<&Value> {
        self.default_create_table.as_ref()
    }

    /// List every domain the backend holds, draining continuation tokens
    /// into one ordered sequence. An empty backend yields an empty list.
    pub async fn list_domains(&self) -> Result<Vec<String>> {
        let mut all = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_domains_page(LIST_DOMAINS_PAGE_SIZE, token.as_deref())
                .await?;
            all.extend(page.domain_names);

            if page.next_token.is_none() {
                break;
            }
            token = page.next_token;
        }

        tracing::debug!(count = all.len(), "listed domains");
        Ok(all)
    }

    /// Domain names, fetched from the backend at most once per adapter
    /// instance. Never refreshed within the instance lifetime; the host
    /// instantiates a fresh adapter per request.
    pub async fn cached_domains(&self) -> Result<&Vec<String>> {
        self.domain_cache
            .get_or_try_init(|| self.list_domains())
            .await
    }

    /// Validate a domain name against the cached listing.
    /// Exact, case-sensitive membership; the name passes through unchanged.
    pub async fn validate_domain_name<'a>(&self, name: &'a str) -> Result<&'a str> {
        if name.is_empty() {
            return Err(AdapterError::InvalidArgument(
                "table name can not be empty".into(),
            ));
        }

        let existing = self.cached_domains().await?;
        if !existing.iter().any(|d| d == name) {
            return Err(AdapterError::NotFound(format!("table '{name}' not found")));
        }

        Ok(name)
    }

    /// Resource paths visible to the caller, in fixed order: for each
    /// sub-resource kind, the base path and wildcard when any access is
    /// granted there, then one entry per accessible domain in cache order.
    pub async fn list_access_components(
        &self,
        oracle: &dyn AccessOracle,
    ) -> Result<Vec<String>> {
        let domains = self.cached_domains().await?;
        let mut components = Vec::new();

        for kind in SubResource::ALL {
            let base = format!("{}/", kind.name());
            if !oracle.get_permissions(&base).is_empty() {
                components.push(base.clone());
                components.push(format!("{base}*"));
            }

            for domain in domains {
                let qualified = format!("{}/{}", kind.name(), domain);
                if !oracle.get_permissions(&qualified).is_empty() {
                    components.push(qualified);
                }
            }
        }

        Ok(components)
    }

    /// Service-level listing endpoint. With the `as_access_components`
    /// query flag the permission-filtered path listing is returned;
    /// otherwise the registered sub-resources are listed generically.
    pub async fn list_resources(
        &self,
        request: &RestRequest,
        oracle: &dyn AccessOracle,
    ) -> Result<RestResponse> {
        if !request.query_bool("as_access_components") {
            let resources: Vec<Value> = SubResource::ALL
                .into_iter()
                .map(|r| json!({"name": r.name(), "label": r.label()}))
                .collect();
            return Ok(RestResponse::ok(json!({ "resource": resources })));
        }

        let components = self.list_access_components(oracle).await?;
        Ok(RestResponse::ok(json!({ "resource": components })))
    }

    /// Access gate applied before any dispatch: every request naming a
    /// top-level resource must pass a permission check on the composite
    /// resource path, whether or not the resource ultimately resolves.
    fn validate_resource_access(
        &self,
        request: &RestRequest,
        oracle: &dyn AccessOracle,
    ) -> Result<()> {
        let segments = request.segments();
        let Some(main) = segments.first() else {
            return Ok(());
        };

        let mut resource = format!("{main}/");
        // Child names only qualify registered sub-resource paths
        if SubResource::from_segment(main).is_some() {
            if let Some(sub) = segments.get(1) {
                resource.push_str(sub);
            }
        }

        oracle.check_permission(request.verb.action(), &resource)
    }

    fn route(&self, request: &RestRequest) -> RouteOutcome {
        match request.resource() {
            None => RouteOutcome::Service,
            Some(segment) => match SubResource::from_segment(segment) {
                Some(sub) => RouteOutcome::Sub(sub),
                None => RouteOutcome::Unknown(segment.to_string()),
            },
        }
    }

    /// Dispatch one inbound request to the matching sub-resource handler.
    ///
    /// An unresolved top-level segment normally answers `NotFound`. With
    /// the `table_fallback` compatibility mode the segment is reinterpreted
    /// as a dynamic table name and handled by the table sub-resource, so
    /// `GET /<name>` behaves as `GET /table/<name>`.
    pub async fn handle_request(
        &self,
        request: &RestRequest,
        oracle: &dyn AccessOracle,
    ) -> Result<RestResponse> {
        self.validate_resource_access(request, oracle)?;

        match self.route(request) {
            RouteOutcome::Service => {
                if request.verb != Verb::Get {
                    return Err(AdapterError::InvalidArgument(
                        "the service root supports GET only".into(),
                    ));
                }
                self.list_resources(request, oracle).await
            }
            RouteOutcome::Sub(SubResource::Schema) => {
                schema::handle(self, request.verb, &request.child_path(), &request.payload).await
            }
            RouteOutcome::Sub(SubResource::Table) => {
                table::handle(self, request.verb, &request.child_path(), &request.payload).await
            }
            RouteOutcome::Unknown(segment) => {
                if self.table_fallback {
                    tracing::debug!(segment, "falling back to dynamic table routing");
                    return table::handle(self, request.verb, &request.path, &request.payload)
                        .await;
                }
                Err(AdapterError::NotFound(format!(
                    "resource '{segment}' not found"
                )))
            }
        }
    }
}

impl Drop for SimpleDbService {
    fn drop(&mut self) {
        // Teardown is best-effort; nothing here may propagate
        tracing::debug!("releasing backend connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Verb;

    fn service() -> SimpleDbService {
        let config = ServiceConfig {
            access_key: Some("AKIDEXAMPLE".into()),
            secret_key: Some("secret".into()),
            ..Default::default()
        };
        SimpleDbService::new(&config).unwrap()
    }

    #[test]
    fn test_missing_credentials_is_fatal() {
        let err = SimpleDbService::new(&ServiceConfig::default()).unwrap_err();
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_route_outcomes() {
        let service = service();
        assert_eq!(
            service.route(&RestRequest::new(Verb::Get, "")),
            RouteOutcome::Service
        );
        assert_eq!(
            service.route(&RestRequest::new(Verb::Get, "schema/users")),
            RouteOutcome::Sub(SubResource::Schema)
        );
        assert_eq!(
            service.route(&RestRequest::new(Verb::Get, "table")),
            RouteOutcome::Sub(SubResource::Table)
        );
        assert_eq!(
            service.route(&RestRequest::new(Verb::Get, "users/item-1")),
            RouteOutcome::Unknown("users".to_string())
        );
    }

    #[test]
    fn test_sub_resource_lookup_is_exact() {
        assert_eq!(SubResource::from_segment("schema"), Some(SubResource::Schema));
        assert_eq!(SubResource::from_segment("Schema"), None);
        assert_eq!(SubResource::from_segment("_table"), None);
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_name_before_any_backend_call() {
        // The empty-name check precedes cache population, so no backend
        // round-trip happens here even though no server is listening.
        let service = service();
        let err = service.validate_domain_name("").await.unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
