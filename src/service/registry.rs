//! Service-type registry - Load service-type records from JSON
//!
//! This module loads the AWS service-type records this crate contributes
//! to the host platform's service registry and provides lookup functions
//! used at seeding and instantiation time.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded service-type records (compiled into the binary)
const SERVICE_TYPE_FILE: &str = include_str!("service_types.json");

/// Service-type record consumed by the platform's service registry
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTypeDescriptor {
    pub name: String,
    /// Adapter implementation key, resolved by the platform's factory
    pub adapter: String,
    /// Config-handler key (which config form the admin UI presents)
    pub config_handler: String,
    pub label: String,
    pub description: String,
    /// Comma-separated group tags
    pub group: String,
    pub singleton: bool,
}

impl ServiceTypeDescriptor {
    /// Check whether this service type carries a group tag
    pub fn in_group(&self, group: &str) -> bool {
        self.group.split(',').any(|g| g.trim() == group)
    }
}

/// Root structure of service_types.json
#[derive(Debug, Clone, Deserialize)]
struct ServiceTypeConfig {
    service_types: HashMap<String, ServiceTypeDescriptor>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ServiceTypeConfig> = OnceLock::new();

fn get_registry() -> &'static ServiceTypeConfig {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(SERVICE_TYPE_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded service-type JSON: {}", e))
    })
}

/// Get a service-type record by name
pub fn get_service_type(name: &str) -> Option<&'static ServiceTypeDescriptor> {
    get_registry().service_types.get(name)
}

/// Get all registered service-type names
pub fn all_service_type_names() -> Vec<&'static str> {
    get_registry()
        .service_types
        .keys()
        .map(|s| s.as_str())
        .collect()
}

/// Get all service types carrying a group tag
pub fn service_types_in_group(group: &str) -> Vec<&'static ServiceTypeDescriptor> {
    get_registry()
        .service_types
        .values()
        .filter(|d| d.in_group(group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let names = all_service_type_names();
        assert_eq!(names.len(), 5, "All five AWS service types registered");
    }

    #[test]
    fn test_simpledb_service_type_exists() {
        let descriptor = get_service_type("aws_simpledb");
        assert!(descriptor.is_some(), "SimpleDb service type should exist");

        let descriptor = descriptor.unwrap();
        assert_eq!(descriptor.adapter, "simpledb");
        assert_eq!(descriptor.label, "AWS SimpleDb service");
        assert!(descriptor.singleton);
    }

    #[test]
    fn test_group_lookup() {
        let nosql = service_types_in_group("nosql");
        let names: Vec<&str> = nosql.iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"aws_simpledb"));
        assert!(names.contains(&"aws_dynamodb"));
        assert!(!names.contains(&"aws_s3"));
    }

    #[test]
    fn test_unknown_service_type() {
        assert!(get_service_type("azure_blob").is_none());
    }
}
