//! Service adapter layer
//!
//! The service types this crate contributes to the host gateway and the
//! adapters behind them.
//!
//! # Module Structure
//!
//! - [`registry`] - Embedded service-type records and lookups
//! - [`simpledb`] - The SimpleDB NoSQL adapter (schema and table
//!   sub-resources, name resolution, access-filtered listing)

pub mod registry;
pub mod simpledb;

pub use registry::{all_service_type_names, get_service_type, ServiceTypeDescriptor};
pub use simpledb::{SimpleDbService, SubResource};
