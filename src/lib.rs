//! awsgate - AWS service adapters for a REST API gateway
//!
//! This crate is the AWS adapter layer of a multi-tenant REST gateway.
//! It registers five AWS-backed service types (S3, DynamoDB, SimpleDB,
//! SNS, SES) for the platform's service registry and implements the
//! SimpleDB NoSQL adapter: the gateway hands an adapter instance one
//! inbound request, the adapter validates access and resource names
//! against the tenant's backend, and translates the request into signed
//! SimpleDB query-API calls.
//!
//! # Example
//!
//! ```ignore
//! use awsgate::access::AllowAll;
//! use awsgate::config::ServiceConfig;
//! use awsgate::request::{RestRequest, Verb};
//! use awsgate::service::SimpleDbService;
//!
//! async fn example(config: &ServiceConfig) -> awsgate::error::Result<()> {
//!     let service = SimpleDbService::new(config)?;
//!     let request = RestRequest::new(Verb::Get, "table/users");
//!     let response = service.handle_request(&request, &AllowAll).await?;
//!     println!("{}", response.payload);
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod aws;
pub mod config;
pub mod error;
pub mod request;
pub mod service;

pub use access::{AccessOracle, AccessSet, Action};
pub use config::ServiceConfig;
pub use error::{AdapterError, Result};
pub use request::{RestRequest, RestResponse, Verb};
pub use service::{SimpleDbService, SubResource};
