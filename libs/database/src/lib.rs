//! Database connectivity shared by the API binaries.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client configuration, connection and health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//! use database::common::RetryConfig;
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "products");
//! let client = connect_from_config_with_retry(&config, Some(RetryConfig::new().with_max_retries(5))).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
