use core_config::{env_flag, env_or_default, ConfigError, FromEnv};

use crate::models::{NotFoundPolicy, UpdateReturn};

pub const DEFAULT_COLLECTION: &str = "products";

/// Runtime behavior of the products API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductsConfig {
    /// MongoDB collection holding the products
    pub collection: String,
    /// Reject prices that are not non-negative decimals
    pub strict_price: bool,
    pub update_returns: UpdateReturn,
    pub not_found: NotFoundPolicy,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            strict_price: false,
            update_returns: UpdateReturn::default(),
            not_found: NotFoundPolicy::default(),
        }
    }
}

fn parse_choice<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::ParseError {
            key: key.to_string(),
            details: format!("unsupported value '{raw}'"),
        }),
        Err(_) => Ok(default),
    }
}

impl FromEnv for ProductsConfig {
    /// - `MONGODB_COLLECTION` (default: `products`)
    /// - `PRODUCTS_STRICT_PRICE` (default: false)
    /// - `PRODUCTS_UPDATE_RETURNS`: `after` (default) or `before`
    /// - `PRODUCTS_NOT_FOUND`: `null` (default) or `status`
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            collection: env_or_default("MONGODB_COLLECTION", DEFAULT_COLLECTION),
            strict_price: env_flag("PRODUCTS_STRICT_PRICE", false)?,
            update_returns: parse_choice("PRODUCTS_UPDATE_RETURNS", UpdateReturn::default())?,
            not_found: parse_choice("PRODUCTS_NOT_FOUND", NotFoundPolicy::default())?,
        })
    }
}
