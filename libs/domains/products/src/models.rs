use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Message returned alongside a deleted product
pub const DELETE_MESSAGE: &str = "Product delete";

/// Product entity as stored in the `products` collection.
///
/// Field names on the wire follow the document schema (`prod_name`,
/// `prod_price`, ...). `updated_time` is stamped at creation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id", alias = "id", with = "uuid_text")]
    pub id: Uuid,

    #[serde(rename = "prod_name", default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Product A")]
    pub name: Option<String>,

    #[serde(
        rename = "prod_price",
        default,
        deserialize_with = "text::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "10000")]
    pub price: Option<String>,

    /// Catalogue number supplied by the caller
    #[serde(rename = "prod_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1001)]
    pub code: Option<i64>,

    #[serde(rename = "prod_desc", default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Description A")]
    pub description: Option<String>,

    pub updated_time: DateTime<Utc>,
}

impl Product {
    /// New record with a fresh time-ordered id
    pub fn new(input: CreateProduct) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            price: input.price,
            code: input.code,
            description: input.description,
            updated_time: Utc::now(),
        }
    }

    /// Overwrite the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(price) = update.price {
            self.price = Some(price);
        }
        if let Some(code) = update.code {
            self.code = Some(code);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}

/// Body of `POST /products`. Every field is optional.
///
/// Scalars are cast to the stored type: numbers and booleans become text
/// for the text fields, and a numeric string is read as `prod_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[serde(rename = "prod_name", default, deserialize_with = "text::deserialize")]
    #[schema(example = "Product A")]
    pub name: Option<String>,

    /// Text or number; stored as text
    #[serde(rename = "prod_price", default, deserialize_with = "text::deserialize")]
    #[validate(custom(function = "validate_price"))]
    #[schema(example = "10000")]
    pub price: Option<String>,

    #[serde(rename = "prod_id", default, deserialize_with = "number::deserialize")]
    #[schema(example = 1001)]
    pub code: Option<i64>,

    #[serde(rename = "prod_desc", default, deserialize_with = "text::deserialize")]
    #[schema(example = "Description A")]
    pub description: Option<String>,
}

/// Body of `PUT /products/{id}`. Absent or null fields are left unchanged.
/// Scalars are cast as for [`CreateProduct`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[serde(rename = "prod_name", default, deserialize_with = "text::deserialize")]
    #[schema(example = "Product B")]
    pub name: Option<String>,

    #[serde(rename = "prod_price", default, deserialize_with = "text::deserialize")]
    #[validate(custom(function = "validate_price"))]
    #[schema(example = "12500")]
    pub price: Option<String>,

    #[serde(rename = "prod_id", default, deserialize_with = "number::deserialize")]
    pub code: Option<i64>,

    #[serde(rename = "prod_desc", default, deserialize_with = "text::deserialize")]
    pub description: Option<String>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.code.is_none()
            && self.description.is_none()
    }
}

/// Body of `DELETE /products/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductResponse {
    #[schema(example = "Product delete")]
    pub msg: String,

    /// The removed record, `null` when nothing matched
    #[serde(rename = "deleteProduct")]
    pub delete_product: Option<Product>,
}

impl DeleteProductResponse {
    pub fn new(delete_product: Option<Product>) -> Self {
        Self {
            msg: DELETE_MESSAGE.to_string(),
            delete_product,
        }
    }
}

/// Which version of the record `PUT` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum UpdateReturn {
    /// The record with the update applied
    #[default]
    After,
    /// The record as it was before the update
    Before,
}

/// How a missing record is reported by `GET`, `PUT` and `DELETE`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum NotFoundPolicy {
    /// 200 with a `null` body (`deleteProduct: null` for `DELETE`)
    #[default]
    #[strum(to_string = "null")]
    NullBody,
    /// 404 with an error body
    #[strum(to_string = "status", serialize = "404")]
    Status404,
}

/// Strict-mode rule: a price must read as a non-negative decimal.
fn validate_price(price: &str) -> Result<(), ValidationError> {
    match price.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(()),
        _ => {
            let mut error = ValidationError::new("price")
                .with_message(Cow::Borrowed("price must be a non-negative number"));
            error.add_param(Cow::Borrowed("value"), &price);
            Err(error)
        }
    }
}

/// Ids are kept as hyphenated text in every format so that stored
/// documents and `_id` filters always agree.
pub(crate) mod uuid_text {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&id.hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let text = String::deserialize(deserializer)?;
        Uuid::parse_str(&text).map_err(D::Error::custom)
    }
}

/// Reads a string, number or boolean into text.
mod text {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Integer(i64),
        Decimal(f64),
        Flag(bool),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<RawText>::deserialize(deserializer)?.map(|raw| match raw {
            RawText::Text(text) => text,
            RawText::Integer(number) => number.to_string(),
            RawText::Decimal(number) => number.to_string(),
            RawText::Flag(flag) => flag.to_string(),
        }))
    }
}

/// Reads an integer, a whole decimal or a numeric string into `i64`.
/// A blank string counts as absent.
mod number {
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Integer(i64),
        Decimal(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawNumber>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawNumber::Integer(number)) => Ok(Some(number)),
            Some(RawNumber::Decimal(number))
                if number.fract() == 0.0
                    && number >= i64::MIN as f64
                    && number < i64::MAX as f64 =>
            {
                Ok(Some(number as i64))
            }
            Some(RawNumber::Decimal(number)) => {
                Err(D::Error::custom(format!("{number} is not a whole number")))
            }
            Some(RawNumber::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawNumber::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("'{text}' is not an integer"))),
        }
    }
}
