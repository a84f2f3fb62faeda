use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{default_limit, Attribute, Category, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_price: f64,
    pub compare_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its linked categories and attributes preloaded.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one category is required"))]
    pub categories: Vec<Id>,
    #[serde(default)]
    pub attributes: Vec<Id>,
    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than 0"))]
    pub base_price: f64,
    #[serde(default)]
    pub compare_price: f64,
}

impl NewProduct {
    /// A zero compare price at creation falls back to the base price.
    pub fn compare_price_or_default(&self) -> f64 {
        if self.compare_price == 0.0 {
            self.base_price
        } else {
            self.compare_price
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one category is required"))]
    pub categories: Option<Vec<Id>>,
    pub attributes: Option<Vec<Id>>,
    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than 0"))]
    pub base_price: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than 0"))]
    pub compare_price: Option<f64>,
}

impl ProductPatch {
    pub fn has_scalar_fields(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.base_price.is_some()
            || self.compare_price.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_scalar_fields() && self.categories.is_none() && self.attributes.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub category_id: Option<Id>,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            category_id: None,
        }
    }
}
