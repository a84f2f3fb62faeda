use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{default_limit, AttributeValue, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: Id,
    pub product_id: Id,
    pub sku: String,
    pub base_price: f64,
    pub compare_price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Variant with its linked attribute values preloaded.
#[derive(Debug, Clone, Serialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: Variant,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute_values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewVariant {
    pub product_id: Id,
    #[validate(length(min = 1, message = "This field is required"))]
    pub sku: String,
    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than 0"))]
    pub base_price: f64,
    #[serde(default)]
    pub compare_price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Value must be at least 0"))]
    pub stock: i32,
    #[serde(default)]
    pub attribute_values: Vec<Id>,
}

impl NewVariant {
    pub fn compare_price_or_default(&self) -> f64 {
        if self.compare_price == 0.0 {
            self.base_price
        } else {
            self.compare_price
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VariantPatch {
    pub product_id: Option<Id>,
    #[validate(length(min = 1))]
    pub sku: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than 0"))]
    pub base_price: Option<f64>,
    #[validate(range(min = 0.0, message = "Value must be at least 0"))]
    pub compare_price: Option<f64>,
    #[validate(range(min = 0, message = "Value must be at least 0"))]
    pub stock: Option<i32>,
    pub attribute_values: Option<Vec<Id>>,
}

impl VariantPatch {
    pub fn has_scalar_fields(&self) -> bool {
        self.product_id.is_some()
            || self.sku.is_some()
            || self.base_price.is_some()
            || self.compare_price.is_some()
            || self.stock.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_scalar_fields() && self.attribute_values.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub product_id: Option<Id>,
}

impl Default for VariantListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            product_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_stock_fails_validation() {
        let new: NewVariant = serde_json::from_str(
            r#"{"product_id": 1, "sku": "SKU-1", "base_price": 5.0, "stock": -2}"#,
        )
        .unwrap();
        let errors = new.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock"));
    }

    #[test]
    fn attribute_values_only_patch_is_not_empty() {
        let patch = VariantPatch {
            attribute_values: Some(vec![3]),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
