use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: Id,
    pub product_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<Id>,
    pub url: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProductImage {
    pub product_id: Id,
    #[serde(default)]
    pub variant_id: Option<Id>,
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductImagePatch {
    pub variant_id: Option<Id>,
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,
    pub is_default: Option<bool>,
}

impl ProductImagePatch {
    pub fn is_empty(&self) -> bool {
        self.variant_id.is_none() && self.url.is_none() && self.is_default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_fails_validation() {
        let new: NewProductImage =
            serde_json::from_str(r#"{"product_id": 1, "url": "not a url"}"#).unwrap();
        let errors = new.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
    }
}
