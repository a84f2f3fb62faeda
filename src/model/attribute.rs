use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: Id,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attribute with its values preloaded, as returned by list/get endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeWithValues {
    #[serde(flatten)]
    pub attribute: Attribute,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAttribute {
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttributePatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
}

impl AttributePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: Id,
    pub attribute_id: Id,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAttributeValue {
    pub attribute_id: Id,
    #[validate(length(min = 1, message = "This field is required"))]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttributeValuePatch {
    pub attribute_id: Option<Id>,
    #[validate(length(min = 1))]
    pub value: Option<String>,
}

impl AttributeValuePatch {
    pub fn is_empty(&self) -> bool {
        self.attribute_id.is_none() && self.value.is_none()
    }
}
