use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Id>,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Id>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_with_no_fields_is_empty() {
        assert!(CategoryPatch::default().is_empty());
    }

    #[test]
    fn patch_with_parent_only_is_not_empty() {
        let patch = CategoryPatch {
            parent_id: Some(4),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn absent_json_fields_deserialize_to_none() {
        let patch: CategoryPatch = serde_json::from_str(r#"{"name": "Bikes"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Bikes"));
        assert!(patch.description.is_none());
        assert!(patch.parent_id.is_none());
    }
}
