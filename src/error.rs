use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Sentinel domain errors returned by the store layer. Handlers translate
/// each variant into a fixed HTTP status; anything wrapped in `Database`
/// surfaces as an opaque 500.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category not found")]
    CategoryNotFound,
    #[error("parent category not found")]
    ParentCategoryNotFound,
    #[error("category cannot be its own parent")]
    CategoryCannotBeItsOwnParent,
    #[error("category has child categories and cannot be deleted")]
    CategoryHasChildren,
    #[error("product not found")]
    ProductNotFound,
    #[error("attribute not found")]
    AttributeNotFound,
    #[error("attribute has values and cannot be deleted")]
    AttributeHasValues,
    #[error("attribute value not found")]
    AttributeValueNotFound,
    #[error("variant not found")]
    VariantNotFound,
    #[error("product image not found")]
    ProductImageNotFound,
    #[error("duplicated entry found")]
    DuplicateEntry,
    #[error("no fields provided to update")]
    NoFieldsToUpdate,
    #[error("attribute value does not belong to the product's attributes")]
    InvalidAttributeValueForProduct,
    #[error(transparent)]
    Database(sqlx::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return CatalogError::DuplicateEntry;
            }
        }
        CatalogError::Database(err)
    }
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::CategoryNotFound
            | CatalogError::ParentCategoryNotFound
            | CatalogError::ProductNotFound
            | CatalogError::AttributeNotFound
            | CatalogError::AttributeValueNotFound
            | CatalogError::VariantNotFound
            | CatalogError::ProductImageNotFound => StatusCode::NOT_FOUND,
            CatalogError::CategoryCannotBeItsOwnParent
            | CatalogError::NoFieldsToUpdate
            | CatalogError::InvalidAttributeValueForProduct => StatusCode::BAD_REQUEST,
            CatalogError::CategoryHasChildren
            | CatalogError::AttributeHasValues
            | CatalogError::DuplicateEntry => StatusCode::CONFLICT,
            CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CatalogError::Database(err) => {
                log::error!("database error: {err}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family_maps_to_404() {
        for err in [
            CatalogError::CategoryNotFound,
            CatalogError::ParentCategoryNotFound,
            CatalogError::ProductNotFound,
            CatalogError::AttributeNotFound,
            CatalogError::AttributeValueNotFound,
            CatalogError::VariantNotFound,
            CatalogError::ProductImageNotFound,
        ] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "{err}");
        }
    }

    #[test]
    fn conflict_family_maps_to_409() {
        assert_eq!(CatalogError::DuplicateEntry.status(), StatusCode::CONFLICT);
        assert_eq!(
            CatalogError::CategoryHasChildren.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CatalogError::AttributeHasValues.status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn bad_request_family_maps_to_400() {
        assert_eq!(
            CatalogError::NoFieldsToUpdate.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::CategoryCannotBeItsOwnParent.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::InvalidAttributeValueForProduct.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unique_violation_becomes_duplicate_entry() {
        // RowNotFound is the only sqlx error easy to construct directly; it must
        // stay a generic database error, not a duplicate.
        let err = CatalogError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, CatalogError::Database(_)));
    }
}
