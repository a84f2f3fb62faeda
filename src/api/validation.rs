use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// JSON extractor that runs `validator` checks after deserialization.
///
/// Malformed JSON yields `400 {"message": "Invalid request"}`; field-level
/// validation failures yield `400 {"errors": [{"field", "message"}]}`.
pub struct ValidatedJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct BadRequestBody {
    message: String,
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let message = match err.message.as_ref() {
                Some(message) => message.to_string(),
                None => match err.code.as_ref() {
                    "length" | "required" => format!("{field} is required"),
                    "range" => format!("{field} is out of range"),
                    "url" => format!("{field} must be a valid URL"),
                    code => format!("{field} failed {code} validation"),
                },
            };
            out.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(BadRequestBody {
                    message: "Invalid request".to_string(),
                }),
            )
                .into_response()
        })?;

        value.validate().map_err(|errors| {
            (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody {
                    errors: field_errors(&errors),
                }),
            )
                .into_response()
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewCategory;

    #[test]
    fn empty_name_produces_field_error() {
        let new = NewCategory {
            name: String::new(),
            description: None,
            parent_id: None,
        };
        let errors = new.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "name");
    }
}
