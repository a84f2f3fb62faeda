use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// List and single-read envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Write envelope: `{"message": ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: String,
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

pub fn created<T: Serialize>(
    message: &str,
    data: T,
) -> (StatusCode, Json<MessageResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: message.to_string(),
            data,
        }),
    )
}

pub fn updated<T: Serialize>(message: &str, data: T) -> Json<MessageResponse<T>> {
    Json(MessageResponse {
        message: message.to_string(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_envelope_shape() {
        let body = serde_json::to_value(DataResponse { data: vec![1, 2] }).unwrap();
        assert_eq!(body, serde_json::json!({"data": [1, 2]}));
    }

    #[test]
    fn message_envelope_shape() {
        let body = serde_json::to_value(MessageResponse {
            message: "Category created".to_string(),
            data: 7,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "Category created", "data": 7})
        );
    }
}
