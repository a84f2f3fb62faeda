use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::responses::{created, data, updated};
use crate::api::validation::ValidatedJson;
use crate::error::Result;
use crate::model::{
    AttributePatch, AttributeValuePatch, Id, NewAttribute, NewAttributeValue,
};
use crate::store::Store;

pub async fn list_attributes<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let attributes = store.list_attributes().await?;
    Ok(data(attributes))
}

pub async fn get_attribute<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let attribute = store.get_attribute(id).await?;
    Ok(data(attribute))
}

pub async fn add_attribute<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewAttribute>,
) -> Result<impl IntoResponse> {
    let attribute = store.add_attribute(new).await?;
    Ok(created("Attribute created", attribute))
}

pub async fn update_attribute<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<AttributePatch>,
) -> Result<impl IntoResponse> {
    let attribute = store.update_attribute(id, patch).await?;
    Ok(updated("Attribute updated", attribute))
}

pub async fn delete_attribute<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_attribute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_attribute_values<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let values = store.list_attribute_values().await?;
    Ok(data(values))
}

pub async fn get_attribute_value<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let value = store.get_attribute_value(id).await?;
    Ok(data(value))
}

pub async fn add_attribute_value<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewAttributeValue>,
) -> Result<impl IntoResponse> {
    let value = store.add_attribute_value(new).await?;
    Ok(created("Attribute value created", value))
}

pub async fn update_attribute_value<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<AttributeValuePatch>,
) -> Result<impl IntoResponse> {
    let value = store.update_attribute_value(id, patch).await?;
    Ok(updated("Attribute value updated", value))
}

pub async fn delete_attribute_value<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_attribute_value(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
