use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::responses::{created, data, updated};
use crate::api::validation::ValidatedJson;
use crate::error::Result;
use crate::model::{Id, NewVariant, VariantListQuery, VariantPatch};
use crate::store::Store;

pub async fn list_variants<S: Store>(
    State(store): State<Arc<S>>,
    Query(query): Query<VariantListQuery>,
) -> Result<impl IntoResponse> {
    let variants = store.list_variants(query).await?;
    Ok(data(variants))
}

pub async fn get_variant<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let variant = store.get_variant(id).await?;
    Ok(data(variant))
}

pub async fn add_variant<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewVariant>,
) -> Result<impl IntoResponse> {
    let variant = store.add_variant(new).await?;
    Ok(created("Variant created", variant))
}

pub async fn update_variant<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<VariantPatch>,
) -> Result<impl IntoResponse> {
    let variant = store.update_variant(id, patch).await?;
    Ok(updated("Variant updated", variant))
}

pub async fn delete_variant<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_variant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
