use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::responses::{created, data, updated};
use crate::api::validation::ValidatedJson;
use crate::error::Result;
use crate::model::{Id, NewProduct, ProductListQuery, ProductPatch};
use crate::store::Store;

pub async fn list_products<S: Store>(
    State(store): State<Arc<S>>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let products = store.list_products(query).await?;
    Ok(data(products))
}

pub async fn get_product<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let product = store.get_product(id).await?;
    Ok(data(product))
}

pub async fn add_product<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewProduct>,
) -> Result<impl IntoResponse> {
    let product = store.add_product(new).await?;
    Ok(created("Product created", product))
}

pub async fn update_product<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<ProductPatch>,
) -> Result<impl IntoResponse> {
    let product = store.update_product(id, patch).await?;
    Ok(updated("Product updated", product))
}

pub async fn delete_product<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
