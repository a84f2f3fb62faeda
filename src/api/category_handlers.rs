use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::responses::{created, data, updated};
use crate::api::validation::ValidatedJson;
use crate::error::Result;
use crate::logic::build_category_tree;
use crate::model::{CategoryPatch, Id, NewCategory};
use crate::store::Store;

pub async fn list_categories<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let categories = store.list_categories().await?;
    Ok(data(categories))
}

/// Nested parent/child forest built from the flat category set.
pub async fn get_category_tree<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let categories = store.list_categories().await?;
    Ok(data(build_category_tree(categories)))
}

pub async fn list_leaf_categories<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let categories = store.list_leaf_categories().await?;
    Ok(data(categories))
}

pub async fn get_category<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let category = store.get_category(id).await?;
    Ok(data(category))
}

pub async fn get_child_categories<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.get_category(id).await?;
    let children = store.get_child_categories(id).await?;
    Ok(data(children))
}

pub async fn add_category<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewCategory>,
) -> Result<impl IntoResponse> {
    let category = store.add_category(new).await?;
    Ok(created("Category created", category))
}

pub async fn update_category<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<CategoryPatch>,
) -> Result<impl IntoResponse> {
    let category = store.update_category(id, patch).await?;
    Ok(updated("Category updated", category))
}

pub async fn delete_category<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
