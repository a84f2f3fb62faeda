use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use validator::Validate;

use crate::api::responses::{created, data, updated};
use crate::api::validation::ValidatedJson;
use crate::error::Result;
use crate::model::{Id, NewProductImage, ProductImagePatch};
use crate::store::Store;

#[derive(Debug, Deserialize, Validate)]
pub struct NewProductImageBatch {
    #[validate(length(min = 1), nested)]
    pub images: Vec<NewProductImage>,
}

pub async fn list_product_images<S: Store>(
    State(store): State<Arc<S>>,
) -> Result<impl IntoResponse> {
    let images = store.list_product_images().await?;
    Ok(data(images))
}

pub async fn get_product_image<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    let image = store.get_product_image(id).await?;
    Ok(data(image))
}

pub async fn get_images_by_product<S: Store>(
    State(store): State<Arc<S>>,
    Path(product_id): Path<Id>,
) -> Result<impl IntoResponse> {
    let images = store.get_images_by_product(product_id).await?;
    Ok(data(images))
}

pub async fn get_images_by_variant<S: Store>(
    State(store): State<Arc<S>>,
    Path(variant_id): Path<Id>,
) -> Result<impl IntoResponse> {
    let images = store.get_images_by_variant(variant_id).await?;
    Ok(data(images))
}

pub async fn add_product_image<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(new): ValidatedJson<NewProductImage>,
) -> Result<impl IntoResponse> {
    let image = store.add_product_image(new).await?;
    Ok(created("Product image created", image))
}

pub async fn add_product_images<S: Store>(
    State(store): State<Arc<S>>,
    ValidatedJson(batch): ValidatedJson<NewProductImageBatch>,
) -> Result<impl IntoResponse> {
    let images = store.add_product_images(batch.images).await?;
    Ok(created("Product images created", images))
}

pub async fn update_product_image<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
    ValidatedJson(patch): ValidatedJson<ProductImagePatch>,
) -> Result<impl IntoResponse> {
    let image = store.update_product_image(id, patch).await?;
    Ok(updated("Product image updated", image))
}

pub async fn delete_product_image<S: Store>(
    State(store): State<Arc<S>>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse> {
    store.delete_product_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
