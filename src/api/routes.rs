use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::{
    attribute_handlers, category_handlers, image_handlers, product_handlers, variant_handlers,
};
use crate::store::Store;

async fn health() -> &'static str {
    "OK"
}

/// Builds the catalog router. Generic over the store so tests can run the
/// full HTTP surface against `MemoryStore`.
pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/categories",
            get(category_handlers::list_categories::<S>)
                .post(category_handlers::add_category::<S>),
        )
        .route("/categories/tree", get(category_handlers::get_category_tree::<S>))
        .route("/categories/leaf", get(category_handlers::list_leaf_categories::<S>))
        .route(
            "/categories/:id",
            get(category_handlers::get_category::<S>)
                .patch(category_handlers::update_category::<S>)
                .delete(category_handlers::delete_category::<S>),
        )
        .route(
            "/categories/:id/children",
            get(category_handlers::get_child_categories::<S>),
        )
        .route(
            "/products",
            get(product_handlers::list_products::<S>).post(product_handlers::add_product::<S>),
        )
        .route(
            "/products/:id",
            get(product_handlers::get_product::<S>)
                .patch(product_handlers::update_product::<S>)
                .delete(product_handlers::delete_product::<S>),
        )
        .route(
            "/attributes",
            get(attribute_handlers::list_attributes::<S>)
                .post(attribute_handlers::add_attribute::<S>),
        )
        .route(
            "/attributes/:id",
            get(attribute_handlers::get_attribute::<S>)
                .patch(attribute_handlers::update_attribute::<S>)
                .delete(attribute_handlers::delete_attribute::<S>),
        )
        .route(
            "/attribute-values",
            get(attribute_handlers::list_attribute_values::<S>)
                .post(attribute_handlers::add_attribute_value::<S>),
        )
        .route(
            "/attribute-values/:id",
            get(attribute_handlers::get_attribute_value::<S>)
                .patch(attribute_handlers::update_attribute_value::<S>)
                .delete(attribute_handlers::delete_attribute_value::<S>),
        )
        .route(
            "/variants",
            get(variant_handlers::list_variants::<S>).post(variant_handlers::add_variant::<S>),
        )
        .route(
            "/variants/:id",
            get(variant_handlers::get_variant::<S>)
                .patch(variant_handlers::update_variant::<S>)
                .delete(variant_handlers::delete_variant::<S>),
        )
        .route(
            "/product-images",
            get(image_handlers::list_product_images::<S>)
                .post(image_handlers::add_product_image::<S>),
        )
        .route(
            "/product-images/batch",
            axum::routing::post(image_handlers::add_product_images::<S>),
        )
        .route(
            "/product-images/:id",
            get(image_handlers::get_product_image::<S>)
                .patch(image_handlers::update_product_image::<S>)
                .delete(image_handlers::delete_product_image::<S>),
        )
        .route(
            "/product-images/product/:product_id",
            get(image_handlers::get_images_by_product::<S>),
        )
        .route(
            "/product-images/variant/:variant_id",
            get(image_handlers::get_images_by_variant::<S>),
        )
        .layer(CorsLayer::permissive())
}
