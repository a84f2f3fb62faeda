pub mod attribute_handlers;
pub mod category_handlers;
pub mod image_handlers;
pub mod product_handlers;
pub mod responses;
pub mod routes;
pub mod validation;
pub mod variant_handlers;

pub use routes::create_router;
