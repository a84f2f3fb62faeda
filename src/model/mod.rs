pub mod attribute;
pub mod category;
pub mod image;
pub mod product;
pub mod variant;

pub use attribute::{
    Attribute, AttributePatch, AttributeValue, AttributeValuePatch, AttributeWithValues,
    NewAttribute, NewAttributeValue,
};
pub use category::{Category, CategoryPatch, NewCategory};
pub use image::{NewProductImage, ProductImage, ProductImagePatch};
pub use product::{NewProduct, Product, ProductDetail, ProductListQuery, ProductPatch};
pub use variant::{NewVariant, Variant, VariantDetail, VariantListQuery, VariantPatch};

pub type Id = i64;

pub(crate) fn default_limit() -> i64 {
    10
}
