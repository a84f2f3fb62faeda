use crate::error::Result;
use crate::model::{
    Attribute, AttributePatch, AttributeValue, AttributeValuePatch, AttributeWithValues, Category,
    CategoryPatch, Id, NewAttribute, NewAttributeValue, NewCategory, NewProduct, NewProductImage,
    NewVariant, ProductDetail, ProductImage, ProductImagePatch, ProductListQuery, ProductPatch,
    VariantDetail, VariantListQuery, VariantPatch,
};

#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    /// Flat list of all categories; empty table yields an empty list.
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn get_category(&self, id: Id) -> Result<Category>;
    /// Categories whose parent_id equals the given id.
    async fn get_child_categories(&self, id: Id) -> Result<Vec<Category>>;
    /// Categories that are nobody's parent.
    async fn list_leaf_categories(&self) -> Result<Vec<Category>>;
    async fn add_category(&self, new: NewCategory) -> Result<Category>;
    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category>;
    /// Deletes a single category; refuses while child categories reference it.
    async fn delete_category(&self, id: Id) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<ProductDetail>>;
    async fn get_product(&self, id: Id) -> Result<ProductDetail>;
    /// Creates the product and appends category/attribute links in one
    /// transaction; nothing persists on failure.
    async fn add_product(&self, new: NewProduct) -> Result<ProductDetail>;
    /// Partial update. Present association fields replace the full link set.
    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<ProductDetail>;
    async fn delete_product(&self, id: Id) -> Result<()>;
}

#[async_trait::async_trait]
pub trait AttributeStore: Send + Sync {
    async fn list_attributes(&self) -> Result<Vec<AttributeWithValues>>;
    async fn get_attribute(&self, id: Id) -> Result<AttributeWithValues>;
    async fn add_attribute(&self, new: NewAttribute) -> Result<Attribute>;
    async fn update_attribute(&self, id: Id, patch: AttributePatch) -> Result<AttributeWithValues>;
    /// Refuses while attribute values still reference the attribute.
    async fn delete_attribute(&self, id: Id) -> Result<()>;
}

#[async_trait::async_trait]
pub trait AttributeValueStore: Send + Sync {
    async fn list_attribute_values(&self) -> Result<Vec<AttributeValue>>;
    async fn get_attribute_value(&self, id: Id) -> Result<AttributeValue>;
    async fn add_attribute_value(&self, new: NewAttributeValue) -> Result<AttributeValue>;
    async fn update_attribute_value(
        &self,
        id: Id,
        patch: AttributeValuePatch,
    ) -> Result<AttributeValue>;
    async fn delete_attribute_value(&self, id: Id) -> Result<()>;
}

#[async_trait::async_trait]
pub trait VariantStore: Send + Sync {
    async fn list_variants(&self, query: VariantListQuery) -> Result<Vec<VariantDetail>>;
    async fn get_variant(&self, id: Id) -> Result<VariantDetail>;
    /// Every linked attribute value must belong to one of the parent product's
    /// attributes; creation and link-append run in one transaction.
    async fn add_variant(&self, new: NewVariant) -> Result<VariantDetail>;
    async fn update_variant(&self, id: Id, patch: VariantPatch) -> Result<VariantDetail>;
    /// Clears attribute-value links, then deletes the row, transactionally.
    async fn delete_variant(&self, id: Id) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ProductImageStore: Send + Sync {
    async fn list_product_images(&self) -> Result<Vec<ProductImage>>;
    async fn get_product_image(&self, id: Id) -> Result<ProductImage>;
    async fn get_images_by_product(&self, product_id: Id) -> Result<Vec<ProductImage>>;
    async fn get_images_by_variant(&self, variant_id: Id) -> Result<Vec<ProductImage>>;
    async fn add_product_image(&self, new: NewProductImage) -> Result<ProductImage>;
    async fn add_product_images(&self, batch: Vec<NewProductImage>) -> Result<Vec<ProductImage>>;
    async fn update_product_image(
        &self,
        id: Id,
        patch: ProductImagePatch,
    ) -> Result<ProductImage>;
    async fn delete_product_image(&self, id: Id) -> Result<()>;
    async fn delete_images_by_product(&self, product_id: Id) -> Result<u64>;
    async fn delete_images_by_variant(&self, variant_id: Id) -> Result<u64>;
}

pub trait Store:
    CategoryStore
    + ProductStore
    + AttributeStore
    + AttributeValueStore
    + VariantStore
    + ProductImageStore
    + Send
    + Sync
{
}
