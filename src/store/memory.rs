use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{CatalogError, Result};
use crate::logic::capitalize_first_letter;
use crate::model::{
    Attribute, AttributePatch, AttributeValue, AttributeValuePatch, AttributeWithValues, Category,
    CategoryPatch, Id, NewAttribute, NewAttributeValue, NewCategory, NewProduct, NewProductImage,
    NewVariant, Product, ProductDetail, ProductImage, ProductImagePatch, ProductListQuery,
    ProductPatch, Variant, VariantDetail, VariantListQuery, VariantPatch,
};
use crate::store::traits::{
    AttributeStore, AttributeValueStore, CategoryStore, ProductImageStore, ProductStore, Store,
    VariantStore,
};

/// In-memory store backed by `RwLock`-guarded maps. Mirrors the sentinel
/// semantics of the PostgreSQL store, including the unique constraints on
/// category, product and attribute names and variant SKUs. Used by the
/// router tests; not intended for production traffic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: Id,
    categories: BTreeMap<Id, Category>,
    products: BTreeMap<Id, Product>,
    attributes: BTreeMap<Id, Attribute>,
    attribute_values: BTreeMap<Id, AttributeValue>,
    variants: BTreeMap<Id, Variant>,
    images: BTreeMap<Id, ProductImage>,
    product_categories: BTreeSet<(Id, Id)>,
    product_attributes: BTreeSet<(Id, Id)>,
    variant_attribute_values: BTreeSet<(Id, Id)>,
}

impl Inner {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn category_name_taken(&self, name: &str, except: Option<Id>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn product_name_taken(&self, name: &str, except: Option<Id>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn attribute_name_taken(&self, name: &str, except: Option<Id>) -> bool {
        self.attributes
            .values()
            .any(|a| a.name == name && Some(a.id) != except)
    }

    fn sku_taken(&self, sku: &str, except: Option<Id>) -> bool {
        self.variants
            .values()
            .any(|v| v.sku == sku && Some(v.id) != except)
    }

    fn all_categories_exist(&self, ids: &[Id]) -> bool {
        ids.iter().all(|id| self.categories.contains_key(id))
    }

    fn all_attributes_exist(&self, ids: &[Id]) -> bool {
        ids.iter().all(|id| self.attributes.contains_key(id))
    }

    fn product_attribute_ids(&self, product_id: Id) -> HashSet<Id> {
        self.product_attributes
            .iter()
            .filter(|(p, _)| *p == product_id)
            .map(|(_, a)| *a)
            .collect()
    }

    /// Resolves value ids and checks each one's attribute is linked to the
    /// product, with the same error ordering as the SQL path.
    fn check_variant_values(&self, product_id: Id, value_ids: &[Id]) -> Result<()> {
        let product_attrs = self.product_attribute_ids(product_id);
        for value_id in value_ids {
            let value = self
                .attribute_values
                .get(value_id)
                .ok_or(CatalogError::AttributeValueNotFound)?;
            if !product_attrs.contains(&value.attribute_id) {
                return Err(CatalogError::InvalidAttributeValueForProduct);
            }
        }
        Ok(())
    }

    fn product_detail(&self, product: Product) -> ProductDetail {
        let id = product.id;
        let categories = self
            .product_categories
            .iter()
            .filter(|(p, _)| *p == id)
            .filter_map(|(_, c)| self.categories.get(c).cloned())
            .collect();
        let attributes = self
            .product_attributes
            .iter()
            .filter(|(p, _)| *p == id)
            .filter_map(|(_, a)| self.attributes.get(a).cloned())
            .collect();
        ProductDetail {
            product,
            categories,
            attributes,
        }
    }

    fn variant_detail(&self, variant: Variant) -> VariantDetail {
        let id = variant.id;
        let attribute_values = self
            .variant_attribute_values
            .iter()
            .filter(|(v, _)| *v == id)
            .filter_map(|(_, av)| self.attribute_values.get(av).cloned())
            .collect();
        VariantDetail {
            variant,
            attribute_values,
        }
    }
}

fn dedup_ids(ids: &[Id]) -> Vec<Id> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.inner.read().categories.values().cloned().collect())
    }

    async fn get_category(&self, id: Id) -> Result<Category> {
        self.inner
            .read()
            .categories
            .get(&id)
            .cloned()
            .ok_or(CatalogError::CategoryNotFound)
    }

    async fn get_child_categories(&self, id: Id) -> Result<Vec<Category>> {
        Ok(self
            .inner
            .read()
            .categories
            .values()
            .filter(|c| c.parent_id == Some(id))
            .cloned()
            .collect())
    }

    async fn list_leaf_categories(&self) -> Result<Vec<Category>> {
        let inner = self.inner.read();
        let parents: HashSet<Id> = inner
            .categories
            .values()
            .filter_map(|c| c.parent_id)
            .collect();
        Ok(inner
            .categories
            .values()
            .filter(|c| !parents.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn add_category(&self, new: NewCategory) -> Result<Category> {
        let mut inner = self.inner.write();
        if let Some(parent_id) = new.parent_id {
            if !inner.categories.contains_key(&parent_id) {
                return Err(CatalogError::ParentCategoryNotFound);
            }
        }
        if inner.category_name_taken(&new.name, None) {
            return Err(CatalogError::DuplicateEntry);
        }

        let now = Utc::now();
        let id = inner.next_id();
        let category = Category {
            id,
            name: new.name,
            description: new.description,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let mut inner = self.inner.write();
        if !inner.categories.contains_key(&id) {
            return Err(CatalogError::CategoryNotFound);
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == id {
                return Err(CatalogError::CategoryCannotBeItsOwnParent);
            }
            if !inner.categories.contains_key(&parent_id) {
                return Err(CatalogError::ParentCategoryNotFound);
            }
        }
        if let Some(name) = &patch.name {
            if inner.category_name_taken(name, Some(id)) {
                return Err(CatalogError::DuplicateEntry);
            }
        }

        let category = inner
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound)?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        if let Some(parent_id) = patch.parent_id {
            category.parent_id = Some(parent_id);
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.categories.contains_key(&id) {
            return Err(CatalogError::CategoryNotFound);
        }
        if inner.categories.values().any(|c| c.parent_id == Some(id)) {
            return Err(CatalogError::CategoryHasChildren);
        }
        inner.categories.remove(&id);
        inner.product_categories.retain(|(_, c)| *c != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<ProductDetail>> {
        let inner = self.inner.read();
        let products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| match query.category_id {
                Some(category_id) => inner.product_categories.contains(&(p.id, category_id)),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(products, query.limit, query.offset)
            .into_iter()
            .map(|p| inner.product_detail(p))
            .collect())
    }

    async fn get_product(&self, id: Id) -> Result<ProductDetail> {
        let inner = self.inner.read();
        let product = inner
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound)?;
        Ok(inner.product_detail(product))
    }

    async fn add_product(&self, new: NewProduct) -> Result<ProductDetail> {
        let mut inner = self.inner.write();
        let category_ids = dedup_ids(&new.categories);
        if !inner.all_categories_exist(&category_ids) {
            return Err(CatalogError::CategoryNotFound);
        }
        let attribute_ids = dedup_ids(&new.attributes);
        if !inner.all_attributes_exist(&attribute_ids) {
            return Err(CatalogError::AttributeNotFound);
        }
        if inner.product_name_taken(&new.name, None) {
            return Err(CatalogError::DuplicateEntry);
        }

        let now = Utc::now();
        let id = inner.next_id();
        let compare_price = new.compare_price_or_default();
        let product = Product {
            id,
            name: new.name,
            description: new.description,
            base_price: new.base_price,
            compare_price,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(id, product.clone());
        for category_id in category_ids {
            inner.product_categories.insert((id, category_id));
        }
        for attribute_id in attribute_ids {
            inner.product_attributes.insert((id, attribute_id));
        }
        Ok(inner.product_detail(product))
    }

    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<ProductDetail> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&id) {
            return Err(CatalogError::ProductNotFound);
        }
        let category_ids = match &patch.categories {
            Some(ids) => {
                let ids = dedup_ids(ids);
                if !inner.all_categories_exist(&ids) {
                    return Err(CatalogError::CategoryNotFound);
                }
                Some(ids)
            }
            None => None,
        };
        let attribute_ids = match &patch.attributes {
            Some(ids) => {
                let ids = dedup_ids(ids);
                if !inner.all_attributes_exist(&ids) {
                    return Err(CatalogError::AttributeNotFound);
                }
                Some(ids)
            }
            None => None,
        };
        if let Some(name) = &patch.name {
            if inner.product_name_taken(name, Some(id)) {
                return Err(CatalogError::DuplicateEntry);
            }
        }

        {
            let product = inner
                .products
                .get_mut(&id)
                .ok_or(CatalogError::ProductNotFound)?;
            if let Some(name) = patch.name {
                product.name = name;
            }
            if let Some(description) = patch.description {
                product.description = Some(description);
            }
            if let Some(base_price) = patch.base_price {
                product.base_price = base_price;
            }
            if let Some(compare_price) = patch.compare_price {
                product.compare_price = compare_price;
            }
            product.updated_at = Utc::now();
        }

        if let Some(ids) = category_ids {
            inner.product_categories.retain(|(p, _)| *p != id);
            for category_id in ids {
                inner.product_categories.insert((id, category_id));
            }
        }
        if let Some(ids) = attribute_ids {
            inner.product_attributes.retain(|(p, _)| *p != id);
            for attribute_id in ids {
                inner.product_attributes.insert((id, attribute_id));
            }
        }

        let product = inner
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound)?;
        Ok(inner.product_detail(product))
    }

    async fn delete_product(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.products.remove(&id).is_none() {
            return Err(CatalogError::ProductNotFound);
        }
        inner.product_categories.retain(|(p, _)| *p != id);
        inner.product_attributes.retain(|(p, _)| *p != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AttributeStore for MemoryStore {
    async fn list_attributes(&self) -> Result<Vec<AttributeWithValues>> {
        let inner = self.inner.read();
        let mut values_by_attribute: HashMap<Id, Vec<AttributeValue>> = HashMap::new();
        for value in inner.attribute_values.values() {
            values_by_attribute
                .entry(value.attribute_id)
                .or_default()
                .push(value.clone());
        }
        Ok(inner
            .attributes
            .values()
            .map(|attribute| AttributeWithValues {
                attribute: attribute.clone(),
                values: values_by_attribute
                    .remove(&attribute.id)
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn get_attribute(&self, id: Id) -> Result<AttributeWithValues> {
        let inner = self.inner.read();
        let attribute = inner
            .attributes
            .get(&id)
            .cloned()
            .ok_or(CatalogError::AttributeNotFound)?;
        let values = inner
            .attribute_values
            .values()
            .filter(|v| v.attribute_id == id)
            .cloned()
            .collect();
        Ok(AttributeWithValues { attribute, values })
    }

    async fn add_attribute(&self, new: NewAttribute) -> Result<Attribute> {
        let mut inner = self.inner.write();
        let name = capitalize_first_letter(&new.name);
        if inner.attribute_name_taken(&name, None) {
            return Err(CatalogError::DuplicateEntry);
        }

        let now = Utc::now();
        let id = inner.next_id();
        let attribute = Attribute {
            id,
            name,
            created_at: now,
            updated_at: now,
        };
        inner.attributes.insert(id, attribute.clone());
        Ok(attribute)
    }

    async fn update_attribute(&self, id: Id, patch: AttributePatch) -> Result<AttributeWithValues> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        {
            let mut inner = self.inner.write();
            if !inner.attributes.contains_key(&id) {
                return Err(CatalogError::AttributeNotFound);
            }
            if let Some(name) = patch.name {
                let name = capitalize_first_letter(&name);
                if inner.attribute_name_taken(&name, Some(id)) {
                    return Err(CatalogError::DuplicateEntry);
                }
                let attribute = inner
                    .attributes
                    .get_mut(&id)
                    .ok_or(CatalogError::AttributeNotFound)?;
                attribute.name = name;
                attribute.updated_at = Utc::now();
            }
        }
        self.get_attribute(id).await
    }

    async fn delete_attribute(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.attributes.contains_key(&id) {
            return Err(CatalogError::AttributeNotFound);
        }
        if inner
            .attribute_values
            .values()
            .any(|v| v.attribute_id == id)
        {
            return Err(CatalogError::AttributeHasValues);
        }
        inner.attributes.remove(&id);
        inner.product_attributes.retain(|(_, a)| *a != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AttributeValueStore for MemoryStore {
    async fn list_attribute_values(&self) -> Result<Vec<AttributeValue>> {
        Ok(self
            .inner
            .read()
            .attribute_values
            .values()
            .cloned()
            .collect())
    }

    async fn get_attribute_value(&self, id: Id) -> Result<AttributeValue> {
        self.inner
            .read()
            .attribute_values
            .get(&id)
            .cloned()
            .ok_or(CatalogError::AttributeValueNotFound)
    }

    async fn add_attribute_value(&self, new: NewAttributeValue) -> Result<AttributeValue> {
        let mut inner = self.inner.write();
        if !inner.attributes.contains_key(&new.attribute_id) {
            return Err(CatalogError::AttributeNotFound);
        }

        let now = Utc::now();
        let id = inner.next_id();
        let value = AttributeValue {
            id,
            attribute_id: new.attribute_id,
            value: capitalize_first_letter(&new.value),
            created_at: now,
            updated_at: now,
        };
        inner.attribute_values.insert(id, value.clone());
        Ok(value)
    }

    async fn update_attribute_value(
        &self,
        id: Id,
        patch: AttributeValuePatch,
    ) -> Result<AttributeValue> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let mut inner = self.inner.write();
        if !inner.attribute_values.contains_key(&id) {
            return Err(CatalogError::AttributeValueNotFound);
        }
        if let Some(attribute_id) = patch.attribute_id {
            if !inner.attributes.contains_key(&attribute_id) {
                return Err(CatalogError::AttributeNotFound);
            }
        }

        let value = inner
            .attribute_values
            .get_mut(&id)
            .ok_or(CatalogError::AttributeValueNotFound)?;
        if let Some(attribute_id) = patch.attribute_id {
            value.attribute_id = attribute_id;
        }
        if let Some(new_value) = patch.value {
            value.value = capitalize_first_letter(&new_value);
        }
        value.updated_at = Utc::now();
        Ok(value.clone())
    }

    async fn delete_attribute_value(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.attribute_values.remove(&id).is_none() {
            return Err(CatalogError::AttributeValueNotFound);
        }
        inner.variant_attribute_values.retain(|(_, av)| *av != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl VariantStore for MemoryStore {
    async fn list_variants(&self, query: VariantListQuery) -> Result<Vec<VariantDetail>> {
        let inner = self.inner.read();
        let variants: Vec<Variant> = inner
            .variants
            .values()
            .filter(|v| match query.product_id {
                Some(product_id) => v.product_id == product_id,
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(variants, query.limit, query.offset)
            .into_iter()
            .map(|v| inner.variant_detail(v))
            .collect())
    }

    async fn get_variant(&self, id: Id) -> Result<VariantDetail> {
        let inner = self.inner.read();
        let variant = inner
            .variants
            .get(&id)
            .cloned()
            .ok_or(CatalogError::VariantNotFound)?;
        Ok(inner.variant_detail(variant))
    }

    async fn add_variant(&self, new: NewVariant) -> Result<VariantDetail> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&new.product_id) {
            return Err(CatalogError::ProductNotFound);
        }
        let value_ids = dedup_ids(&new.attribute_values);
        inner.check_variant_values(new.product_id, &value_ids)?;
        if inner.sku_taken(&new.sku, None) {
            return Err(CatalogError::DuplicateEntry);
        }

        let now = Utc::now();
        let id = inner.next_id();
        let compare_price = new.compare_price_or_default();
        let variant = Variant {
            id,
            product_id: new.product_id,
            sku: new.sku,
            base_price: new.base_price,
            compare_price,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };
        inner.variants.insert(id, variant.clone());
        for value_id in value_ids {
            inner.variant_attribute_values.insert((id, value_id));
        }
        Ok(inner.variant_detail(variant))
    }

    async fn update_variant(&self, id: Id, patch: VariantPatch) -> Result<VariantDetail> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let mut inner = self.inner.write();

        let product_id = match patch.product_id {
            Some(product_id) => {
                if !inner.products.contains_key(&product_id) {
                    return Err(CatalogError::ProductNotFound);
                }
                product_id
            }
            None => inner
                .variants
                .get(&id)
                .map(|v| v.product_id)
                .ok_or(CatalogError::VariantNotFound)?,
        };
        if !inner.variants.contains_key(&id) {
            return Err(CatalogError::VariantNotFound);
        }

        let value_ids = match &patch.attribute_values {
            Some(ids) => {
                let ids = dedup_ids(ids);
                inner.check_variant_values(product_id, &ids)?;
                Some(ids)
            }
            None => None,
        };
        if let Some(sku) = &patch.sku {
            if inner.sku_taken(sku, Some(id)) {
                return Err(CatalogError::DuplicateEntry);
            }
        }

        {
            let variant = inner
                .variants
                .get_mut(&id)
                .ok_or(CatalogError::VariantNotFound)?;
            if let Some(product_id) = patch.product_id {
                variant.product_id = product_id;
            }
            if let Some(sku) = patch.sku {
                variant.sku = sku;
            }
            if let Some(base_price) = patch.base_price {
                variant.base_price = base_price;
            }
            if let Some(compare_price) = patch.compare_price {
                variant.compare_price = compare_price;
            }
            if let Some(stock) = patch.stock {
                variant.stock = stock;
            }
            variant.updated_at = Utc::now();
        }

        if let Some(ids) = value_ids {
            inner.variant_attribute_values.retain(|(v, _)| *v != id);
            for value_id in ids {
                inner.variant_attribute_values.insert((id, value_id));
            }
        }

        let variant = inner
            .variants
            .get(&id)
            .cloned()
            .ok_or(CatalogError::VariantNotFound)?;
        Ok(inner.variant_detail(variant))
    }

    async fn delete_variant(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.variants.remove(&id).is_none() {
            return Err(CatalogError::VariantNotFound);
        }
        inner.variant_attribute_values.retain(|(v, _)| *v != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductImageStore for MemoryStore {
    async fn list_product_images(&self) -> Result<Vec<ProductImage>> {
        Ok(self.inner.read().images.values().cloned().collect())
    }

    async fn get_product_image(&self, id: Id) -> Result<ProductImage> {
        self.inner
            .read()
            .images
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductImageNotFound)
    }

    async fn get_images_by_product(&self, product_id: Id) -> Result<Vec<ProductImage>> {
        Ok(self
            .inner
            .read()
            .images
            .values()
            .filter(|i| i.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn get_images_by_variant(&self, variant_id: Id) -> Result<Vec<ProductImage>> {
        Ok(self
            .inner
            .read()
            .images
            .values()
            .filter(|i| i.variant_id == Some(variant_id))
            .cloned()
            .collect())
    }

    async fn add_product_image(&self, new: NewProductImage) -> Result<ProductImage> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&new.product_id) {
            return Err(CatalogError::ProductNotFound);
        }
        if let Some(variant_id) = new.variant_id {
            if !inner.variants.contains_key(&variant_id) {
                return Err(CatalogError::VariantNotFound);
            }
        }

        let now = Utc::now();
        let id = inner.next_id();
        let image = ProductImage {
            id,
            product_id: new.product_id,
            variant_id: new.variant_id,
            url: new.url,
            is_default: new.is_default,
            created_at: now,
            updated_at: now,
        };
        inner.images.insert(id, image.clone());
        Ok(image)
    }

    async fn add_product_images(&self, batch: Vec<NewProductImage>) -> Result<Vec<ProductImage>> {
        let mut created = Vec::with_capacity(batch.len());
        for new in batch {
            created.push(self.add_product_image(new).await?);
        }
        Ok(created)
    }

    async fn update_product_image(
        &self,
        id: Id,
        patch: ProductImagePatch,
    ) -> Result<ProductImage> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let mut inner = self.inner.write();
        let image = inner
            .images
            .get_mut(&id)
            .ok_or(CatalogError::ProductImageNotFound)?;
        if let Some(variant_id) = patch.variant_id {
            image.variant_id = Some(variant_id);
        }
        if let Some(url) = patch.url {
            image.url = url;
        }
        if let Some(is_default) = patch.is_default {
            image.is_default = is_default;
        }
        image.updated_at = Utc::now();
        Ok(image.clone())
    }

    async fn delete_product_image(&self, id: Id) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.images.remove(&id).is_none() {
            return Err(CatalogError::ProductImageNotFound);
        }
        Ok(())
    }

    async fn delete_images_by_product(&self, product_id: Id) -> Result<u64> {
        let mut inner = self.inner.write();
        let before = inner.images.len();
        inner.images.retain(|_, i| i.product_id != product_id);
        Ok((before - inner.images.len()) as u64)
    }

    async fn delete_images_by_variant(&self, variant_id: Id) -> Result<u64> {
        let mut inner = self.inner.write();
        let before = inner.images.len();
        inner.images.retain(|_, i| i.variant_id != Some(variant_id));
        Ok((before - inner.images.len()) as u64)
    }
}

impl Store for MemoryStore {}
