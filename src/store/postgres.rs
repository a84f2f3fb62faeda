use std::collections::{HashMap, HashSet};

use anyhow::Context;
use itertools::Itertools;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgExecutor, PgPool, QueryBuilder, Row};

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

const CATEGORY_COLUMNS: &str = "id, name, description, parent_id, created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, name, description, base_price, compare_price, created_at, updated_at";
const ATTRIBUTE_COLUMNS: &str = "id, name, created_at, updated_at";
const ATTRIBUTE_VALUE_COLUMNS: &str = "id, attribute_id, value, created_at, updated_at";
const VARIANT_COLUMNS: &str =
    "id, product_id, sku, base_price, compare_price, stock, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, product_id, variant_id, url, is_default, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        parent_id: row.get("parent_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        base_price: row.get("base_price"),
        compare_price: row.get("compare_price"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn attribute_from_row(row: &PgRow) -> Attribute {
    Attribute {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn attribute_value_from_row(row: &PgRow) -> AttributeValue {
    AttributeValue {
        id: row.get("id"),
        attribute_id: row.get("attribute_id"),
        value: row.get("value"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn variant_from_row(row: &PgRow) -> Variant {
    Variant {
        id: row.get("id"),
        product_id: row.get("product_id"),
        sku: row.get("sku"),
        base_price: row.get("base_price"),
        compare_price: row.get("compare_price"),
        stock: row.get("stock"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn image_from_row(row: &PgRow) -> ProductImage {
    ProductImage {
        id: row.get("id"),
        product_id: row.get("product_id"),
        variant_id: row.get("variant_id"),
        url: row.get("url"),
        is_default: row.get("is_default"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

async fn category_exists<'e, E: PgExecutor<'e>>(executor: E, id: Id) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

async fn product_exists<'e, E: PgExecutor<'e>>(executor: E, id: Id) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

async fn attribute_exists<'e, E: PgExecutor<'e>>(executor: E, id: Id) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM attributes WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

async fn variant_exists<'e, E: PgExecutor<'e>>(executor: E, id: Id) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM variants WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

/// True when every id in the (deduplicated) list resolves to a category row.
async fn all_categories_exist<'e, E: PgExecutor<'e>>(executor: E, ids: &[Id]) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(executor)
        .await?;
    Ok(count as usize == ids.len())
}

async fn all_attributes_exist<'e, E: PgExecutor<'e>>(executor: E, ids: &[Id]) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attributes WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(executor)
        .await?;
    Ok(count as usize == ids.len())
}

/// Fetches the attribute values for the given ids, failing with
/// AttributeValueNotFound when any id does not resolve.
async fn resolve_attribute_values<'e, E: PgExecutor<'e>>(
    executor: E,
    ids: &[Id],
) -> Result<Vec<AttributeValue>> {
    let rows = sqlx::query(&format!(
        "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await?;

    if rows.len() != ids.len() {
        return Err(CatalogError::AttributeValueNotFound);
    }
    Ok(rows.iter().map(attribute_value_from_row).collect())
}

/// Attribute ids linked to the product through the product_attributes join.
async fn product_attribute_ids<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: Id,
) -> Result<HashSet<Id>> {
    let ids: Vec<Id> =
        sqlx::query_scalar("SELECT attribute_id FROM product_attributes WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(executor)
            .await?;
    Ok(ids.into_iter().collect())
}

/// Every attribute value's owning attribute must be linked to the product.
fn check_values_belong_to_product(
    product_attrs: &HashSet<Id>,
    values: &[AttributeValue],
) -> Result<()> {
    if values
        .iter()
        .any(|v| !product_attrs.contains(&v.attribute_id))
    {
        return Err(CatalogError::InvalidAttributeValueForProduct);
    }
    Ok(())
}

fn dedup_ids(ids: &[Id]) -> Vec<Id> {
    ids.iter().copied().unique().collect()
}

impl PostgresStore {
    /// Linked categories for a page of products, keyed by product id.
    async fn categories_for_products(
        &self,
        product_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<Category>>> {
        let rows = sqlx::query(
            "SELECT pc.product_id AS link_product_id, \
                    c.id, c.name, c.description, c.parent_id, c.created_at, c.updated_at \
             FROM product_categories pc \
             JOIN categories c ON c.id = pc.category_id \
             WHERE pc.product_id = ANY($1) \
             ORDER BY c.id",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Id, Vec<Category>> = HashMap::new();
        for row in &rows {
            let product_id: Id = row.get("link_product_id");
            grouped
                .entry(product_id)
                .or_default()
                .push(category_from_row(row));
        }
        Ok(grouped)
    }

    async fn attributes_for_products(
        &self,
        product_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<Attribute>>> {
        let rows = sqlx::query(
            "SELECT pa.product_id AS link_product_id, \
                    a.id, a.name, a.created_at, a.updated_at \
             FROM product_attributes pa \
             JOIN attributes a ON a.id = pa.attribute_id \
             WHERE pa.product_id = ANY($1) \
             ORDER BY a.id",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Id, Vec<Attribute>> = HashMap::new();
        for row in &rows {
            let product_id: Id = row.get("link_product_id");
            grouped
                .entry(product_id)
                .or_default()
                .push(attribute_from_row(row));
        }
        Ok(grouped)
    }

    async fn attribute_values_for_variants(
        &self,
        variant_ids: &[Id],
    ) -> Result<HashMap<Id, Vec<AttributeValue>>> {
        let rows = sqlx::query(
            "SELECT vav.variant_id AS link_variant_id, \
                    av.id, av.attribute_id, av.value, av.created_at, av.updated_at \
             FROM variant_attribute_values vav \
             JOIN attribute_values av ON av.id = vav.attribute_value_id \
             WHERE vav.variant_id = ANY($1) \
             ORDER BY av.id",
        )
        .bind(variant_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Id, Vec<AttributeValue>> = HashMap::new();
        for row in &rows {
            let variant_id: Id = row.get("link_variant_id");
            grouped
                .entry(variant_id)
                .or_default()
                .push(attribute_value_from_row(row));
        }
        Ok(grouped)
    }
}

#[async_trait::async_trait]
impl CategoryStore for PostgresStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn get_category(&self, id: Id) -> Result<Category> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(category_from_row)
            .ok_or(CatalogError::CategoryNotFound)
    }

    async fn get_child_categories(&self, id: Id) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE parent_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn list_leaf_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE id NOT IN (SELECT parent_id FROM categories WHERE parent_id IS NOT NULL) \
             ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn add_category(&self, new: NewCategory) -> Result<Category> {
        if let Some(parent_id) = new.parent_id {
            if !category_exists(&self.pool, parent_id).await? {
                return Err(CatalogError::ParentCategoryNotFound);
            }
        }

        let row = sqlx::query(&format!(
            "INSERT INTO categories (name, description, parent_id) \
             VALUES ($1, $2, $3) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(category_from_row(&row))
    }

    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        if !category_exists(&self.pool, id).await? {
            return Err(CatalogError::CategoryNotFound);
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == id {
                return Err(CatalogError::CategoryCannotBeItsOwnParent);
            }
            if !category_exists(&self.pool, parent_id).await? {
                return Err(CatalogError::ParentCategoryNotFound);
            }
        }

        let mut qb = QueryBuilder::new("UPDATE categories SET updated_at = NOW()");
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(parent_id) = patch.parent_id {
            qb.push(", parent_id = ").push_bind(parent_id);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {CATEGORY_COLUMNS}"));

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref()
            .map(category_from_row)
            .ok_or(CatalogError::CategoryNotFound)
    }

    async fn delete_category(&self, id: Id) -> Result<()> {
        if !category_exists(&self.pool, id).await? {
            return Err(CatalogError::CategoryNotFound);
        }

        let child_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if child_count > 0 {
            return Err(CatalogError::CategoryHasChildren);
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresStore {
    async fn list_products(&self, query: ProductListQuery) -> Result<Vec<ProductDetail>> {
        let mut qb = QueryBuilder::new(
            "SELECT p.id, p.name, p.description, p.base_price, p.compare_price, \
             p.created_at, p.updated_at FROM products p",
        );
        if let Some(category_id) = query.category_id {
            qb.push(" JOIN product_categories pc ON pc.product_id = p.id AND pc.category_id = ")
                .push_bind(category_id);
        }
        qb.push(" ORDER BY p.id LIMIT ").push_bind(query.limit);
        qb.push(" OFFSET ").push_bind(query.offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let products: Vec<Product> = rows.iter().map(product_from_row).collect();
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Id> = products.iter().map(|p| p.id).collect();
        let mut categories = self.categories_for_products(&ids).await?;
        let mut attributes = self.attributes_for_products(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let id = product.id;
                ProductDetail {
                    product,
                    categories: categories.remove(&id).unwrap_or_default(),
                    attributes: attributes.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn get_product(&self, id: Id) -> Result<ProductDetail> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let product = row
            .as_ref()
            .map(product_from_row)
            .ok_or(CatalogError::ProductNotFound)?;

        let mut categories = self.categories_for_products(&[id]).await?;
        let mut attributes = self.attributes_for_products(&[id]).await?;

        Ok(ProductDetail {
            product,
            categories: categories.remove(&id).unwrap_or_default(),
            attributes: attributes.remove(&id).unwrap_or_default(),
        })
    }

    async fn add_product(&self, new: NewProduct) -> Result<ProductDetail> {
        let category_ids = dedup_ids(&new.categories);
        if !all_categories_exist(&self.pool, &category_ids).await? {
            return Err(CatalogError::CategoryNotFound);
        }
        let attribute_ids = dedup_ids(&new.attributes);
        if !attribute_ids.is_empty() && !all_attributes_exist(&self.pool, &attribute_ids).await? {
            return Err(CatalogError::AttributeNotFound);
        }

        let mut tx = self.pool.begin().await?;

        let product_id: Id = sqlx::query_scalar(
            "INSERT INTO products (name, description, base_price, compare_price) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.base_price)
        .bind(new.compare_price_or_default())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id) \
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(product_id)
        .bind(&category_ids)
        .execute(&mut *tx)
        .await?;

        if !attribute_ids.is_empty() {
            sqlx::query(
                "INSERT INTO product_attributes (product_id, attribute_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(product_id)
            .bind(&attribute_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_product(product_id).await
    }

    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<ProductDetail> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }

        let category_ids = match &patch.categories {
            Some(ids) => {
                let ids = dedup_ids(ids);
                if !all_categories_exist(&self.pool, &ids).await? {
                    return Err(CatalogError::CategoryNotFound);
                }
                Some(ids)
            }
            None => None,
        };
        let attribute_ids = match &patch.attributes {
            Some(ids) => {
                let ids = dedup_ids(ids);
                if !ids.is_empty() && !all_attributes_exist(&self.pool, &ids).await? {
                    return Err(CatalogError::AttributeNotFound);
                }
                Some(ids)
            }
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let locked: Option<Id> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        if patch.has_scalar_fields() {
            let mut qb = QueryBuilder::new("UPDATE products SET updated_at = NOW()");
            if let Some(name) = &patch.name {
                qb.push(", name = ").push_bind(name);
            }
            if let Some(description) = &patch.description {
                qb.push(", description = ").push_bind(description);
            }
            if let Some(base_price) = patch.base_price {
                qb.push(", base_price = ").push_bind(base_price);
            }
            if let Some(compare_price) = patch.compare_price {
                qb.push(", compare_price = ").push_bind(compare_price);
            }
            qb.push(" WHERE id = ").push_bind(id);
            qb.build().execute(&mut *tx).await?;
        }

        // Association patches replace the full link set.
        if let Some(ids) = &category_ids {
            sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO product_categories (product_id, category_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(id)
            .bind(ids)
            .execute(&mut *tx)
            .await?;
        }
        if let Some(ids) = &attribute_ids {
            sqlx::query("DELETE FROM product_attributes WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if !ids.is_empty() {
                sqlx::query(
                    "INSERT INTO product_attributes (product_id, attribute_id) \
                     SELECT $1, UNNEST($2::BIGINT[])",
                )
                .bind(id)
                .bind(ids)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get_product(id).await
    }

    async fn delete_product(&self, id: Id) -> Result<()> {
        if !product_exists(&self.pool, id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM product_attributes WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        // Variants and images are intentionally left in place; see DESIGN.md.
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AttributeStore for PostgresStore {
    async fn list_attributes(&self) -> Result<Vec<AttributeWithValues>> {
        let rows = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_COLUMNS} FROM attributes ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        let attributes: Vec<Attribute> = rows.iter().map(attribute_from_row).collect();

        let value_rows = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut values_by_attribute: HashMap<Id, Vec<AttributeValue>> = HashMap::new();
        for row in &value_rows {
            let value = attribute_value_from_row(row);
            values_by_attribute
                .entry(value.attribute_id)
                .or_default()
                .push(value);
        }

        Ok(attributes
            .into_iter()
            .map(|attribute| {
                let values = values_by_attribute.remove(&attribute.id).unwrap_or_default();
                AttributeWithValues { attribute, values }
            })
            .collect())
    }

    async fn get_attribute(&self, id: Id) -> Result<AttributeWithValues> {
        let row = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_COLUMNS} FROM attributes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let attribute = row
            .as_ref()
            .map(attribute_from_row)
            .ok_or(CatalogError::AttributeNotFound)?;

        let value_rows = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values \
             WHERE attribute_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AttributeWithValues {
            attribute,
            values: value_rows.iter().map(attribute_value_from_row).collect(),
        })
    }

    async fn add_attribute(&self, new: NewAttribute) -> Result<Attribute> {
        let row = sqlx::query(&format!(
            "INSERT INTO attributes (name) VALUES ($1) RETURNING {ATTRIBUTE_COLUMNS}"
        ))
        .bind(capitalize_first_letter(&new.name))
        .fetch_one(&self.pool)
        .await?;

        Ok(attribute_from_row(&row))
    }

    async fn update_attribute(&self, id: Id, patch: AttributePatch) -> Result<AttributeWithValues> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        if !attribute_exists(&self.pool, id).await? {
            return Err(CatalogError::AttributeNotFound);
        }

        if let Some(name) = &patch.name {
            sqlx::query("UPDATE attributes SET name = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(capitalize_first_letter(name))
                .execute(&self.pool)
                .await?;
        }

        self.get_attribute(id).await
    }

    async fn delete_attribute(&self, id: Id) -> Result<()> {
        if !attribute_exists(&self.pool, id).await? {
            return Err(CatalogError::AttributeNotFound);
        }

        let value_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attribute_values WHERE attribute_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if value_count > 0 {
            return Err(CatalogError::AttributeHasValues);
        }

        sqlx::query("DELETE FROM attributes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AttributeValueStore for PostgresStore {
    async fn list_attribute_values(&self) -> Result<Vec<AttributeValue>> {
        let rows = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(attribute_value_from_row).collect())
    }

    async fn get_attribute_value(&self, id: Id) -> Result<AttributeValue> {
        let row = sqlx::query(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(attribute_value_from_row)
            .ok_or(CatalogError::AttributeValueNotFound)
    }

    async fn add_attribute_value(&self, new: NewAttributeValue) -> Result<AttributeValue> {
        if !attribute_exists(&self.pool, new.attribute_id).await? {
            return Err(CatalogError::AttributeNotFound);
        }

        let row = sqlx::query(&format!(
            "INSERT INTO attribute_values (attribute_id, value) VALUES ($1, $2) \
             RETURNING {ATTRIBUTE_VALUE_COLUMNS}"
        ))
        .bind(new.attribute_id)
        .bind(capitalize_first_letter(&new.value))
        .fetch_one(&self.pool)
        .await?;

        Ok(attribute_value_from_row(&row))
    }

    async fn update_attribute_value(
        &self,
        id: Id,
        patch: AttributeValuePatch,
    ) -> Result<AttributeValue> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM attribute_values WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(CatalogError::AttributeValueNotFound);
        }
        if let Some(attribute_id) = patch.attribute_id {
            if !attribute_exists(&self.pool, attribute_id).await? {
                return Err(CatalogError::AttributeNotFound);
            }
        }

        let mut qb = QueryBuilder::new("UPDATE attribute_values SET updated_at = NOW()");
        if let Some(attribute_id) = patch.attribute_id {
            qb.push(", attribute_id = ").push_bind(attribute_id);
        }
        if let Some(value) = &patch.value {
            qb.push(", value = ").push_bind(capitalize_first_letter(value));
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {ATTRIBUTE_VALUE_COLUMNS}"));

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref()
            .map(attribute_value_from_row)
            .ok_or(CatalogError::AttributeValueNotFound)
    }

    async fn delete_attribute_value(&self, id: Id) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM attribute_values WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(CatalogError::AttributeValueNotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl VariantStore for PostgresStore {
    async fn list_variants(&self, query: VariantListQuery) -> Result<Vec<VariantDetail>> {
        let mut qb = QueryBuilder::new(
            "SELECT id, product_id, sku, base_price, compare_price, stock, \
             created_at, updated_at FROM variants",
        );
        if let Some(product_id) = query.product_id {
            qb.push(" WHERE product_id = ").push_bind(product_id);
        }
        qb.push(" ORDER BY id LIMIT ").push_bind(query.limit);
        qb.push(" OFFSET ").push_bind(query.offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let variants: Vec<Variant> = rows.iter().map(variant_from_row).collect();
        if variants.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Id> = variants.iter().map(|v| v.id).collect();
        let mut values = self.attribute_values_for_variants(&ids).await?;

        Ok(variants
            .into_iter()
            .map(|variant| {
                let id = variant.id;
                VariantDetail {
                    variant,
                    attribute_values: values.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn get_variant(&self, id: Id) -> Result<VariantDetail> {
        let row = sqlx::query(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let variant = row
            .as_ref()
            .map(variant_from_row)
            .ok_or(CatalogError::VariantNotFound)?;

        let mut values = self.attribute_values_for_variants(&[id]).await?;
        Ok(VariantDetail {
            variant,
            attribute_values: values.remove(&id).unwrap_or_default(),
        })
    }

    async fn add_variant(&self, new: NewVariant) -> Result<VariantDetail> {
        if !product_exists(&self.pool, new.product_id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        let value_ids = dedup_ids(&new.attribute_values);
        if !value_ids.is_empty() {
            let values = resolve_attribute_values(&self.pool, &value_ids).await?;
            let product_attrs = product_attribute_ids(&self.pool, new.product_id).await?;
            check_values_belong_to_product(&product_attrs, &values)?;
        }

        let mut tx = self.pool.begin().await?;

        let variant_id: Id = sqlx::query_scalar(
            "INSERT INTO variants (product_id, sku, base_price, compare_price, stock) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(new.product_id)
        .bind(&new.sku)
        .bind(new.base_price)
        .bind(new.compare_price_or_default())
        .bind(new.stock)
        .fetch_one(&mut *tx)
        .await?;

        if !value_ids.is_empty() {
            sqlx::query(
                "INSERT INTO variant_attribute_values (variant_id, attribute_value_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(variant_id)
            .bind(&value_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_variant(variant_id).await
    }

    async fn update_variant(&self, id: Id, patch: VariantPatch) -> Result<VariantDetail> {
        if patch.is_empty() {
            return Err(CatalogError::NoFieldsToUpdate);
        }

        // Resolve the product the attribute-value membership check runs
        // against: either the incoming product_id or the variant's current one.
        let product_id = match patch.product_id {
            Some(product_id) => {
                if !product_exists(&self.pool, product_id).await? {
                    return Err(CatalogError::ProductNotFound);
                }
                product_id
            }
            None => {
                let current: Option<Id> =
                    sqlx::query_scalar("SELECT product_id FROM variants WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?;
                current.ok_or(CatalogError::VariantNotFound)?
            }
        };

        let value_ids = match &patch.attribute_values {
            Some(ids) => {
                let ids = dedup_ids(ids);
                if !ids.is_empty() {
                    let values = resolve_attribute_values(&self.pool, &ids).await?;
                    let product_attrs = product_attribute_ids(&self.pool, product_id).await?;
                    check_values_belong_to_product(&product_attrs, &values)?;
                }
                Some(ids)
            }
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let locked: Option<Id> =
            sqlx::query_scalar("SELECT id FROM variants WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(CatalogError::VariantNotFound);
        }

        if patch.has_scalar_fields() {
            let mut qb = QueryBuilder::new("UPDATE variants SET updated_at = NOW()");
            if let Some(product_id) = patch.product_id {
                qb.push(", product_id = ").push_bind(product_id);
            }
            if let Some(sku) = &patch.sku {
                qb.push(", sku = ").push_bind(sku);
            }
            if let Some(base_price) = patch.base_price {
                qb.push(", base_price = ").push_bind(base_price);
            }
            if let Some(compare_price) = patch.compare_price {
                qb.push(", compare_price = ").push_bind(compare_price);
            }
            if let Some(stock) = patch.stock {
                qb.push(", stock = ").push_bind(stock);
            }
            qb.push(" WHERE id = ").push_bind(id);
            qb.build().execute(&mut *tx).await?;
        }

        if let Some(ids) = &value_ids {
            sqlx::query("DELETE FROM variant_attribute_values WHERE variant_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if !ids.is_empty() {
                sqlx::query(
                    "INSERT INTO variant_attribute_values (variant_id, attribute_value_id) \
                     SELECT $1, UNNEST($2::BIGINT[])",
                )
                .bind(id)
                .bind(ids)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get_variant(id).await
    }

    async fn delete_variant(&self, id: Id) -> Result<()> {
        if !variant_exists(&self.pool, id).await? {
            return Err(CatalogError::VariantNotFound);
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM variant_attribute_values WHERE variant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductImageStore for PostgresStore {
    async fn list_product_images(&self) -> Result<Vec<ProductImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM product_images ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(image_from_row).collect())
    }

    async fn get_product_image(&self, id: Id) -> Result<ProductImage> {
        let row = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM product_images WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(image_from_row)
            .ok_or(CatalogError::ProductImageNotFound)
    }

    async fn get_images_by_product(&self, product_id: Id) -> Result<Vec<ProductImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM product_images WHERE product_id = $1 ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(image_from_row).collect())
    }

    async fn get_images_by_variant(&self, variant_id: Id) -> Result<Vec<ProductImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM product_images WHERE variant_id = $1 ORDER BY id"
        ))
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(image_from_row).collect())
    }

    async fn add_product_image(&self, new: NewProductImage) -> Result<ProductImage> {
        if !product_exists(&self.pool, new.product_id).await? {
            return Err(CatalogError::ProductNotFound);
        }
        if let Some(variant_id) = new.variant_id {
            if !variant_exists(&self.pool, variant_id).await? {
                return Err(CatalogError::VariantNotFound);
            }
        }

        let row = sqlx::query(&format!(
            "INSERT INTO product_images (product_id, variant_id, url, is_default) \
             VALUES ($1, $2, $3, $4) RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(new.product_id)
        .bind(new.variant_id)
        .bind(&new.url)
        .bind(new.is_default)
        .fetch_one(&self.pool)
        .await?;

        Ok(image_from_row(&row))
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

        let mut qb = QueryBuilder::new("UPDATE product_images SET updated_at = NOW()");
        if let Some(variant_id) = patch.variant_id {
            qb.push(", variant_id = ").push_bind(variant_id);
        }
        if let Some(url) = &patch.url {
            qb.push(", url = ").push_bind(url);
        }
        if let Some(is_default) = patch.is_default {
            qb.push(", is_default = ").push_bind(is_default);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {IMAGE_COLUMNS}"));

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref()
            .map(image_from_row)
            .ok_or(CatalogError::ProductImageNotFound)
    }

    async fn delete_product_image(&self, id: Id) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM product_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(CatalogError::ProductImageNotFound);
        }
        Ok(())
    }

    async fn delete_images_by_product(&self, product_id: Id) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected())
    }

    async fn delete_images_by_variant(&self, variant_id: Id) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM product_images WHERE variant_id = $1")
            .bind(variant_id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected())
    }
}

impl Store for PostgresStore {}
