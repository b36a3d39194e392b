//! Catalog store: products, categories, and their associations

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One product as served to clients, with its category associations
/// resolved to a map of association id → category name.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub price: i64,
    pub size: Vec<String>,
    pub description: String,
    pub image: String,
    pub stock: i32,
    pub shipping: bool,
    pub categories: BTreeMap<i32, String>,
}

/// Mutable product fields, as submitted on insert/update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub shipping: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub category_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    price: i64,
    size: Vec<String>,
    description: String,
    image: String,
    stock: i32,
    shipping: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct AssociationRow {
    id: i32,
    product_id: i32,
    category_name: Option<String>,
}

const PRODUCT_COLUMNS: &str =
    "id, title, price, size, description, image, stock, shipping";

/// Group association rows per product. Associations pointing at a deleted
/// category (NULL name from the left join) keep their slot with an empty name.
fn group_associations(rows: Vec<AssociationRow>) -> HashMap<i32, BTreeMap<i32, String>> {
    let mut map: HashMap<i32, BTreeMap<i32, String>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id)
            .or_default()
            .insert(row.id, row.category_name.unwrap_or_default());
    }
    map
}

fn assemble(row: ProductRow, categories: BTreeMap<i32, String>) -> Product {
    Product {
        id: row.id,
        title: row.title,
        price: row.price,
        size: row.size,
        description: row.description,
        image: row.image,
        stock: row.stock,
        shipping: row.shipping,
        categories,
    }
}

/// Fetch one product with its full category-association set.
pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Product>, sqlx::Error> {
    let row: Option<ProductRow> =
        sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let assocs: Vec<AssociationRow> = sqlx::query_as(
        r#"
        SELECT pc.id, pc.product_id, c.category_name
        FROM products_category pc
        LEFT JOIN category c ON c.id = pc.category_id
        WHERE pc.product_id = $1
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut grouped = group_associations(assocs);
    let categories = grouped.remove(&row.id).unwrap_or_default();
    Ok(Some(assemble(row, categories)))
}

/// List all products, optionally restricted to one category, ordered by
/// title ascending. Category associations come from one batched query
/// keyed by `product_id = ANY($1)`.
pub async fn list(pool: &PgPool, category: Option<i32>) -> Result<Vec<Product>, sqlx::Error> {
    let rows: Vec<ProductRow> = match category {
        Some(category_id) => {
            sqlx::query_as(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                 WHERE id IN (SELECT product_id FROM products_category WHERE category_id = $1)
                 ORDER BY title"
            ))
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY title"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let assocs: Vec<AssociationRow> = sqlx::query_as(
        r#"
        SELECT pc.id, pc.product_id, c.category_name
        FROM products_category pc
        LEFT JOIN category c ON c.id = pc.category_id
        WHERE pc.product_id = ANY($1)
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut grouped = group_associations(assocs);

    Ok(rows
        .into_iter()
        .map(|r| {
            let categories = grouped.remove(&r.id).unwrap_or_default();
            assemble(r, categories)
        })
        .collect())
}

/// Insert a product and its category association in one transaction,
/// returning the generated product id.
pub async fn insert(
    pool: &PgPool,
    product: &ProductInput,
    category_id: i32,
) -> Result<i32, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (new_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO products (title, price, size, description, image, stock, shipping, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
        RETURNING id
        "#,
    )
    .bind(&product.title)
    .bind(product.price)
    .bind(&product.size)
    .bind(&product.description)
    .bind(&product.image)
    .bind(product.stock)
    .bind(product.shipping)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO products_category (product_id, category_id, created_at, updated_at)
         VALUES ($1, $2, now(), now())",
    )
    .bind(new_id)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(new_id)
}

/// Full replace of the mutable fields by id. Returns false when no row
/// matched the id.
pub async fn update(pool: &PgPool, id: i32, product: &ProductInput) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET title = $1, price = $2, size = $3, description = $4,
            image = $5, stock = $6, shipping = $7, updated_at = now()
        WHERE id = $8
        "#,
    )
    .bind(&product.title)
    .bind(product.price)
    .bind(&product.size)
    .bind(&product.description)
    .bind(&product.image)
    .bind(product.stock)
    .bind(product.shipping)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a product, returning the image reference that was stored at
/// deletion time so the caller can reclaim the blob. Single statement, so
/// the returned reference cannot go stale under a concurrent update.
pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING image")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(image,)| image))
}

/// List categories ordered by name.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, category_name FROM category ORDER BY category_name")
        .fetch_all(pool)
        .await
}

/// Create a product→category association row.
pub async fn insert_association(
    pool: &PgPool,
    product_id: i32,
    category_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products_category (product_id, category_id, created_at, updated_at)
         VALUES ($1, $2, now(), now())",
    )
    .bind(product_id)
    .bind(category_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Repoint a product's category association. Creates the association when
/// the product has none yet.
pub async fn update_association(
    pool: &PgPool,
    product_id: i32,
    category_id: i32,
) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products_category SET category_id = $2, updated_at = now() WHERE product_id = $1",
    )
    .bind(product_id)
    .bind(category_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        insert_association(pool, product_id, category_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_associations_keys_by_association_id() {
        let rows = vec![
            AssociationRow {
                id: 10,
                product_id: 1,
                category_name: Some("Shoes".into()),
            },
            AssociationRow {
                id: 11,
                product_id: 1,
                category_name: Some("Sale".into()),
            },
            AssociationRow {
                id: 12,
                product_id: 2,
                category_name: None,
            },
        ];

        let grouped = group_associations(rows);
        assert_eq!(grouped[&1].len(), 2);
        assert_eq!(grouped[&1][&10], "Shoes");
        assert_eq!(grouped[&1][&11], "Sale");
        // Orphaned association keeps its slot with an empty name
        assert_eq!(grouped[&2][&12], "");
    }

    #[test]
    fn product_serializes_without_timestamps() {
        let product = assemble(
            ProductRow {
                id: 1,
                title: "Sneaker".into(),
                price: 4999,
                size: vec!["M".into(), "L".into()],
                description: "".into(),
                image: "abc.jpg".into(),
                stock: 3,
                shipping: true,
            },
            BTreeMap::from([(10, "Shoes".to_string())]),
        );

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["size"], serde_json::json!(["M", "L"]));
        assert_eq!(json["categories"]["10"], "Shoes");
        assert!(json.get("created_at").is_none());
    }
}
