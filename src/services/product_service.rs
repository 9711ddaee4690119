use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{ProductListQuery, ProductPage, UpdateProductRequest},
    error::{AppError, AppResult},
    gate::ensure_admin,
    middleware::auth::AuthUser,
    models::Product,
    state::AppState,
};

// Template values for the admin "create then edit" flow.
const SAMPLE_NAME: &str = "Product Name";
const SAMPLE_BRAND: &str = "Sample brand";
const SAMPLE_CATEGORY: &str = "Sample category";

pub async fn list_products(state: &AppState, query: ProductListQuery) -> AppResult<ProductPage> {
    let size = state.config.page_size;
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * size;
    let pattern = query
        .keyword
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{k}%"));

    let (products, total): (Vec<Product>, i64) = match &pattern {
        Some(pattern) => {
            let products = sqlx::query_as(
                "SELECT * FROM products WHERE name ILIKE $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(pattern)
            .bind(size)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;
            let total: (i64,) = sqlx::query_as("SELECT count(*) FROM products WHERE name ILIKE $1")
                .bind(pattern)
                .fetch_one(&state.pool)
                .await?;
            (products, total.0)
        }
        None => {
            let products =
                sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(size)
                    .bind(offset)
                    .fetch_all(&state.pool)
                    .await?;
            let total: (i64,) = sqlx::query_as("SELECT count(*) FROM products")
                .fetch_one(&state.pool)
                .await?;
            (products, total.0)
        }
    };

    Ok(ProductPage {
        products,
        page,
        pages: page_count(total, size),
    })
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    product.ok_or(AppError::NotFound)
}

/// Admin-only template instantiation: no request body, fixed placeholder
/// fields, meant to be edited right after. A quirk of the storefront
/// contract, reproduced deliberately.
pub async fn create_sample_product(state: &AppState, user: &AuthUser) -> AppResult<Product> {
    ensure_admin(user)?;

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, user_id, name, brand, category, description, price, count_in_stock)
        VALUES ($1, $2, $3, $4, $5, '', 0, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(SAMPLE_NAME)
    .bind(SAMPLE_BRAND)
    .bind(SAMPLE_CATEGORY)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    ensure_admin(user)?;

    let existing: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    let name = payload.name.unwrap_or(existing.name);
    let brand = payload.brand.unwrap_or(existing.brand);
    let category = payload.category.unwrap_or(existing.category);
    let description = payload.description.unwrap_or(existing.description);
    let price = payload.price.unwrap_or(existing.price);
    let count_in_stock = payload.count_in_stock.unwrap_or(existing.count_in_stock);
    let image = payload.image.unwrap_or(existing.image);

    if price < 0.0 {
        return Err(AppError::BadRequest("Price must be non-negative".into()));
    }
    if count_in_stock < 0 {
        return Err(AppError::BadRequest(
            "Stock count must be non-negative".into(),
        ));
    }

    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET name = $2, brand = $3, category = $4, description = $5,
            price = $6, count_in_stock = $7, image = $8
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(brand)
    .bind(category)
    .bind(description)
    .bind(price)
    .bind(count_in_stock)
    .bind(image)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product)
}

/// Removal is immediate; order items referencing the product keep their
/// snapshot and their `product_id` goes NULL via the foreign key.
pub async fn delete_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

fn page_count(total: i64, size: i64) -> i64 {
    ((total + size - 1) / size).max(1)
}
