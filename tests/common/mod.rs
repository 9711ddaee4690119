#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use storefront_api::{
    config::{AppConfig, RepeatTransition},
    dto::orders::{CreateOrderRequest, OrderItemInput, ShippingAddressInput},
    middleware::auth::AuthUser,
    services::auth_service::hash_password,
    state::AppState,
};
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        access_token_minutes: 30,
        refresh_token_days: 7,
        page_size: 8,
        repeat_transition: RepeatTransition::Restamp,
    }
}

/// Connects to the database named by TEST_DATABASE_URL / DATABASE_URL and
/// applies migrations. Returns None (and the test passes as skipped) when
/// neither is set.
pub async fn test_state() -> anyhow::Result<Option<AppState>> {
    let url = match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run storefront flow tests."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new().max_connections(5).connect(&url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(Some(AppState {
        pool,
        config: test_config(),
    }))
}

/// Unique login handle so concurrently running test binaries never collide.
pub fn unique_handle(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

pub async fn create_user(
    state: &AppState,
    handle: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO users (id, username, email, password_hash, is_admin) VALUES ($1, $2, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(handle)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(&state.pool)
    .await?;
    Ok(row.0)
}

pub async fn seed_product(
    state: &AppState,
    owner: Uuid,
    name: &str,
    price: f64,
    count_in_stock: i32,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, user_id, name, brand, category, description, price, count_in_stock, image)
        VALUES ($1, $2, $3, 'Test Brand', 'Test Category', 'Test Description', $4, $5, '/images/test.jpg')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner)
    .bind(name)
    .bind(price)
    .bind(count_in_stock)
    .fetch_one(&state.pool)
    .await?;
    Ok(row.0)
}

pub fn auth(user_id: Uuid, is_admin: bool) -> AuthUser {
    AuthUser { user_id, is_admin }
}

pub fn order_request(product: Uuid) -> CreateOrderRequest {
    CreateOrderRequest {
        payment_method: "PayPal".into(),
        tax_price: 610.90,
        shipping_price: 0.0,
        total_price: 8060.90,
        order_items: vec![OrderItemInput {
            product,
            name: "Test Widget".into(),
            qty: 1,
            price: 7450.0,
            image: "/images/widget.jpg".into(),
        }],
        shipping_address: ShippingAddressInput {
            address: "Kurmangazy 15".into(),
            city: "Almaty".into(),
            postal_code: "050081".into(),
            country: "Kazakhstan".into(),
        },
    }
}
