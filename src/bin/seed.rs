use storefront_api::{config::AppConfig, db::create_pool, services::auth_service::hash_password};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", true).await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", false).await?;
    seed_products(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    handle: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    // Username and email are the same handle, like the storefront expects.
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, is_admin)
        VALUES ($1, $2, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(handle)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(handle)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {handle} (admin={is_admin})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool, owner: Uuid) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM products")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Products already present, skipping");
        return Ok(());
    }

    let products = [
        (
            "Airpods Wireless Bluetooth Headphones",
            "Apple",
            "Electronics",
            "Bluetooth technology lets you connect it with compatible devices wirelessly",
            89.99,
            10,
            "/images/airpods.jpg",
        ),
        (
            "iPhone 13 Pro 256GB Memory",
            "Apple",
            "Electronics",
            "A transformative triple-camera system that adds tons of capability",
            599.99,
            7,
            "/images/phone.jpg",
        ),
        (
            "Logitech G-Series Gaming Mouse",
            "Logitech",
            "Electronics",
            "Get a better handle on your games with this Logitech gaming mouse",
            49.99,
            0,
            "/images/mouse.jpg",
        ),
    ];

    for (name, brand, category, description, price, stock, image) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, user_id, name, brand, category, description, price, count_in_stock, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(name)
        .bind(brand)
        .bind(category)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(image)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
