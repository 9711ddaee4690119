use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database row for a user. Never serialized directly; responses use
/// [`UserSummary`] so the password hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "countInStock")]
    pub count_in_stock: i32,
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// `paid_at`/`delivered_at` are non-null exactly when the matching flag is
/// true; the lifecycle service stamps them in the same UPDATE that flips
/// the flag.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "taxPrice")]
    pub tax_price: f64,
    #[serde(rename = "shippingPrice")]
    pub shipping_price: f64,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    #[serde(rename = "isPaid")]
    pub is_paid: bool,
    #[serde(rename = "paidAt")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(rename = "isDeliver")]
    pub is_deliver: bool,
    #[serde(rename = "deliveredAt")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a product taken at order time. `product_id` is a loose
/// reference that goes NULL if the catalog entry is later deleted; the
/// name/price/image copies stay.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OrderItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "order")]
    pub order_id: Uuid,
    #[serde(rename = "product")]
    pub product_id: Option<Uuid>,
    pub name: String,
    pub qty: i32,
    pub price: f64,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ShippingAddress {
    #[serde(rename = "order")]
    pub order_id: Uuid,
    pub address: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub country: String,
}
