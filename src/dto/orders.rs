use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, ShippingAddress, UserSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub product: uuid::Uuid,
    pub name: String,
    pub qty: i32,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShippingAddressInput {
    pub address: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub country: String,
}

/// Totals come from the caller and are stored as-is; nothing recomputes
/// them server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "taxPrice")]
    pub tax_price: f64,
    #[serde(rename = "shippingPrice")]
    pub shipping_price: f64,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderItemInput>,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: ShippingAddressInput,
}

/// The order aggregate as the storefront sees it: the order row with its
/// items, address, and an owner summary under the `User` key.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderItem>,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(rename = "User")]
    pub user: UserSummary,
}
