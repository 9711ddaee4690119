use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// The list contract always carries these three keys, even for an empty
/// catalog (`products: [], page: 1, pages: 1`).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "countInStock")]
    pub count_in_stock: Option<i32>,
    pub image: Option<String>,
}
