use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderDetail},
    error::AppResult,
    middleware::auth::AuthUser,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_orders))
        .route("/add", post(add_order))
        .route("/mine", get(list_my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/pay", put(pay_order))
        .route("/{id}/deliver", put(deliver_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Every order with owner summary", body = [OrderDetail]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = order_service::list_all_orders(&state, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders/add",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Created order aggregate", body = OrderDetail),
        (status = 400, description = "No order items"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn add_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<OrderDetail>> {
    let order = order_service::create_order(&state, &user, payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/orders/mine",
    responses(
        (status = 200, description = "Caller's orders, possibly empty", body = [OrderDetail]),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = order_service::list_my_orders(&state, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order aggregate", body = OrderDetail),
        (status = 400, description = "Caller is neither owner nor admin"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let order = order_service::get_order(&state, &user, id).await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/pay",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Marked paid", body = String),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is neither owner nor admin"),
        (status = 404, description = "No such order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<&'static str>> {
    order_service::pay_order(&state, &user, id).await?;
    Ok(Json("Order was paid"))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/deliver",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Marked delivered", body = String),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<&'static str>> {
    order_service::deliver_order(&state, &user, id).await?;
    Ok(Json("Order was Delivered"))
}
