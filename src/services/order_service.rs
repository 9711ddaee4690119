use uuid::Uuid;

use crate::{
    audit::log_audit,
    config::RepeatTransition,
    dto::orders::{CreateOrderRequest, OrderDetail},
    error::{AppError, AppResult},
    gate::{OrderAction, authorize_order, ensure_admin},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, ShippingAddress, UserSummary},
    state::AppState,
};

/// Creates the order aggregate (order + items + shipping address) in one
/// transaction. Totals are stored as supplied; there is no server-side
/// recomputation or stock decrement in this contract.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<OrderDetail> {
    if payload.order_items.is_empty() {
        return Err(AppError::BadRequest("No Order Items".into()));
    }
    if payload.order_items.iter().any(|item| item.qty <= 0) {
        return Err(AppError::BadRequest(
            "Order item quantity must be positive".into(),
        ));
    }

    let mut txn = state.pool.begin().await?;

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (id, user_id, payment_method, tax_price, shipping_price, total_price)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(&payload.payment_method)
    .bind(payload.tax_price)
    .bind(payload.shipping_price)
    .bind(payload.total_price)
    .fetch_one(&mut *txn)
    .await?;

    let mut order_items = Vec::with_capacity(payload.order_items.len());
    for item in &payload.order_items {
        let row: OrderItem = sqlx::query_as(
            r#"
            INSERT INTO order_items (id, order_id, product_id, name, qty, price, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(item.product)
        .bind(&item.name)
        .bind(item.qty)
        .bind(item.price)
        .bind(&item.image)
        .fetch_one(&mut *txn)
        .await
        .map_err(|err| {
            // A bad product reference is caller input, not a server fault.
            if is_foreign_key_violation(&err) {
                AppError::BadRequest(format!("Product {} does not exist", item.product))
            } else {
                AppError::Db(err)
            }
        })?;
        order_items.push(row);
    }

    let shipping: ShippingAddress = sqlx::query_as(
        r#"
        INSERT INTO shipping_addresses (order_id, address, city, postal_code, country)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(&payload.shipping_address.address)
    .bind(&payload.shipping_address.city)
    .bind(&payload.shipping_address.postal_code)
    .bind(&payload.shipping_address.country)
    .fetch_one(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let owner = fetch_owner(state, order.user_id).await?;
    Ok(OrderDetail {
        order,
        order_items,
        shipping_address: Some(shipping),
        user: owner,
    })
}

/// Missing id answers 404; an existing order someone else owns answers 400
/// through the gate. The two must stay distinguishable.
pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<OrderDetail> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let order = order.ok_or(AppError::NotFound)?;

    authorize_order(OrderAction::View, user, order.user_id)?;

    load_detail(state, order).await
}

pub async fn pay_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Order> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let order = order.ok_or(AppError::NotFound)?;

    authorize_order(OrderAction::Pay, user, order.user_id)?;

    if order.is_paid && state.config.repeat_transition == RepeatTransition::Reject {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let order: Order =
        sqlx::query_as("UPDATE orders SET is_paid = TRUE, paid_at = now() WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_paid",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(order)
}

pub async fn deliver_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Order> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let order = order.ok_or(AppError::NotFound)?;

    authorize_order(OrderAction::Deliver, user, order.user_id)?;

    if order.is_deliver && state.config.repeat_transition == RepeatTransition::Reject {
        return Err(AppError::BadRequest("Order already delivered".into()));
    }

    let order: Order = sqlx::query_as(
        "UPDATE orders SET is_deliver = TRUE, delivered_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delivered",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(order)
}

/// Caller's own orders in any pay/deliver state; an empty list is a normal
/// answer, not an error.
pub async fn list_my_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<OrderDetail>> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user.user_id)
            .fetch_all(&state.pool)
            .await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        details.push(load_detail(state, order).await?);
    }
    Ok(details)
}

pub async fn list_all_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<OrderDetail>> {
    ensure_admin(user)?;

    let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        details.push(load_detail(state, order).await?);
    }
    Ok(details)
}

async fn load_detail(state: &AppState, order: Order) -> AppResult<OrderDetail> {
    let order_items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .fetch_all(&state.pool)
            .await?;

    let shipping_address: Option<ShippingAddress> =
        sqlx::query_as("SELECT * FROM shipping_addresses WHERE order_id = $1")
            .bind(order.id)
            .fetch_optional(&state.pool)
            .await?;

    let user = fetch_owner(state, order.user_id).await?;

    Ok(OrderDetail {
        order,
        order_items,
        shipping_address,
        user,
    })
}

// Postgres SQLSTATE 23503.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23503")
    )
}

async fn fetch_owner(state: &AppState, user_id: Uuid) -> AppResult<UserSummary> {
    let owner: UserSummary =
        sqlx::query_as("SELECT id, username, email, is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;
    Ok(owner)
}
