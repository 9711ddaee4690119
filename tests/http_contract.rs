mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use storefront_api::{
    routes::create_api_router,
    services::{auth_service, order_service},
    state::AppState,
};
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// The extractor rejects before any database or secret lookup, so a lazy
// pool that never connects is enough for the anonymous paths.
#[tokio::test]
async fn anonymous_requests_get_401_with_detail() -> anyhow::Result<()> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/unused")?;
    let state = AppState {
        pool,
        config: common::test_config(),
    };
    let app = app(state);

    for uri in ["/api/orders", "/api/orders/mine", "/api/users/profile"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body = body_json(response).await?;
        assert!(body.get("detail").is_some(), "{uri}");
    }

    // A non-bearer scheme counts as anonymous too.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/orders/mine")
                .header(header::AUTHORIZATION, "Token abc")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert!(body.get("detail").is_some());

    Ok(())
}

// The storefront clients match these bodies verbatim, so the assertions go
// through the full router rather than the service layer.
#[tokio::test]
async fn lifecycle_endpoints_answer_the_literal_bodies() -> anyhow::Result<()> {
    let Some(state) = common::test_state().await? else {
        return Ok(());
    };
    // The bearer extractor resolves the secret from the environment.
    unsafe { std::env::set_var("JWT_SECRET", "test-secret") };

    let owner_id =
        common::create_user(&state, &common::unique_handle("owner"), "pass", false).await?;
    let admin_id =
        common::create_user(&state, &common::unique_handle("admin"), "admin", true).await?;
    let product_id = common::seed_product(&state, admin_id, "Wire Widget", 100.0, 5).await?;

    let owner_token = auth_service::issue_token(
        "test-secret",
        owner_id,
        false,
        "access",
        chrono::Duration::minutes(30),
    )?;
    let admin_token = auth_service::issue_token(
        "test-secret",
        admin_id,
        true,
        "access",
        chrono::Duration::minutes(30),
    )?;

    let detail = order_service::create_order(
        &state,
        &common::auth(owner_id, false),
        common::order_request(product_id),
    )
    .await?;
    let order_id = detail.order.id;

    let app = app(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/orders/{order_id}/pay"))
                .header(header::AUTHORIZATION, format!("Bearer {owner_token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!("Order was paid"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/orders/{order_id}/deliver"))
                .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!("Order was Delivered"));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/products/{product_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!("Product deleted successfully"));

    Ok(())
}
