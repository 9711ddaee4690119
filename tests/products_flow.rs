mod common;

use storefront_api::{
    dto::{
        orders::{CreateOrderRequest, OrderItemInput, ShippingAddressInput},
        products::{ProductListQuery, UpdateProductRequest},
    },
    error::AppError,
    services::{order_service, product_service},
};
use uuid::Uuid;

#[tokio::test]
async fn admin_creates_placeholder_product() -> anyhow::Result<()> {
    let Some(state) = common::test_state().await? else {
        return Ok(());
    };

    let admin_id =
        common::create_user(&state, &common::unique_handle("admin"), "admin", true).await?;
    let user_id =
        common::create_user(&state, &common::unique_handle("user"), "pass", false).await?;

    let product =
        product_service::create_sample_product(&state, &common::auth(admin_id, true)).await?;
    assert_eq!(product.user_id, admin_id);
    assert_eq!(product.name.trim(), "Product Name");
    assert_eq!(product.brand.trim(), "Sample brand");
    assert_eq!(product.category.trim(), "Sample category");
    assert_eq!(product.price, 0.0);
    assert_eq!(product.count_in_stock, 0);

    let err = product_service::create_sample_product(&state, &common::auth(user_id, false))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn product_list_contract_has_fixed_keys_and_pagination() -> anyhow::Result<()> {
    let Some(state) = common::test_state().await? else {
        return Ok(());
    };

    let admin_id =
        common::create_user(&state, &common::unique_handle("admin"), "admin", true).await?;
    let keyword = format!("Catalog-{}", Uuid::new_v4());
    for n in 0..3 {
        common::seed_product(&state, admin_id, &format!("{keyword} item {n}"), 100.0, 10).await?;
    }

    let page = product_service::list_products(
        &state,
        ProductListQuery {
            page: None,
            keyword: Some(keyword.clone()),
        },
    )
    .await?;
    assert_eq!(page.page, 1);
    assert!(page.pages >= 1);
    assert_eq!(page.products.len(), 3);
    assert!(page.products.iter().all(|p| p.name.contains(&keyword)));

    // The wire shape always carries exactly these three keys.
    let value = serde_json::to_value(&page)?;
    let object = value.as_object().expect("object body");
    assert!(object.contains_key("products"));
    assert!(object.contains_key("page"));
    assert!(object.contains_key("pages"));

    // A keyword matching nothing still answers the full shape.
    let empty = product_service::list_products(
        &state,
        ProductListQuery {
            page: None,
            keyword: Some(format!("no-such-{}", Uuid::new_v4())),
        },
    )
    .await?;
    assert!(empty.products.is_empty());
    assert_eq!(empty.page, 1);
    assert_eq!(empty.pages, 1);

    Ok(())
}

#[tokio::test]
async fn get_update_and_double_delete() -> anyhow::Result<()> {
    let Some(state) = common::test_state().await? else {
        return Ok(());
    };

    let admin_id =
        common::create_user(&state, &common::unique_handle("admin"), "admin", true).await?;
    let user_id =
        common::create_user(&state, &common::unique_handle("user"), "pass", false).await?;
    let admin = common::auth(admin_id, true);

    let product = product_service::create_sample_product(&state, &admin).await?;

    let updated = product_service::update_product(
        &state,
        &admin,
        product.id,
        UpdateProductRequest {
            name: Some("Edited Name".into()),
            brand: None,
            category: None,
            description: Some("Edited description".into()),
            price: Some(49.99),
            count_in_stock: Some(12),
            image: None,
        },
    )
    .await?;
    assert_eq!(updated.name, "Edited Name");
    assert_eq!(updated.brand, "Sample brand");
    assert_eq!(updated.price, 49.99);
    assert_eq!(updated.count_in_stock, 12);

    let fetched = product_service::get_product(&state, product.id).await?;
    assert_eq!(fetched.name, "Edited Name");
    assert_eq!(fetched.description, "Edited description");

    // Non-admin deletion is refused and leaves the record in place.
    let err = product_service::delete_product(&state, &common::auth(user_id, false), product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert!(product_service::get_product(&state, product.id).await.is_ok());

    product_service::delete_product(&state, &admin, product.id).await?;

    let err = product_service::get_product(&state, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Second delete reports NotFound as well.
    let err = product_service::delete_product(&state, &admin, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn deleting_a_product_keeps_order_item_snapshots() -> anyhow::Result<()> {
    let Some(state) = common::test_state().await? else {
        return Ok(());
    };

    let admin_id =
        common::create_user(&state, &common::unique_handle("admin"), "admin", true).await?;
    let owner_id =
        common::create_user(&state, &common::unique_handle("owner"), "pass", false).await?;
    let product_id = common::seed_product(&state, admin_id, "Snapshot Widget", 75.0, 4).await?;

    let owner = common::auth(owner_id, false);
    let detail = order_service::create_order(
        &state,
        &owner,
        CreateOrderRequest {
            payment_method: "PayPal".into(),
            tax_price: 0.0,
            shipping_price: 0.0,
            total_price: 75.0,
            order_items: vec![OrderItemInput {
                product: product_id,
                name: "Snapshot Widget".into(),
                qty: 1,
                price: 75.0,
                image: "/images/test.jpg".into(),
            }],
            shipping_address: ShippingAddressInput {
                address: "Kurmangazy 15".into(),
                city: "Almaty".into(),
                postal_code: "050081".into(),
                country: "Kazakhstan".into(),
            },
        },
    )
    .await?;

    product_service::delete_product(&state, &common::auth(admin_id, true), product_id).await?;

    // The snapshot survives with a detached product reference.
    let refreshed = order_service::get_order(&state, &owner, detail.order.id).await?;
    assert_eq!(refreshed.order_items.len(), 1);
    assert_eq!(refreshed.order_items[0].product_id, None);
    assert_eq!(refreshed.order_items[0].name, "Snapshot Widget");
    assert_eq!(refreshed.order_items[0].price, 75.0);

    Ok(())
}
