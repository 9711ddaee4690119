use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenPair},
        orders::{CreateOrderRequest, OrderDetail, OrderItemInput, ShippingAddressInput},
        products::{ProductPage, UpdateProductRequest},
    },
    models::{Order, OrderItem, Product, ShippingAddress, UserSummary},
    routes::{health, orders, products, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::login,
        users::register,
        users::refresh,
        users::profile,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::list_all_orders,
        orders::add_order,
        orders::list_my_orders,
        orders::get_order,
        orders::pay_order,
        orders::deliver_order,
    ),
    components(
        schemas(
            UserSummary,
            Product,
            Order,
            OrderItem,
            ShippingAddress,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RefreshRequest,
            TokenPair,
            CreateOrderRequest,
            OrderItemInput,
            ShippingAddressInput,
            OrderDetail,
            ProductPage,
            UpdateProductRequest,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Login, registration and profile"),
        (name = "Products", description = "Product catalog"),
        (name = "Orders", description = "Order lifecycle"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
