//! Product catalog handlers of the product service (`/products`).

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use gatehouse_store::model::{NewProduct, UpdateProduct};
use gatehouse_store::query::ProductRepository;
use gatehouse_store::{StoreClient, StoreError};

use super::authentication::user_info;
use super::request::{CategoryPathParams, ProductPathParams, ProductRequest};
use super::response::ProductResponse;
use crate::authorize;
use crate::extract::{Caller, Json, Path, Permission, ValidateJson};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for product handlers.
const TRACING_TARGET: &str = "gatehouse_server::handler::products";

fn product_responses(products: Vec<gatehouse_store::model::Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from_model).collect()
}

/// Creates a product owned by the caller.
#[tracing::instrument(skip_all)]
async fn create_product(
    State(store): State<StoreClient>,
    caller: Caller,
    ValidateJson(request): ValidateJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    authorize!(caller, Permission::WriteProducts);

    let new_product = NewProduct {
        name: request.name,
        description: request.description,
        price: request.price,
        stock: request.stock,
        category: request.category,
        created_by: caller.audit_id(),
    };
    let product = store.create_product(new_product).await?;

    tracing::info!(
        target: TRACING_TARGET,
        product_id = product.id,
        created_by = %product.created_by,
        "product created"
    );

    Ok((StatusCode::CREATED, Json(ProductResponse::from_model(product))))
}

async fn list_products(
    State(store): State<StoreClient>,
    caller: Caller,
) -> Result<Json<Vec<ProductResponse>>> {
    authorize!(caller, Permission::ReadProducts);

    let products = store.list_products().await?;
    Ok(Json(product_responses(products)))
}

async fn get_product(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<ProductPathParams>,
) -> Result<Json<ProductResponse>> {
    authorize!(caller, Permission::ReadProducts);

    let product = store
        .find_product_by_id(path_params.id)
        .await?
        .ok_or_else(|| StoreError::not_found("product", path_params.id))?;

    Ok(Json(ProductResponse::from_model(product)))
}

async fn list_products_by_category(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<CategoryPathParams>,
) -> Result<Json<Vec<ProductResponse>>> {
    authorize!(caller, Permission::ReadProducts);

    let products = store
        .list_products_by_category(&path_params.category)
        .await?;
    Ok(Json(product_responses(products)))
}

/// Replaces every mutable field of a product.
#[tracing::instrument(skip_all)]
async fn update_product(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<ProductPathParams>,
    ValidateJson(request): ValidateJson<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    authorize!(caller, Permission::WriteProducts);

    let updates = UpdateProduct {
        name: request.name,
        description: request.description,
        price: request.price,
        stock: request.stock,
        category: request.category,
        updated_by: caller.audit_id(),
    };
    let product = store.update_product(path_params.id, updates).await?;

    tracing::info!(
        target: TRACING_TARGET,
        product_id = product.id,
        updated_by = %product.updated_by,
        "product updated"
    );

    Ok(Json(ProductResponse::from_model(product)))
}

#[tracing::instrument(skip_all)]
async fn delete_product(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<ProductPathParams>,
) -> Result<StatusCode> {
    authorize!(caller, Permission::DeleteProducts);

    store.delete_product(path_params.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        product_id = path_params.id,
        deleted_by = %caller.audit_id(),
        "product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn health() -> &'static str {
    "Product Service is running"
}

/// Returns a [`Router`] with the product routes that require a bearer token.
///
/// [`Router`]: axum::routing::Router
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/user-info", get(user_info))
        .route(
            "/products/category/{category}",
            get(list_products_by_category),
        )
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Returns a [`Router`] with the public product routes.
///
/// [`Router`]: axum::routing::Router
pub fn public_routes() -> Router<ServiceState> {
    Router::new().route("/products/health", get(health))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde_json::json;

    use super::*;
    use crate::extract::{X_USER_PERMISSIONS, X_USER_ROLES};
    use crate::handler::test::{create_test_server, issue_token};
    use crate::service::ServiceKind;

    fn laptop() -> serde_json::Value {
        json!({
            "name": "Laptop",
            "description": "14 inch",
            "price": "999.99",
            "stock": 5,
            "category": "electronics",
        })
    }

    #[tokio::test]
    async fn requires_bearer_token() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Product).await?;

        let response = server.get("/products").await;
        response.assert_status_unauthorized();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Missing or invalid Authorization header");

        let response = server.get("/products").authorization_bearer("not-a-jwt").await;
        response.assert_status_unauthorized();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Invalid JWT token");
        Ok(())
    }

    #[tokio::test]
    async fn forwarded_headers_do_not_replace_the_token() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Product).await?;

        server
            .get("/products")
            .add_header(X_USER_PERMISSIONS, "READ_PRODUCTS")
            .add_header(X_USER_ROLES, "ROLE_ADMIN")
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn public_routes_need_no_token() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Product).await?;

        server
            .get("/products/health")
            .await
            .assert_text("Product Service is running");
        server.get("/actuator/health").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn numeric_price_is_stored_exactly() -> anyhow::Result<()> {
        let (server, state) = create_test_server(ServiceKind::Product).await?;
        let token = issue_token(&state, "editor@example.com", &[Permission::WriteProducts]).await?;

        let response = server
            .post("/products")
            .authorization_bearer(&token)
            .json(&json!({ "name": "Laptop", "price": 999.99, "stock": 5 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["price"], "999.99");
        Ok(())
    }

    #[tokio::test]
    async fn crud_with_permissions() -> anyhow::Result<()> {
        let (server, state) = create_test_server(ServiceKind::Product).await?;
        let token = issue_token(
            &state,
            "editor@example.com",
            &[
                Permission::ReadProducts,
                Permission::WriteProducts,
                Permission::DeleteProducts,
            ],
        )
        .await?;

        let response = server
            .post("/products")
            .authorization_bearer(&token)
            .json(&laptop())
            .await;
        response.assert_status(StatusCode::CREATED);
        let created = response.json::<ProductResponse>();
        assert_eq!(created.price, BigDecimal::from_str("999.99")?);
        assert_eq!(created.created_by, "1");

        let response = server
            .get("/products/category/electronics")
            .authorization_bearer(&token)
            .await;
        assert_eq!(response.json::<Vec<ProductResponse>>().len(), 1);

        let mut replacement = laptop();
        replacement["stock"] = json!(0);
        replacement["category"] = json!(null);
        let response = server
            .put(&format!("/products/{}", created.id))
            .authorization_bearer(&token)
            .json(&replacement)
            .await;
        response.assert_status_ok();
        let updated = response.json::<ProductResponse>();
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.category, None);

        server
            .delete(&format!("/products/{}", created.id))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server
            .get(&format!("/products/{}", created.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_not_found();
        let error: serde_json::Value = response.json();
        assert_eq!(
            error["message"],
            format!("Product not found with id: {}", created.id)
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() -> anyhow::Result<()> {
        let (server, state) = create_test_server(ServiceKind::Product).await?;
        let token = issue_token(&state, "viewer@example.com", &[Permission::ReadProducts]).await?;

        server
            .get("/products")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let response = server
            .delete("/products/1")
            .authorization_bearer(&token)
            .await;
        response.assert_status_forbidden();
        let error: serde_json::Value = response.json();
        assert_eq!(
            error["message"],
            "Access denied: User 'viewer@example.com' does not have permission 'DELETE_PRODUCTS'"
        );

        let token = issue_token(&state, "nobody@example.com", &[]).await?;
        let response = server.get("/products").authorization_bearer(&token).await;
        response.assert_status_forbidden();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Access denied: No permissions found");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_product_is_rejected() -> anyhow::Result<()> {
        let (server, state) = create_test_server(ServiceKind::Product).await?;
        let token = issue_token(&state, "editor@example.com", &[Permission::WriteProducts]).await?;

        let mut product = laptop();
        product["price"] = json!("0");
        let response = server
            .post("/products")
            .authorization_bearer(&token)
            .json(&product)
            .await;
        response.assert_status_bad_request();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Price must be greater than 0");

        let mut product = laptop();
        product["stock"] = json!(-1);
        server
            .post("/products")
            .authorization_bearer(&token)
            .json(&product)
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn user_info_describes_the_principal() -> anyhow::Result<()> {
        let (server, state) = create_test_server(ServiceKind::Product).await?;
        let token = issue_token(&state, "viewer@example.com", &[Permission::ReadProducts]).await?;

        let response = server.get("/products/user-info").authorization_bearer(&token).await;
        response.assert_text(
            "User Info - ID: 1, Email: viewer@example.com, Name: Test User, \
             Roles: ROLE_TEST_viewer@example.com, Permissions: READ_PRODUCTS",
        );
        Ok(())
    }
}
