//! Liveness endpoint shared by both services.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use super::response::HealthStatus;
use crate::extract::Json;
use crate::service::{ServiceConfig, ServiceState};

/// Reports the service as up while the process serves requests.
async fn health_status(State(service_config): State<ServiceConfig>) -> Json<HealthStatus> {
    Json(HealthStatus::up(service_config.service.to_string()))
}

/// Returns a [`Router`] with the health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/actuator/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_router};
    use crate::service::ServiceKind;

    #[tokio::test]
    async fn health_names_the_service() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server.get("/actuator/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "UP", "service": "auth" }));

        let (server, _) = create_test_server(ServiceKind::Product).await?;
        let response = server.get("/actuator/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "UP", "service": "product" }));
        Ok(())
    }
}
