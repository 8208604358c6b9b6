use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;

/// Requires a verified bearer token before the request reaches the handler.
///
/// Requests without an `Authorization` header, with a non-Bearer scheme, or
/// with a token that fails verification are answered with a 401.
///
/// ```rust,ignore
/// use axum::middleware::from_fn_with_state;
/// use gatehouse_server::middleware::require_authentication;
///
/// let router = router.route_layer(from_fn_with_state(state.clone(), require_authentication));
/// ```
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
