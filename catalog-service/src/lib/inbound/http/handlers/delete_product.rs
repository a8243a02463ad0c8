use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::ProductId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let product_id = ProductId::from_string(&id).map_err(ProductError::from)?;
    tracing::debug!(
        identity_id = %caller.identity_id,
        username = %caller.username,
        product_id = %product_id,
        "Delete product requested"
    );

    state
        .product_service
        .delete_product(product_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
