use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductDescription;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// HTTP request body for replacing a product (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    /// JSON number kept as its literal text
    pub price: Box<RawValue>,
}

impl UpdateProductRequest {
    fn try_into_command(self) -> Result<UpdateProductCommand, ProductError> {
        Ok(UpdateProductCommand {
            name: ProductName::new(self.name)?,
            description: ProductDescription::new(self.description)?,
            price: Price::parse(self.price.get())?,
        })
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<ApiSuccess<()>, ApiError> {
    let product_id = ProductId::from_string(&id).map_err(ProductError::from)?;
    let Json(req) = payload?;
    let command = req.try_into_command()?;

    state
        .product_service
        .update_product(product_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
