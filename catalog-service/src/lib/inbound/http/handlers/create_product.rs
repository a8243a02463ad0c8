use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde_json::value::RawValue;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductDescription;
use crate::domain::product::models::ProductName;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let Json(body) = payload?;
    tracing::debug!(identity_id = %caller.identity_id, "Create product requested");

    state
        .product_service
        .create_product(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

/// HTTP request body for creating a product (raw JSON)
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    name: String,
    description: String,
    /// JSON number kept as its literal text
    price: Box<RawValue>,
}

impl CreateProductRequest {
    fn try_into_command(self) -> Result<CreateProductCommand, ProductError> {
        Ok(CreateProductCommand {
            name: ProductName::new(self.name)?,
            description: ProductDescription::new(self.description)?,
            price: Price::parse(self.price.get())?,
        })
    }
}

/// Product as returned by every catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductData {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.0,
            name: product.name.as_str().to_string(),
            description: product.description.as_str().to_string(),
            price: product.price,
            created_at: product.created_at,
        }
    }
}

/// Write a price as a JSON number with exactly four fractional digits.
pub fn serialize_price<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
    RawValue::from_string(price.to_string())
        .map_err(serde::ser::Error::custom)?
        .serialize(serializer)
}
