use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_product::ProductData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductFilter;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<ApiSuccess<Vec<ProductData>>, ApiError> {
    let Query(query) = query?;

    let products = state
        .product_service
        .list_products(query.try_into_filter()?)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        products.iter().map(ProductData::from).collect(),
    ))
}

/// Listing criteria from the query string; every parameter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    name: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
}

impl ListProductsQuery {
    fn try_into_filter(self) -> Result<ProductFilter, ProductError> {
        let min_price = self.min_price.as_deref().map(Price::parse).transpose()?;
        let max_price = self.max_price.as_deref().map(Price::parse).transpose()?;
        Ok(ProductFilter::new(self.name, min_price, max_price))
    }
}
