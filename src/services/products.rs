//! Product catalog service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::{rejected, ApiClient, ApiError};
use crate::domain::aggregates::product::ProductSnapshot;
use crate::domain::value_objects::Money;

/// A product as the backend serializes it; prices come over the wire as
/// bare numbers.
#[derive(Clone, Debug, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<ProductDto> for ProductSnapshot {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            price: Money::cop(dto.price),
            stock: dto.stock,
            image_url: dto.image_url,
        }
    }
}

#[derive(Deserialize)]
struct ProductsResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Vec<ProductDto>,
}

#[derive(Deserialize)]
struct ProductResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    product: Option<ProductDto>,
}

pub struct ProductsService {
    client: Arc<ApiClient>,
}

impl ProductsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductSnapshot>, ApiError> {
        let resp: ProductsResponse = self.client.get("/api/products").await?;
        if resp.success {
            Ok(resp.products.into_iter().map(ProductSnapshot::from).collect())
        } else {
            Err(rejected(resp.message, "failed to load products"))
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<ProductSnapshot, ApiError> {
        let resp: ProductResponse = self.client.get(&format!("/api/products/{id}")).await?;
        match (resp.success, resp.product) {
            (true, Some(product)) => Ok(product.into()),
            _ => Err(rejected(resp.message, "product not found")),
        }
    }
}
