use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use printshop_catalog::{
    DimensionalPricing, Product, ProductFilter, ProductStatus, ProductType, ProductVariation, SizedPrice,
    StockLevel, StockMovement, StockMovementKind,
};
use printshop_core::{CoreError, CoreResult};
use printshop_order::{product_statistics, ProductStatistics};
use printshop_shared::models::events::{DomainEvent, StockMovedEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::params::filter_value;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products).post(create_product))
        .route(
            "/v1/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/v1/products/{id}/variations",
            get(list_variations).post(add_variation),
        )
        .route(
            "/v1/products/{id}/variations/{variation_id}",
            put(update_variation).delete(remove_variation),
        )
        .route(
            "/v1/products/{id}/stock",
            post(move_stock).get(list_stock_movements),
        )
        .route("/v1/products/{id}/price", get(calculate_price))
        .route("/v1/products/{id}/statistics", get(get_statistics))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "SKU cannot be empty"))]
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub product_type: ProductType,
    pub price: Decimal,
    #[serde(default)]
    pub cost: Decimal,
    pub stock: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: i64,
    pub supplier_id: Option<String>,
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub images: Vec<String>,
    pub pricing: Option<DimensionalPricing>,
    pub notes: Option<String>,
    /// Only read on create; edit variations through their own routes
    #[serde(default)]
    #[validate(nested)]
    pub variations: Vec<VariationRequest>,
}

impl ProductRequest {
    fn apply(self, product: &mut Product) {
        product.name = self.name.trim().to_string();
        product.sku = self.sku.trim().to_string();
        product.description = self.description;
        product.category_id = self.category_id;
        product.product_type = self.product_type;
        product.price = self.price;
        product.cost = self.cost;
        product.stock = self.stock;
        product.min_stock = self.min_stock;
        product.supplier_id = self.supplier_id;
        if let Some(status) = self.status {
            product.status = status;
        }
        product.images = self.images;
        if let Some(pricing) = self.pricing {
            product.pricing = pricing;
        }
        product.notes = self.notes;
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VariationRequest {
    #[validate(length(min = 1, message = "Variation name cannot be empty"))]
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub cost: Decimal,
    pub sku: Option<String>,
    pub stock: Option<i64>,
}

impl From<VariationRequest> for ProductVariation {
    fn from(req: VariationRequest) -> Self {
        let mut variation = ProductVariation::new(req.name.trim(), req.price, req.cost);
        variation.sku = req.sku;
        variation.stock = req.stock;
        variation
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub stock: Option<String>,
    pub category_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StockMovementRequest {
    pub kind: StockMovementKind,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub margin: Decimal,
    pub stock_level: StockLevel,
}

impl ProductResponse {
    fn new(product: Product, low_stock_fallback: i64) -> Self {
        Self {
            margin: product.margin().round_dp(2),
            stock_level: product.stock_level(low_stock_fallback),
            product,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariationResponse {
    #[serde(flatten)]
    pub variation: ProductVariation,
    pub margin: Decimal,
}

impl From<ProductVariation> for VariationResponse {
    fn from(variation: ProductVariation) -> Self {
        Self {
            margin: variation.margin().round_dp(2),
            variation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockMovementResponse {
    pub product: ProductResponse,
    pub movement: StockMovement,
}

#[derive(Debug, Serialize)]
pub struct ProductStatisticsResponse {
    pub product_id: Uuid,
    pub name: String,
    pub margin: Decimal,
    pub stock: Option<i64>,
    #[serde(flatten)]
    pub sales: ProductStatistics,
}

// ============================================================================
// Handlers
// ============================================================================

async fn load_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", id))?;
    Ok(product)
}

async fn check_category(state: &AppState, category_id: Option<Uuid>) -> AppResult<()> {
    if let Some(category_id) = category_id {
        if state.categories.get_category(category_id).await?.is_none() {
            return Err(AppError::ValidationError(format!("Unknown category: {}", category_id)));
        }
    }
    Ok(())
}

/// GET /v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let filter = ProductFilter {
        product_type: filter_value("type", params.product_type.as_deref())?,
        stock: filter_value("stock", params.stock.as_deref())?,
        category_id: filter_value("category_id", params.category_id.as_deref())?,
        search: params.search,
    };
    let fallback = state.business_rules.low_stock_fallback;

    let products = state
        .products
        .list_products()
        .await?
        .into_iter()
        .filter(|p| filter.matches(p, fallback))
        .map(|p| ProductResponse::new(p, fallback))
        .collect();

    Ok(Json(products))
}

/// POST /v1/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(mut req): Json<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    req.validate()?;
    check_category(&state, req.category_id).await?;

    let variations = std::mem::take(&mut req.variations);
    let mut product = Product::new("", "", req.product_type, req.price, req.cost);
    req.apply(&mut product);
    for variation in variations {
        product.add_variation(variation.into())?;
    }

    let product = state.products.create_product(product).await?;
    let fallback = state.business_rules.low_stock_fallback;
    Ok((StatusCode::CREATED, Json(ProductResponse::new(product, fallback))))
}

/// GET /v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductResponse>> {
    let product = load_product(&state, id).await?;
    Ok(Json(ProductResponse::new(product, state.business_rules.low_stock_fallback)))
}

/// PUT /v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    req.validate()?;
    check_category(&state, req.category_id).await?;

    let product = state
        .products
        .update_product(id, Box::new(move |product: &mut Product| -> CoreResult<()> {
            req.apply(product);
            Ok(())
        }))
        .await?;

    Ok(Json(ProductResponse::new(product, state.business_rules.low_stock_fallback)))
}

/// DELETE /v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/products/{id}/variations
pub async fn list_variations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<VariationResponse>>> {
    let product = load_product(&state, id).await?;
    Ok(Json(product.variations.into_iter().map(VariationResponse::from).collect()))
}

/// POST /v1/products/{id}/variations
pub async fn add_variation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VariationRequest>,
) -> AppResult<(StatusCode, Json<VariationResponse>)> {
    req.validate()?;
    let variation: ProductVariation = req.into();
    let added = variation.clone();

    state
        .products
        .update_product(id, Box::new(move |product: &mut Product| -> CoreResult<()> {
            product.add_variation(variation)?;
            Ok(())
        }))
        .await?;

    Ok((StatusCode::CREATED, Json(added.into())))
}

/// PUT /v1/products/{id}/variations/{variation_id}
pub async fn update_variation(
    State(state): State<AppState>,
    Path((id, variation_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<VariationRequest>,
) -> AppResult<Json<VariationResponse>> {
    req.validate()?;
    let update: ProductVariation = req.into();

    let product = state
        .products
        .update_product(id, Box::new(move |product: &mut Product| -> CoreResult<()> {
            product.update_variation(&variation_id, update)?;
            Ok(())
        }))
        .await?;

    let variation = product
        .variations
        .into_iter()
        .find(|v| v.id == variation_id)
        .ok_or_else(|| CoreError::not_found("Variation", variation_id))?;
    Ok(Json(variation.into()))
}

/// DELETE /v1/products/{id}/variations/{variation_id}
pub async fn remove_variation(
    State(state): State<AppState>,
    Path((id, variation_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state
        .products
        .update_product(id, Box::new(move |product: &mut Product| -> CoreResult<()> {
            product.remove_variation(&variation_id)?;
            Ok(())
        }))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/products/{id}/stock
pub async fn move_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StockMovementRequest>,
) -> AppResult<Json<StockMovementResponse>> {
    req.validate()?;

    let (product, movement) = state
        .products
        .move_stock(id, req.kind, req.quantity, req.reason)
        .await?;

    state.events.publish(DomainEvent::StockMoved(StockMovedEvent {
        product_id: product.id,
        delta: movement.delta(),
        stock: movement.stock_after,
        timestamp: Utc::now().timestamp(),
    }));

    Ok(Json(StockMovementResponse {
        product: ProductResponse::new(product, state.business_rules.low_stock_fallback),
        movement,
    }))
}

/// GET /v1/products/{id}/stock
/// Movement history, newest first
pub async fn list_stock_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    load_product(&state, id).await?;
    Ok(Json(state.products.list_stock_movements(id).await?))
}

/// GET /v1/products/{id}/price?width=&height=
/// Missing dimensions count as 1
pub async fn calculate_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PriceParams>,
) -> AppResult<Json<SizedPrice>> {
    let product = load_product(&state, id).await?;

    let width = params.width.unwrap_or(Decimal::ONE);
    let height = params.height.unwrap_or(Decimal::ONE);
    if width.is_sign_negative() || height.is_sign_negative() {
        return Err(AppError::ValidationError("Dimensions cannot be negative".to_string()));
    }

    Ok(Json(product.pricing.calculate(width, height)?))
}

/// GET /v1/products/{id}/statistics
/// Sales aggregated from order lines that reference this product, by id or
/// by name for rows typed in by hand
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductStatisticsResponse>> {
    let product = load_product(&state, id).await?;
    let orders = state.orders.list_orders().await?;

    let name = product.name.to_lowercase();
    let sales = product_statistics(&orders, |item| match item.product_id {
        Some(product_id) => product_id == id,
        None => item.product.trim().to_lowercase() == name,
    });

    Ok(Json(ProductStatisticsResponse {
        product_id: product.id,
        margin: product.margin().round_dp(2),
        stock: product.stock,
        name: product.name,
        sales,
    }))
}
