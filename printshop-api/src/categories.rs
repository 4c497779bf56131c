use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use printshop_catalog::{slugify, Category};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/categories", get(list_categories).post(create_category))
        .route("/v1/categories/slug", get(preview_slug))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    /// Overrides the slug derived from the name
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlugParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SlugResponse {
    pub name: String,
    pub slug: String,
}

/// GET /v1/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list_categories().await?))
}

/// POST /v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    req.validate()?;

    let category = Category::new(req.name, req.slug, req.description)?;
    let category = state.categories.create_category(category).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /v1/categories/slug?name=
/// Slug the form would generate for a name, as it is typed
pub async fn preview_slug(Query(params): Query<SlugParams>) -> Json<SlugResponse> {
    let slug = slugify(&params.name);
    Json(SlugResponse {
        name: params.name,
        slug,
    })
}
