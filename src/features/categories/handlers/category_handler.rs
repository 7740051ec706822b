use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, DeleteCategoryQuery, ListCategoriesQuery,
    UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::parse_identifier;

/// Path ids must be present and well-formed before the service is asked
fn parse_path_id(raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("id is required".to_string()));
    }
    parse_identifier(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid id '{}'", raw)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<String>),
        (status = 400, description = "Validation error or creation failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<String>>)> {
    dto.validate()?;

    let id = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(id.to_string()),
            Some("Category created successfully".to_string()),
        )),
    ))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Missing or malformed id"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let id = parse_path_id(&id)?;

    let category = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(
        Some(category.into()),
        Some("Category retrieved successfully".to_string()),
    )))
}

/// List categories with pagination and equality filters
#[utoipa::path(
    get,
    path = "/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 400, description = "Invalid paging or filter")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    query.validate()?;

    let (filter, mut paging) = query.into_parts()?;
    let categories = service.list(&filter, &mut paging).await?;

    let filter = serde_json::to_value(&filter)
        .map_err(|e| AppError::Internal(format!("Failed to serialize filter: {}", e)))?;

    Ok(Json(ApiResponse::paginated(
        categories.into_iter().map(CategoryResponseDto::from).collect(),
        Some("Categories retrieved successfully".to_string()),
        paging,
        filter,
    )))
}

/// Partially update a category
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error or update failed"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let id = parse_path_id(&id)?;
    dto.validate()?;

    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(category.into()),
        Some("Category updated successfully".to_string()),
    )))
}

/// Delete a category (soft delete unless `hard=true`)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        DeleteCategoryQuery
    ),
    responses(
        (status = 200, description = "Category deleted successfully", body = ApiResponse<bool>),
        (status = 400, description = "Missing or malformed id, or deletion failed"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<DeleteCategoryQuery>,
) -> Result<Json<ApiResponse<bool>>> {
    let id = parse_path_id(&id)?;

    service.delete(id, query.hard).await?;
    Ok(Json(ApiResponse::success(
        Some(true),
        Some("Category deleted successfully".to_string()),
    )))
}
