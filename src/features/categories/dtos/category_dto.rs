use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryFilter, CategoryStatus,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::Paging;
use crate::shared::validation::{parse_identifier, validate_identifier};

/// `deleted` is only reachable through the delete endpoint
fn validate_mutable_status(status: &CategoryStatus) -> std::result::Result<(), ValidationError> {
    if *status == CategoryStatus::Deleted {
        return Err(ValidationError::new("status")
            .with_message("status must be 'active' or 'inactive'".into()));
    }
    Ok(())
}

fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>> {
    raw.map(|value| {
        parse_identifier(value)
            .ok_or_else(|| AppError::Validation("parent_id must be a valid id".to_string()))
    })
    .transpose()
}

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(
        url(message = "image must be a valid URL"),
        length(max = 100, message = "image must be at most 100 characters")
    )]
    pub image: Option<String>,

    pub position: Option<i32>,

    #[validate(length(max = 50, message = "description must be at most 50 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_identifier"))]
    pub parent_id: Option<String>,

    /// Accepted for compatibility; new categories always start `active`
    pub status: Option<CategoryStatus>,
}

impl CreateCategoryDto {
    /// Builds the full record with server-side id, timestamps and status
    pub fn into_category(self, id: Uuid, now: DateTime<Utc>) -> Result<Category> {
        Ok(Category {
            id,
            parent_id: parse_parent_id(self.parent_id.as_deref())?,
            name: self.name,
            image: self.image,
            position: self.position,
            description: self.description,
            status: CategoryStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

// Update request (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[validate(
        url(message = "image must be a valid URL"),
        length(max = 100, message = "image must be at most 100 characters")
    )]
    pub image: Option<String>,

    pub position: Option<i32>,

    #[validate(length(max = 50, message = "description must be at most 50 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_identifier"))]
    pub parent_id: Option<String>,

    #[validate(custom(function = "validate_mutable_status"))]
    pub status: Option<CategoryStatus>,
}

impl UpdateCategoryDto {
    pub fn into_changes(self, updated_at: DateTime<Utc>) -> Result<CategoryChanges> {
        Ok(CategoryChanges {
            parent_id: parse_parent_id(self.parent_id.as_deref())?,
            name: self.name,
            image: self.image,
            position: self.position,
            description: self.description,
            status: self.status,
            updated_at,
        })
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

// Query params for listing categories
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,

    /// Exact name match
    pub name: Option<String>,

    /// Exact position match
    pub position: Option<i32>,

    /// Parent category id
    #[validate(custom(function = "validate_identifier"))]
    pub parent_id: Option<String>,

    /// Status filter; deleted categories are never listed
    pub status: Option<CategoryStatus>,
}

impl ListCategoriesQuery {
    pub fn into_parts(self) -> Result<(CategoryFilter, Paging)> {
        let filter = CategoryFilter {
            parent_id: parse_parent_id(self.parent_id.as_deref())?,
            name: self.name,
            position: self.position,
            status: self.status,
        };
        Ok((filter, Paging::new(self.page, self.limit)))
    }
}

// Query params for deleting a category
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteCategoryQuery {
    /// Physically remove the row instead of marking it deleted
    #[serde(default)]
    pub hard: bool,
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub position: Option<i32>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            image: c.image,
            position: c.position,
            description: c.description,
            parent_id: c.parent_id,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
