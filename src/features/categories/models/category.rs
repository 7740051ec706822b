use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Category status enum matching database enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "category_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
    /// Soft-deleted. Terminal: hidden from every read and mutation.
    Deleted,
}

impl std::fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryStatus::Active => write!(f, "active"),
            CategoryStatus::Inactive => write!(f, "inactive"),
            CategoryStatus::Deleted => write!(f, "deleted"),
        }
    }
}

/// Database model for category
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Category {
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

impl Category {
    pub fn is_deleted(&self) -> bool {
        self.status == CategoryStatus::Deleted
    }
}

/// Partial update applied by the repository. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub position: Option<i32>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub status: Option<CategoryStatus>,
    pub updated_at: DateTime<Utc>,
}

/// Equality filter for list queries. `None` fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
}
