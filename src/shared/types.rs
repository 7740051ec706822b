use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Response envelope shared by every endpoint.
///
/// `paging` and `filter` are only present on list responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    pub errors: Option<Vec<String>>,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Window of a list query. `total` is filled in by the repository.
///
/// Request bounds are checked on the list query DTO; here `page` and `limit`
/// are only clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Paging {
    /// Page number (1-indexed)
    pub page: i64,

    /// Items per page
    pub limit: i64,

    /// Number of rows matching the filter, across all pages
    #[serde(default)]
    pub total: i64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Paging {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page,
            limit,
            total: 0,
        }
    }

    /// Calculate SQL OFFSET from page number, saturating at `i64::MAX`
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped limit (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            data,
            paging: None,
            filter: None,
            errors: None,
        }
    }

    pub fn paginated(
        data: T,
        message: Option<String>,
        paging: Paging,
        filter: serde_json::Value,
    ) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
            paging: Some(paging),
            filter: Some(filter),
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message,
            data: None,
            paging: None,
            filter: None,
            errors,
        }
    }
}
