use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::{Category, CategoryFilter};
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::types::Paging;

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category with id {} not found", id))
}

/// Service for category operations.
///
/// Stamps ids, timestamps and the initial status, and hides soft-deleted
/// categories from every read and mutation.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService").finish_non_exhaustive()
    }
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// Fetch a category that exists and is not soft-deleted
    async fn find_visible(&self, id: Uuid) -> Result<Category> {
        match self.repository.get(id).await? {
            Some(category) if !category.is_deleted() => Ok(category),
            _ => {
                tracing::debug!("Category {} not found or deleted", id);
                Err(not_found(id))
            }
        }
    }

    /// Create a new category and return its id
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let category = dto.into_category(id, Utc::now())?;

        if !self.repository.insert(&category).await? {
            return Err(AppError::OperationFailed(
                "Category creation failed".to_string(),
            ));
        }

        tracing::info!("Category {} created", id);
        Ok(id)
    }

    /// Get category by ID
    pub async fn get_detail(&self, id: Uuid) -> Result<Category> {
        self.find_visible(id).await
    }

    /// Apply a partial update and return the refreshed category
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<Category> {
        self.find_visible(id).await?;

        let changes = dto.into_changes(Utc::now())?;
        if !self.repository.update(id, &changes).await? {
            return Err(AppError::OperationFailed(
                "Category update failed".to_string(),
            ));
        }

        // A concurrent hard delete can remove the row between the two calls
        self.repository.get(id).await?.ok_or_else(|| not_found(id))
    }

    /// Delete a category.
    ///
    /// Soft delete requires a visible category. Hard delete only requires the
    /// row to exist, so already soft-deleted rows can still be purged.
    pub async fn delete(&self, id: Uuid, hard: bool) -> Result<()> {
        if hard {
            if self.repository.get(id).await?.is_none() {
                return Err(not_found(id));
            }
        } else {
            self.find_visible(id).await?;
        }

        if !self.repository.delete(id, hard, Utc::now()).await? {
            return Err(AppError::OperationFailed(
                "Category deletion failed".to_string(),
            ));
        }

        tracing::info!("Category {} deleted (hard={})", id, hard);
        Ok(())
    }

    /// List non-deleted categories matching `filter`; fills `paging.total`
    pub async fn list(&self, filter: &CategoryFilter, paging: &mut Paging) -> Result<Vec<Category>> {
        self.repository.list(filter, paging).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryStatus;
    use crate::features::categories::repositories::InMemoryCategoryRepository;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn service() -> (CategoryService, Arc<InMemoryCategoryRepository>) {
        let repository = Arc::new(InMemoryCategoryRepository::new());
        (CategoryService::new(repository.clone()), repository)
    }

    fn create_dto(name: &str) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            image: None,
            position: None,
            description: None,
            parent_id: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_detail() {
        let (service, _) = service();
        let name: String = Word().fake();

        let id = service.create(create_dto(&name)).await.unwrap();
        let category = service.get_detail(id).await.unwrap();

        assert_eq!(category.id, id);
        assert_eq!(category.name, name);
        assert_eq!(category.status, CategoryStatus::Active);
        assert_eq!(category.created_at, category.updated_at);
    }

    #[tokio::test]
    async fn test_create_returns_fresh_ids() {
        let (service, _) = service();

        let first = service.create(create_dto("Books")).await.unwrap();
        let second = service.create(create_dto("Books")).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_ignores_requested_status() {
        let (service, _) = service();
        let mut dto = create_dto("Garden");
        dto.status = Some(CategoryStatus::Inactive);

        let id = service.create(dto).await.unwrap();
        assert_eq!(
            service.get_detail(id).await.unwrap().status,
            CategoryStatus::Active
        );
    }

    #[tokio::test]
    async fn test_create_with_malformed_parent_skips_repository() {
        let (service, repository) = service();
        let mut dto = create_dto("Garden");
        dto.parent_id = Some("nope".to_string());

        let result = service.create(dto).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (service, _) = service();
        let id = Uuid::now_v7();

        assert!(matches!(
            service.get_detail(id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update(id, UpdateCategoryDto::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(id, false).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(id, true).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let (service, _) = service();
        let mut dto = create_dto("Toys");
        dto.description = Some("For kids".to_string());
        let id = service.create(dto).await.unwrap();
        let before = service.get_detail(id).await.unwrap();

        let updated = service
            .update(
                id,
                UpdateCategoryDto {
                    status: Some(CategoryStatus::Inactive),
                    position: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Toys");
        assert_eq!(updated.description.as_deref(), Some("For kids"));
        assert_eq!(updated.position, Some(3));
        assert_eq!(updated.status, CategoryStatus::Inactive);
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_category() {
        let (service, repository) = service();
        let id = service.create(create_dto("Music")).await.unwrap();

        service.delete(id, false).await.unwrap();

        // Row still exists physically
        assert_eq!(
            repository.row(id).map(|c| c.status),
            Some(CategoryStatus::Deleted)
        );
        assert!(matches!(
            service.get_detail(id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update(id, UpdateCategoryDto::default()).await,
            Err(AppError::NotFound(_))
        ));

        let mut paging = Paging::default();
        let listed = service
            .list(&CategoryFilter::default(), &mut paging)
            .await
            .unwrap();
        assert!(listed.iter().all(|c| c.id != id));
        assert_eq!(paging.total, 0);
    }

    #[tokio::test]
    async fn test_second_soft_delete_is_not_found() {
        let (service, _) = service();
        let id = service.create(create_dto("Sports")).await.unwrap();

        service.delete(id, false).await.unwrap();
        assert!(matches!(
            service.delete(id, false).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_hard_delete_purges_soft_deleted_row() {
        let (service, repository) = service();
        let id = service.create(create_dto("Outdoor")).await.unwrap();

        service.delete(id, false).await.unwrap();
        service.delete(id, true).await.unwrap();

        assert!(repository.row(id).is_none());
        assert!(matches!(
            service.delete(id, true).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_paginates_and_counts() {
        let (service, _) = service();
        for i in 0..15 {
            service
                .create(create_dto(&format!("Category {}", i)))
                .await
                .unwrap();
        }

        let mut paging = Paging::new(1, 10);
        let first = service
            .list(&CategoryFilter::default(), &mut paging)
            .await
            .unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(paging.total, 15);

        let mut paging = Paging::new(2, 10);
        let second = service
            .list(&CategoryFilter::default(), &mut paging)
            .await
            .unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(paging.total, 15);

        // Ordered by id descending
        assert!(first.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_list_filters_by_equality() {
        let (service, _) = service();
        let parent = service.create(create_dto("Root")).await.unwrap();
        let mut child = create_dto("Child");
        child.parent_id = Some(parent.to_string());
        let child_id = service.create(child).await.unwrap();

        let filter = CategoryFilter {
            parent_id: Some(parent),
            ..Default::default()
        };
        let mut paging = Paging::default();
        let listed = service.list(&filter, &mut paging).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, child_id);
        assert_eq!(paging.total, 1);
    }

    #[tokio::test]
    async fn test_create_reports_failed_insert() {
        let (service, repository) = service();
        repository.reject_writes();

        assert!(matches!(
            service.create(create_dto("Books")).await,
            Err(AppError::OperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_untouched_rows() {
        let (service, repository) = service();
        let id = service.create(create_dto("Kitchen")).await.unwrap();
        repository.reject_writes();

        assert!(matches!(
            service
                .update(
                    id,
                    UpdateCategoryDto {
                        position: Some(2),
                        ..Default::default()
                    }
                )
                .await,
            Err(AppError::OperationFailed(_))
        ));
        assert!(matches!(
            service.delete(id, false).await,
            Err(AppError::OperationFailed(_))
        ));
        assert!(matches!(
            service.delete(id, true).await,
            Err(AppError::OperationFailed(_))
        ));

        // Guard passed, store untouched
        let row = repository.row(id).unwrap();
        assert_eq!(row.position, None);
        assert_eq!(row.status, CategoryStatus::Active);
    }

    #[tokio::test]
    async fn test_soft_delete_stamps_updated_at() {
        let (service, repository) = service();
        let id = service.create(create_dto("Garden")).await.unwrap();
        let created = repository.row(id).unwrap();

        let before = Utc::now();
        service.delete(id, false).await.unwrap();

        let deleted = repository.row(id).unwrap();
        assert!(deleted.updated_at >= before);
        assert!(deleted.updated_at >= created.updated_at);
        assert_eq!(deleted.created_at, created.created_at);
    }
}
