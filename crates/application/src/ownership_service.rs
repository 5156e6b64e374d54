use std::sync::Arc;

use async_trait::async_trait;
use rolegate_core::{AppResult, UserId};
use uuid::Uuid;

use crate::rbac_ports::ResourceOwnerRepository;

/// Answers whether a user owns a resource.
#[async_trait]
pub trait OwnershipChecker: Send + Sync {
    /// Returns whether `user_id` is the recorded owner of `resource_id`.
    async fn is_owner(&self, resource_id: Uuid, user_id: UserId) -> AppResult<bool>;
}

/// Ownership resolver for one resource kind.
///
/// Missing resources and resources without an owner resolve to `false`.
#[derive(Clone)]
pub struct OwnershipService {
    repository: Arc<dyn ResourceOwnerRepository>,
}

impl OwnershipService {
    /// Creates a new ownership resolver.
    #[must_use]
    pub fn new(repository: Arc<dyn ResourceOwnerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl OwnershipChecker for OwnershipService {
    async fn is_owner(&self, resource_id: Uuid, user_id: UserId) -> AppResult<bool> {
        let owner = self.repository.find_owner(resource_id).await?;
        Ok(owner == Some(user_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rolegate_core::UserId;
    use uuid::Uuid;

    use crate::test_support::FakeRbacStore;

    use super::{OwnershipChecker, OwnershipService};

    #[tokio::test]
    async fn only_recorded_owner_matches() {
        let store = Arc::new(FakeRbacStore::default());
        let service = OwnershipService::new(store.clone());
        let owner = UserId::new();
        let place = Uuid::new_v4();
        store.set_owner(place, Some(owner)).await;

        assert!(matches!(service.is_owner(place, owner).await, Ok(true)));
        assert!(matches!(
            service.is_owner(place, UserId::new()).await,
            Ok(false)
        ));
    }

    #[tokio::test]
    async fn missing_resource_or_owner_is_not_an_error() {
        let store = Arc::new(FakeRbacStore::default());
        let service = OwnershipService::new(store.clone());
        let orphan = Uuid::new_v4();
        store.set_owner(orphan, None).await;

        assert!(matches!(
            service.is_owner(orphan, UserId::new()).await,
            Ok(false)
        ));
        assert!(matches!(
            service.is_owner(Uuid::new_v4(), UserId::new()).await,
            Ok(false)
        ));
    }
}
