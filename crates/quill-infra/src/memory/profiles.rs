use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::UserProfile;
use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

use super::SharedTables;

pub struct InMemoryProfileRepository {
    tables: SharedTables,
}

impl InMemoryProfileRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<UserProfile, Uuid> for InMemoryProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.user_id) {
            return Err(RepoError::Duplicate("user profile".to_string()));
        }
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: UserProfile) -> Result<UserProfile, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.profiles.get_mut(&profile.user_id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(profile)
            }
            None => Err(RepoError::NotFound),
        }
    }
}
