use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::UserProfile;
use crate::error::{DomainError, RepoError};
use crate::ports::ProfileRepository;

const MAX_FIELD_LEN: usize = 50;

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// The user's profile, created empty on first use (signup).
    pub async fn ensure(&self, user_id: Uuid) -> Result<UserProfile, DomainError> {
        if let Some(profile) = self.profiles.find_by_id(user_id).await? {
            return Ok(profile);
        }

        match self.profiles.insert(UserProfile::new(user_id)).await {
            Ok(profile) => {
                tracing::info!(user_id = %user_id, "Profile created");
                Ok(profile)
            }
            // Lost a race with a concurrent first request.
            Err(RepoError::Duplicate(_)) => self
                .profiles
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("profile", user_id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        org: String,
        telephone: String,
    ) -> Result<UserProfile, DomainError> {
        let org = org.trim();
        let telephone = telephone.trim();
        for (field, value) in [("org", org), ("telephone", telephone)] {
            if value.chars().count() > MAX_FIELD_LEN {
                return Err(DomainError::Validation(format!(
                    "{field} must be at most {MAX_FIELD_LEN} characters"
                )));
            }
        }

        let mut profile = self.ensure(user_id).await?;
        profile.org = org.to_string();
        profile.telephone = telephone.to_string();
        profile.updated_time = Utc::now();

        Ok(self.profiles.update(profile).await?)
    }
}
