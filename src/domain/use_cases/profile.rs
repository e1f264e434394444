use uuid::Uuid;
use validator::Validate;

use crate::entities::education::NewEducation;
use crate::entities::experience::NewExperience;
use crate::entities::profile::{Profile, ProfileInput, ProfileWithOwner};
use crate::errors::AppError;
use crate::interfaces::repositories::profile::ProfileRepository;

pub struct ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub profile_repo: R,
}

impl<R> ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub fn new(profile_repo: R) -> Self {
        ProfileHandler { profile_repo }
    }

    /// Create-or-update keyed by the owning user.
    ///
    /// Only fields present in the payload are written; everything else
    /// on an existing profile stays untouched. On the create path the
    /// candidate handle is checked first and a collision aborts the
    /// operation without inserting anything.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<Profile, AppError> {
        input.validate()?;
        let fields = input.prepare_fields();

        if self.profile_repo.find_by_user_id(&user_id).await?.is_some() {
            return self.profile_repo.update_fields(&user_id, &fields).await;
        }

        if self.profile_repo.find_by_handle(&fields.handle).await?.is_some() {
            tracing::warn!("Rejected profile creation: handle is taken");
            return Err(AppError::Conflict("Handle already exists".to_string()));
        }

        self.profile_repo.create(&user_id, &fields).await
    }

    /// Newest entries go to the front of the list.
    pub async fn add_experience(
        &self,
        user_id: Uuid,
        input: NewExperience,
    ) -> Result<Profile, AppError> {
        input.validate()?;
        let entry = input.prepare_for_insert();
        self.profile_repo.push_experience(&user_id, &entry).await
    }

    /// Removing an identifier that is not in the list leaves the
    /// profile unchanged.
    pub async fn remove_experience(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Profile, AppError> {
        self.profile_repo.pull_experience(&user_id, &entry_id).await
    }

    pub async fn add_education(
        &self,
        user_id: Uuid,
        input: NewEducation,
    ) -> Result<Profile, AppError> {
        input.validate()?;
        let entry = input.prepare_for_insert();
        self.profile_repo.push_education(&user_id, &entry).await
    }

    pub async fn remove_education(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Profile, AppError> {
        self.profile_repo.pull_education(&user_id, &entry_id).await
    }

    pub async fn own_profile(&self, user_id: Uuid) -> Result<ProfileWithOwner, AppError> {
        self.profile_repo
            .find_with_owner_by_user_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("There is no profile for this user".to_string()))
    }

    /// An empty store is a valid, empty result.
    pub async fn all_profiles(&self) -> Result<Vec<ProfileWithOwner>, AppError> {
        self.profile_repo.list_all().await
    }

    pub async fn profile_by_handle(&self, handle: &str) -> Result<ProfileWithOwner, AppError> {
        self.profile_repo
            .find_with_owner_by_handle(handle)
            .await?
            .ok_or_else(|| AppError::NotFound("No profile for this handle".to_string()))
    }

    pub async fn profile_by_user(&self, user_id: Uuid) -> Result<ProfileWithOwner, AppError> {
        self.profile_repo
            .find_with_owner_by_user_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No profile for this user".to_string()))
    }
}
