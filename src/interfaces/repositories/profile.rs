use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::education::Education,
    entities::experience::Experience,
    entities::profile::{Profile, ProfileFields, ProfileWithOwner},
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

const PROFILE_MISSING: &str = "There is no profile for this user";

/// Storage contract for the profile aggregate.
///
/// Every mutation is a single field-scoped statement: the embedded
/// lists are pushed/pulled atomically on the stored document, never
/// loaded, mutated in memory and written back. Two concurrent
/// mutations on the same profile therefore cannot lose each other's
/// update.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError>;
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, AppError>;

    /// Inserts a new profile with empty experience/education lists.
    async fn create(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError>;

    /// Sparse merge: `None` fields keep their stored value, `social`
    /// is replaced wholesale.
    async fn update_fields(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError>;

    /// Atomic front-insert into the experience list.
    async fn push_experience(&self, user_id: &Uuid, entry: &Experience) -> Result<Profile, AppError>;

    /// Atomic remove-by-identifier; an unknown identifier is a no-op.
    async fn pull_experience(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError>;

    async fn push_education(&self, user_id: &Uuid, entry: &Education) -> Result<Profile, AppError>;
    async fn pull_education(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError>;

    async fn list_all(&self) -> Result<Vec<ProfileWithOwner>, AppError>;
    async fn find_with_owner_by_handle(&self, handle: &str) -> Result<Option<ProfileWithOwner>, AppError>;
    async fn find_with_owner_by_user_id(&self, user_id: &Uuid) -> Result<Option<ProfileWithOwner>, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

const WITH_OWNER_COLUMNS: &str = r#"
    p.id, p.user_id, p.handle, p.company, p.website, p.location, p.bio,
    p.status, p.github_username, p.skills, p.social, p.experience,
    p.education, p.created_at, p.updated_at,
    u.name AS owner_name, u.avatar AS owner_avatar
"#;

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            if db_err.constraint() == Some("profiles_handle_key") {
                AppError::Conflict("Handle already exists".to_string())
            } else {
                AppError::Conflict("Profile already exists for this user".to_string())
            }
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn find_by_user_id(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE handle = $1")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                user_id, handle, company, website, location, bio,
                status, github_username, skills, social
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&fields.handle)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.bio)
        .bind(&fields.status)
        .bind(&fields.github_username)
        .bind(fields.skills.clone().unwrap_or_default())
        .bind(Json(fields.social.clone()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn update_fields(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                handle = $2,
                company = COALESCE($3, company),
                website = COALESCE($4, website),
                location = COALESCE($5, location),
                bio = COALESCE($6, bio),
                status = COALESCE($7, status),
                github_username = COALESCE($8, github_username),
                skills = COALESCE($9, skills),
                social = $10,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&fields.handle)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.bio)
        .bind(&fields.status)
        .bind(&fields.github_username)
        .bind(&fields.skills)
        .bind(Json(fields.social.clone()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))
    }

    async fn push_experience(&self, user_id: &Uuid, entry: &Experience) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET experience = $2::jsonb || experience,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Json(vec![entry.clone()]))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))
    }

    async fn pull_experience(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET experience = COALESCE(
                    (SELECT jsonb_agg(entry ORDER BY idx)
                       FROM jsonb_array_elements(experience) WITH ORDINALITY AS t(entry, idx)
                      WHERE entry->>'id' <> $2),
                    '[]'::jsonb),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(entry_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))
    }

    async fn push_education(&self, user_id: &Uuid, entry: &Education) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET education = $2::jsonb || education,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Json(vec![entry.clone()]))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))
    }

    async fn pull_education(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET education = COALESCE(
                    (SELECT jsonb_agg(entry ORDER BY idx)
                       FROM jsonb_array_elements(education) WITH ORDINALITY AS t(entry, idx)
                      WHERE entry->>'id' <> $2),
                    '[]'::jsonb),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(entry_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<ProfileWithOwner>, AppError> {
        sqlx::query_as::<_, ProfileWithOwner>(&format!(
            r#"
            SELECT {WITH_OWNER_COLUMNS}
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at
            "#,
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_with_owner_by_handle(&self, handle: &str) -> Result<Option<ProfileWithOwner>, AppError> {
        sqlx::query_as::<_, ProfileWithOwner>(&format!(
            r#"
            SELECT {WITH_OWNER_COLUMNS}
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.handle = $1
            "#,
        ))
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_with_owner_by_user_id(&self, user_id: &Uuid) -> Result<Option<ProfileWithOwner>, AppError> {
        sqlx::query_as::<_, ProfileWithOwner>(&format!(
            r#"
            SELECT {WITH_OWNER_COLUMNS}
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
