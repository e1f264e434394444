use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::entities::education::Education;
use crate::entities::experience::Experience;

static HANDLE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("handle regex is valid"));

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub handle: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: Json<SocialLinks>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Social links are replaced as a whole on every profile upsert;
/// only the keys present in the request survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

/// Owner fields exposed on public reads. Projection only, never the
/// full user row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OwnerSummary {
    #[sqlx(rename = "owner_name")]
    pub name: String,
    #[sqlx(rename = "owner_avatar")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProfileWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: Profile,
    #[sqlx(flatten)]
    pub user: OwnerSummary,
}

// ───── Input & Validation ───────────────────────────────────────────

/// Upsert payload. Every field except `handle` is optional: absent
/// fields are never written onto an existing profile. Social links
/// arrive flat and are folded into [`SocialLinks`].
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(
        length(min = 2, max = 40, message = "Handle must be between 2 and 40 characters"),
        regex(path = *HANDLE_FORMAT, message = "Handle may only contain letters, numbers, '-' and '_'")
    )]
    pub handle: String,

    pub company: Option<String>,

    #[validate(url(message = "Not a valid URL"))]
    pub website: Option<String>,

    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,

    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,

    /// Comma-separated list, split verbatim into tokens.
    pub skills: Option<String>,

    #[validate(url(message = "Not a valid URL"))]
    pub youtube: Option<String>,
    #[validate(url(message = "Not a valid URL"))]
    pub twitter: Option<String>,
    #[validate(url(message = "Not a valid URL"))]
    pub facebook: Option<String>,
    #[validate(url(message = "Not a valid URL"))]
    pub linkedin: Option<String>,
    #[validate(url(message = "Not a valid URL"))]
    pub instagram: Option<String>,
}

/// The sparse field-update set produced from a [`ProfileInput`].
/// `None` means "leave the stored value untouched"; `social` is always
/// written wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFields {
    pub handle: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub github_username: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: SocialLinks,
}

// ───── Update-set Preparation Logic ─────────────────────────────────

impl ProfileInput {
    /// Tokens are kept exactly as entered: no trimming, no deduplication.
    pub fn split_skills(raw: &str) -> Vec<String> {
        raw.split(',').map(str::to_string).collect()
    }

    pub fn social_links(&self) -> SocialLinks {
        SocialLinks {
            youtube: self.youtube.clone(),
            twitter: self.twitter.clone(),
            facebook: self.facebook.clone(),
            linkedin: self.linkedin.clone(),
            instagram: self.instagram.clone(),
        }
    }

    pub fn prepare_fields(&self) -> ProfileFields {
        ProfileFields {
            handle: self.handle.clone(),
            company: self.company.clone(),
            website: self.website.clone(),
            location: self.location.clone(),
            bio: self.bio.clone(),
            status: self.status.clone(),
            github_username: self.github_username.clone(),
            skills: self.skills.as_deref().map(Self::split_skills),
            social: self.social_links(),
        }
    }
}
