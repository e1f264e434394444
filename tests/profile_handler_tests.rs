use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::mock;
use mockall::predicate::*;
use serde_json::json;
use sqlx::types::Json;
use uuid::Uuid;

use devconnect_backend::entities::education::{Education, NewEducation};
use devconnect_backend::entities::experience::{Experience, NewExperience};
use devconnect_backend::entities::profile::{
    OwnerSummary, Profile, ProfileFields, ProfileInput, ProfileWithOwner, SocialLinks,
};
use devconnect_backend::errors::AppError;
use devconnect_backend::repositories::profile::ProfileRepository;
use devconnect_backend::use_cases::profile::ProfileHandler;

// === Mock Trait for ProfileRepository ===
mock! {
    pub ProfileRepo {}

    #[async_trait]
    impl ProfileRepository for ProfileRepo {
        async fn find_by_user_id(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError>;
        async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>, AppError>;
        async fn create(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError>;
        async fn update_fields(&self, user_id: &Uuid, fields: &ProfileFields) -> Result<Profile, AppError>;
        async fn push_experience(&self, user_id: &Uuid, entry: &Experience) -> Result<Profile, AppError>;
        async fn pull_experience(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError>;
        async fn push_education(&self, user_id: &Uuid, entry: &Education) -> Result<Profile, AppError>;
        async fn pull_education(&self, user_id: &Uuid, entry_id: &Uuid) -> Result<Profile, AppError>;
        async fn list_all(&self) -> Result<Vec<ProfileWithOwner>, AppError>;
        async fn find_with_owner_by_handle(&self, handle: &str) -> Result<Option<ProfileWithOwner>, AppError>;
        async fn find_with_owner_by_user_id(&self, user_id: &Uuid) -> Result<Option<ProfileWithOwner>, AppError>;
    }
}

// === Test Helpers ===

fn profile_input(body: serde_json::Value) -> ProfileInput {
    serde_json::from_value(body).expect("valid profile input")
}

fn empty_profile(user_id: Uuid, handle: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user_id,
        handle: handle.to_string(),
        company: None,
        website: None,
        location: None,
        bio: None,
        status: None,
        github_username: None,
        skills: vec![],
        social: Json(SocialLinks::default()),
        experience: Json(vec![]),
        education: Json(vec![]),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn profile_from_fields(user_id: &Uuid, fields: &ProfileFields) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user_id: *user_id,
        handle: fields.handle.clone(),
        company: fields.company.clone(),
        website: fields.website.clone(),
        location: fields.location.clone(),
        bio: fields.bio.clone(),
        status: fields.status.clone(),
        github_username: fields.github_username.clone(),
        skills: fields.skills.clone().unwrap_or_default(),
        social: Json(fields.social.clone()),
        experience: Json(vec![]),
        education: Json(vec![]),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn new_experience(title: &str, company: &str) -> NewExperience {
    serde_json::from_value(json!({
        "title": title,
        "company": company,
        "from": "2020-01-01"
    }))
    .expect("valid experience input")
}

// === Upsert ===

#[tokio::test]
async fn upsert_creates_profile_with_empty_lists_for_new_user() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_by_user_id()
        .with(eq(user_id))
        .returning(|_| Ok(None));
    repo.expect_find_by_handle()
        .with(eq("bob"))
        .returning(|_| Ok(None));
    repo.expect_create()
        .withf(move |uid, fields| {
            *uid == user_id
                && fields.handle == "bob"
                && fields.status.as_deref() == Some("Developer")
                && fields.skills == Some(vec!["go".to_string(), "rust".to_string()])
        })
        .returning(|uid, fields| Ok(profile_from_fields(uid, fields)));

    let handler = ProfileHandler::new(repo);
    let input = profile_input(json!({
        "handle": "bob",
        "status": "Developer",
        "skills": "go,rust"
    }));

    let profile = handler.upsert_profile(user_id, input).await.unwrap();

    assert_eq!(profile.user_id, user_id);
    assert_eq!(profile.handle, "bob");
    assert_eq!(profile.status.as_deref(), Some("Developer"));
    assert_eq!(profile.skills, vec!["go", "rust"]);
    assert!(profile.experience.0.is_empty());
    assert!(profile.education.0.is_empty());
}

#[tokio::test]
async fn upsert_updates_existing_profile_without_creating() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_by_user_id()
        .with(eq(user_id))
        .returning(move |uid| Ok(Some(empty_profile(*uid, "bob"))));
    repo.expect_update_fields()
        .withf(|_, fields| fields.bio.as_deref() == Some("systems programmer"))
        .times(1)
        .returning(|uid, fields| Ok(profile_from_fields(uid, fields)));
    repo.expect_create().never();
    repo.expect_find_by_handle().never();

    let handler = ProfileHandler::new(repo);
    let input = profile_input(json!({
        "handle": "bob",
        "bio": "systems programmer"
    }));

    let profile = handler.upsert_profile(user_id, input).await.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("systems programmer"));
}

#[tokio::test]
async fn upsert_is_idempotent_for_identical_payloads() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_by_user_id()
        .returning(move |uid| Ok(Some(empty_profile(*uid, "bob"))));
    repo.expect_update_fields()
        .times(2)
        .returning(|uid, fields| {
            let mut profile = profile_from_fields(uid, fields);
            // Deterministic id so the two calls can be compared.
            profile.id = Uuid::nil();
            Ok(profile)
        });

    let handler = ProfileHandler::new(repo);
    let body = json!({ "handle": "bob", "status": "Developer", "skills": "go,rust" });

    let first = handler
        .upsert_profile(user_id, profile_input(body.clone()))
        .await
        .unwrap();
    let second = handler
        .upsert_profile(user_id, profile_input(body))
        .await
        .unwrap();

    assert_eq!(first.handle, second.handle);
    assert_eq!(first.status, second.status);
    assert_eq!(first.skills, second.skills);
}

#[tokio::test]
async fn upsert_short_circuits_on_handle_conflict() {
    let user_id = Uuid::new_v4();
    let other_user = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_by_user_id()
        .with(eq(user_id))
        .returning(|_| Ok(None));
    repo.expect_find_by_handle()
        .with(eq("alice"))
        .returning(move |handle| Ok(Some(empty_profile(other_user, handle))));
    repo.expect_create().never();

    let handler = ProfileHandler::new(repo);
    let input = profile_input(json!({ "handle": "alice" }));

    let result = handler.upsert_profile(user_id, input).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn upsert_rejects_invalid_handle_before_any_lookup() {
    let user_id = Uuid::new_v4();
    let repo = MockProfileRepo::new();

    let handler = ProfileHandler::new(repo);
    let input = profile_input(json!({ "handle": "x" }));

    let result = handler.upsert_profile(user_id, input).await;
    match result {
        Err(AppError::ValidationError(errors)) => {
            assert!(errors.iter().any(|e| e.field == "handle"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|p| p.handle)),
    }
}

// === Experience / Education ===

#[tokio::test]
async fn add_experience_assigns_id_and_inserts_at_front() {
    let user_id = Uuid::new_v4();
    let entries: Arc<Mutex<Vec<Experience>>> = Arc::new(Mutex::new(vec![]));
    let mut repo = MockProfileRepo::new();

    let entries_clone = Arc::clone(&entries);
    repo.expect_push_experience()
        .withf(move |uid, entry| *uid == user_id && !entry.id.is_nil())
        .returning(move |uid, entry| {
            let mut list = entries_clone.lock().unwrap();
            list.insert(0, entry.clone());
            let mut profile = empty_profile(*uid, "bob");
            profile.experience = Json(list.clone());
            Ok(profile)
        });

    let handler = ProfileHandler::new(repo);

    handler
        .add_experience(user_id, new_experience("Junior Engineer", "Initech"))
        .await
        .unwrap();
    let profile = handler
        .add_experience(user_id, new_experience("Senior Engineer", "Globex"))
        .await
        .unwrap();

    let experience = &profile.experience.0;
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0].title, "Senior Engineer");
    assert_eq!(experience[1].title, "Junior Engineer");
    assert_ne!(experience[0].id, experience[1].id);
}

#[tokio::test]
async fn add_experience_without_profile_is_not_found() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_push_experience()
        .returning(|_, _| Err(AppError::NotFound("There is no profile for this user".to_string())));

    let handler = ProfileHandler::new(repo);
    let result = handler
        .add_experience(user_id, new_experience("Engineer", "Initech"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn add_experience_rejects_missing_title() {
    let user_id = Uuid::new_v4();
    let repo = MockProfileRepo::new();

    let handler = ProfileHandler::new(repo);
    let result = handler
        .add_experience(user_id, new_experience("", "Initech"))
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert!(errors.iter().any(|e| e.field == "title"));
        }
        _ => panic!("expected validation error"),
    }
}

#[tokio::test]
async fn remove_experience_targets_the_given_identifier() {
    let user_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_pull_experience()
        .with(eq(user_id), eq(entry_id))
        .times(1)
        .returning(|uid, _| Ok(empty_profile(*uid, "bob")));

    let handler = ProfileHandler::new(repo);
    let profile = handler.remove_experience(user_id, entry_id).await.unwrap();
    assert!(profile.experience.0.is_empty());
}

#[tokio::test]
async fn remove_experience_with_unknown_id_leaves_list_unchanged() {
    let user_id = Uuid::new_v4();
    let kept = Experience {
        id: Uuid::new_v4(),
        title: "Engineer".to_string(),
        company: "Initech".to_string(),
        location: None,
        from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        to: None,
        current: false,
        description: None,
    };
    let kept_clone = kept.clone();
    let mut repo = MockProfileRepo::new();

    // The repository contract: pulling an absent identifier is a no-op.
    repo.expect_pull_experience()
        .returning(move |uid, _| {
            let mut profile = empty_profile(*uid, "bob");
            profile.experience = Json(vec![kept_clone.clone()]);
            Ok(profile)
        });

    let handler = ProfileHandler::new(repo);
    let profile = handler
        .remove_experience(user_id, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(profile.experience.0, vec![kept]);
}

#[tokio::test]
async fn add_education_validates_and_pushes_entry() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_push_education()
        .withf(|_, entry| entry.school == "MIT" && !entry.id.is_nil())
        .times(1)
        .returning(|uid, entry| {
            let mut profile = empty_profile(*uid, "bob");
            profile.education = Json(vec![entry.clone()]);
            Ok(profile)
        });

    let handler = ProfileHandler::new(repo);
    let input: NewEducation = serde_json::from_value(json!({
        "school": "MIT",
        "degree": "BSc",
        "fieldofstudy": "Computer Science",
        "from": "2014-09-01"
    }))
    .unwrap();

    let profile = handler.add_education(user_id, input).await.unwrap();
    assert_eq!(profile.education.0[0].field_of_study, "Computer Science");
}

#[tokio::test]
async fn remove_education_propagates_missing_profile() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_pull_education()
        .returning(|_, _| Err(AppError::NotFound("There is no profile for this user".to_string())));

    let handler = ProfileHandler::new(repo);
    let result = handler.remove_education(user_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// === Queries ===

#[tokio::test]
async fn own_profile_missing_is_not_found() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_with_owner_by_user_id()
        .with(eq(user_id))
        .returning(|_| Ok(None));

    let handler = ProfileHandler::new(repo);
    let result = handler.own_profile(user_id).await;

    match result {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "There is no profile for this user"),
        _ => panic!("expected not found"),
    }
}

#[tokio::test]
async fn all_profiles_on_empty_store_is_an_empty_list() {
    let mut repo = MockProfileRepo::new();
    repo.expect_list_all().returning(|| Ok(vec![]));

    let handler = ProfileHandler::new(repo);
    let profiles = handler.all_profiles().await.unwrap();
    assert!(profiles.is_empty());
}

#[tokio::test]
async fn profile_by_handle_resolves_owner_projection() {
    let user_id = Uuid::new_v4();
    let mut repo = MockProfileRepo::new();

    repo.expect_find_with_owner_by_handle()
        .with(eq("bob"))
        .returning(move |handle| {
            Ok(Some(ProfileWithOwner {
                profile: empty_profile(user_id, handle),
                user: OwnerSummary {
                    name: "Bob".to_string(),
                    avatar: Some("https://example.com/bob.png".to_string()),
                },
            }))
        });

    let handler = ProfileHandler::new(repo);
    let found = handler.profile_by_handle("bob").await.unwrap();

    assert_eq!(found.profile.handle, "bob");
    assert_eq!(found.user.name, "Bob");
    assert_eq!(found.user.avatar.as_deref(), Some("https://example.com/bob.png"));
}

#[tokio::test]
async fn profile_by_user_missing_is_not_found() {
    let mut repo = MockProfileRepo::new();
    repo.expect_find_with_owner_by_user_id()
        .returning(|_| Ok(None));

    let handler = ProfileHandler::new(repo);
    let result = handler.profile_by_user(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn storage_failure_is_not_reported_as_absence() {
    let mut repo = MockProfileRepo::new();
    repo.expect_list_all()
        .returning(|| Err(AppError::StorageError("connection reset".to_string())));

    let handler = ProfileHandler::new(repo);
    let result = handler.all_profiles().await;
    assert!(matches!(result, Err(AppError::StorageError(_))));
}
