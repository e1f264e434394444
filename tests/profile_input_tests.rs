use serde_json::json;
use validator::Validate;

use devconnect_backend::entities::education::NewEducation;
use devconnect_backend::entities::experience::NewExperience;
use devconnect_backend::entities::profile::{ProfileInput, SocialLinks};

fn input(body: serde_json::Value) -> ProfileInput {
    serde_json::from_value(body).expect("valid profile input")
}

#[test]
fn skills_string_splits_into_ordered_tokens() {
    assert_eq!(
        ProfileInput::split_skills("js,node,react"),
        vec!["js", "node", "react"]
    );
}

#[test]
fn skills_tokens_are_kept_verbatim() {
    // No trimming, no deduplication, empty tokens survive.
    assert_eq!(
        ProfileInput::split_skills("js, node,,js"),
        vec!["js", " node", "", "js"]
    );
}

#[test]
fn prepare_fields_keeps_absent_fields_unset() {
    let fields = input(json!({ "handle": "bob" })).prepare_fields();

    assert_eq!(fields.handle, "bob");
    assert_eq!(fields.company, None);
    assert_eq!(fields.bio, None);
    assert_eq!(fields.skills, None);
    assert_eq!(fields.social, SocialLinks::default());
}

#[test]
fn prepare_fields_collects_present_values() {
    let fields = input(json!({
        "handle": "bob",
        "status": "Developer",
        "skills": "go,rust",
        "githubusername": "bob-dev",
        "youtube": "https://youtube.com/c/bob"
    }))
    .prepare_fields();

    assert_eq!(fields.status.as_deref(), Some("Developer"));
    assert_eq!(
        fields.skills,
        Some(vec!["go".to_string(), "rust".to_string()])
    );
    assert_eq!(fields.github_username.as_deref(), Some("bob-dev"));
    assert_eq!(fields.social.youtube.as_deref(), Some("https://youtube.com/c/bob"));
    assert_eq!(fields.social.twitter, None);
}

#[test]
fn social_object_serializes_only_present_keys() {
    let social = SocialLinks {
        twitter: Some("https://twitter.com/bob".to_string()),
        ..Default::default()
    };

    let value = serde_json::to_value(&social).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["twitter"]);
}

#[test]
fn handle_format_is_enforced() {
    assert!(input(json!({ "handle": "dev-bob_99" })).validate().is_ok());
    assert!(input(json!({ "handle": "x" })).validate().is_err());
    assert!(input(json!({ "handle": "has spaces" })).validate().is_err());
}

#[test]
fn website_must_be_a_url() {
    let result = input(json!({
        "handle": "bob",
        "website": "not-a-url"
    }))
    .validate();

    let errors = result.unwrap_err();
    assert!(errors.field_errors().contains_key("website"));
}

#[test]
fn experience_input_copies_fields_and_generates_distinct_ids() {
    let new_entry: NewExperience = serde_json::from_value(json!({
        "title": "Engineer",
        "company": "Initech",
        "from": "2020-01-01",
        "current": true
    }))
    .unwrap();

    let first = new_entry.prepare_for_insert();
    let second = new_entry.prepare_for_insert();

    assert_eq!(first.title, "Engineer");
    assert_eq!(first.company, "Initech");
    assert!(first.current);
    assert_ne!(first.id, second.id);
}

#[test]
fn education_input_uses_the_wire_name_for_field_of_study() {
    let new_entry: NewEducation = serde_json::from_value(json!({
        "school": "MIT",
        "degree": "BSc",
        "fieldofstudy": "Computer Science",
        "from": "2014-09-01"
    }))
    .unwrap();

    assert_eq!(new_entry.field_of_study, "Computer Science");

    let entry = new_entry.prepare_for_insert();
    let value = serde_json::to_value(&entry).unwrap();
    assert!(value.get("fieldofstudy").is_some());
    assert!(value.get("field_of_study").is_none());
}

#[test]
fn experience_input_requires_title_and_company() {
    let missing_company: NewExperience = serde_json::from_value(json!({
        "title": "Engineer",
        "company": "",
        "from": "2020-01-01"
    }))
    .unwrap();

    let errors = missing_company.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("company"));
}
