use actix_web::{delete, get, post, web, http::StatusCode, HttpResponse, Responder};
use uuid::Uuid;

use crate::entities::education::NewEducation;
use crate::entities::experience::NewExperience;
use crate::entities::profile::ProfileInput;
use crate::handlers::json_error::json_error;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

fn bad_claims() -> HttpResponse {
    json_error(StatusCode::BAD_REQUEST, "Bad request", "Invalid user ID in claims")
}

#[get("")]
pub async fn own_profile(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.own_profile(user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[get("/all")]
pub async fn all_profiles(state: web::Data<AppState>) -> impl Responder {
    match state.profile_handler.all_profiles().await {
        Ok(profiles) => HttpResponse::Ok().json(profiles),
        Err(e) => e.to_http_response(),
    }
}

#[get("/handle/{handle}")]
pub async fn profile_by_handle(
    state: web::Data<AppState>,
    handle: web::Path<String>,
) -> impl Responder {
    match state.profile_handler.profile_by_handle(&handle).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[get("/user/{user_id}")]
pub async fn profile_by_user(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> impl Responder {
    match state.profile_handler.profile_by_user(user_id.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[post("")]
pub async fn upsert_profile(
    state: web::Data<AppState>,
    claims: AuthClaims,
    input: web::Json<ProfileInput>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.upsert_profile(user_id, input.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[post("/experience")]
pub async fn add_experience(
    state: web::Data<AppState>,
    claims: AuthClaims,
    input: web::Json<NewExperience>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.add_experience(user_id, input.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/experience/{exp_id}")]
pub async fn remove_experience(
    state: web::Data<AppState>,
    claims: AuthClaims,
    exp_id: web::Path<Uuid>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.remove_experience(user_id, exp_id.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[post("/education")]
pub async fn add_education(
    state: web::Data<AppState>,
    claims: AuthClaims,
    input: web::Json<NewEducation>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.add_education(user_id, input.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/education/{edu_id}")]
pub async fn remove_education(
    state: web::Data<AppState>,
    claims: AuthClaims,
    edu_id: web::Path<Uuid>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return bad_claims(),
    };

    match state.profile_handler.remove_education(user_id, edu_id.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}
