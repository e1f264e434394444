use actix_web::{get, post, web, http::StatusCode, HttpResponse, Responder, ResponseError};

use crate::entities::user::{LoginUser, NewUser};
use crate::handlers::json_error::json_error;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

#[get("/current")]
pub async fn current_user(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return json_error(
            StatusCode::BAD_REQUEST,
            "Bad request",
            "Invalid user ID in claims"
        ),
    };

    match state.auth_handler.current_user(user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.to_http_response(),
    }
}
