use actix_web::{get, HttpResponse, Responder};

// Posts and comments are not implemented yet; only the probe route
// from the original API surface exists.
#[get("/test")]
pub async fn posts_test() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "msg": "Posts Works!" }))
}
