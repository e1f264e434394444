use actix_web::web;
use crate::handlers::posts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(posts::posts_test)
    );
}
