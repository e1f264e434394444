use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod posts;
mod profiles;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(users::config_routes)
            .configure(profiles::config_routes)
            .configure(posts::config_routes)
    );
}
