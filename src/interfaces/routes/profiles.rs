use actix_web::web;
use crate::handlers::profiles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .service(profiles::all_profiles)
            .service(profiles::profile_by_handle)
            .service(profiles::profile_by_user)
            .service(profiles::add_experience)
            .service(profiles::remove_experience)
            .service(profiles::add_education)
            .service(profiles::remove_education)
            .service(profiles::own_profile)
            .service(profiles::upsert_profile)
    );
}
