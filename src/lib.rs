mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxProfileRepo, SqlxUserRepo};
use use_cases::auth::AuthHandler;
use use_cases::profile::ProfileHandler;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub profile_handler: AppProfileHandler,
}

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppProfileHandler = ProfileHandler<SqlxProfileRepo>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let user_repo = SqlxUserRepo::new(pool.clone());
        let profile_repo = SqlxProfileRepo::new(pool);

        AppState {
            auth_handler: AuthHandler::new(user_repo, jwt_service),
            profile_handler: ProfileHandler::new(profile_repo),
        }
    }
}
