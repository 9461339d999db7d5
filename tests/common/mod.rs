//! Shared test setup.
//!
//! Database tests run against the Postgres named by `DATABASE_URL` and are
//! skipped when it is unset. API tests that never reach the database use a
//! lazy pool that does not connect until a query runs.

#![allow(dead_code)]

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use questionask::auth::password;
use questionask::auth::rate_limit::RateLimiter;
use questionask::config::AppConfig;
use questionask::models::user::{self, NewUser};
use questionask::{db, handlers};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const FALLBACK_URL: &str = "postgres://localhost/questionask_test";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| FALLBACK_URL.to_string()),
        bind_addr: "127.0.0.1:0".to_string(),
        session_key: None,
        public_base_url: "http://forms.test".to_string(),
        db_max_connections: 2,
    }
}

/// A pool that never connects unless used.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&test_config().database_url)
        .expect("valid database url")
}

/// Migrated pool, or `None` when no test database is configured.
pub async fn setup_test_db() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    db::run_migrations(&pool).await.expect("migrate");
    Some(pool)
}

/// Insert a user with a unique name. Returns the new user's ID.
pub async fn create_user(pool: &PgPool, prefix: &str) -> i64 {
    let suffix = &db::new_id()[..8];
    let new_user = NewUser {
        username: format!("{prefix}_{suffix}"),
        email: format!("{prefix}_{suffix}@test.com"),
        password: password::hash_password("Password1!").expect("hash"),
    };
    user::create(pool, &new_user).await.expect("create user")
}

/// The full API behind a cookie session, as `main` assembles it.
pub fn test_app(
    pool: PgPool,
    limiter: RateLimiter,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(test_config()))
        .app_data(web::Data::new(limiter))
        .configure(handlers::configure)
}
