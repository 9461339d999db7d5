pub mod auth_handlers;
pub mod form_handlers;
pub mod stats_handlers;
pub mod viewer_handlers;

use actix_web::error::InternalError;
use actix_web::middleware::from_fn;
use actix_web::web;

use crate::auth::middleware::{require_auth, require_json_content_type};
use crate::envelope::Envelope;

/// Malformed JSON bodies answer with a 400 envelope, like every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| {
            let response = Envelope::new(400, err.to_string(), serde_json::Value::Null).into_response();
            InternalError::from_response(err, response).into()
        })
}

/// Register every route. `main` and the API tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    cfg.service(
        web::scope("/auth")
            .wrap(from_fn(require_json_content_type))
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout)),
    );
    cfg.service(
        web::scope("/users")
            .wrap(from_fn(require_auth))
            .route("/me", web::get().to(auth_handlers::me)),
    );
    // /forms/{id}/publish BEFORE /forms/{id} to keep the routes unambiguous
    cfg.service(
        web::scope("/forms")
            .wrap(from_fn(require_json_content_type))
            .wrap(from_fn(require_auth))
            .route("", web::get().to(form_handlers::list))
            .route("", web::post().to(form_handlers::create))
            .route("/{id}/publish", web::post().to(form_handlers::publish))
            .route("/{id}", web::get().to(form_handlers::read))
            .route("/{id}", web::put().to(form_handlers::update))
            .route("/{id}", web::delete().to(form_handlers::delete)),
    );
    cfg.service(
        web::scope("/viewer")
            .wrap(from_fn(require_json_content_type))
            .route("/forms/{id}", web::get().to(viewer_handlers::read_public))
            .route("/responses", web::post().to(viewer_handlers::submit)),
    );
    cfg.service(
        web::scope("/stats")
            .wrap(from_fn(require_auth))
            .route("/forms/{id}", web::get().to(stats_handlers::summary))
            .route("/forms/{id}/responses", web::get().to(stats_handlers::responses)),
    );
}
