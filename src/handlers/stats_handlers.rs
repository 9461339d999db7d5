use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use super::form_handlers::load_owned;
use crate::auth::session::require_user;
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::forms::response::{DisplayResponse, reconstruct};
use crate::forms::stats;
use crate::models::response;

/// GET /stats/forms/{id} - per-question aggregates
pub async fn summary(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let stored = load_owned(&pool, &path, user_id).await?;
    let responses = response::find_for_form(&pool, &path).await?;
    Ok(Envelope::ok(stats::summarize(&stored.form, &responses)).into_response())
}

/// GET /stats/forms/{id}/responses - stored responses, answers re-split for display
pub async fn responses(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let stored = load_owned(&pool, &path, user_id).await?;
    let display: Vec<DisplayResponse> = response::find_for_form(&pool, &path)
        .await?
        .iter()
        .map(|r| reconstruct(&stored.form, r))
        .collect();
    Ok(Envelope::ok(display).into_response())
}
