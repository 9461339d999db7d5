use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::envelope::Envelope;
use crate::errors::{AppError, ensure_valid};
use crate::forms::SubmissionPayload;
use crate::forms::response::check_submission;
use crate::models::form::{self, FormView, StoredForm};
use crate::models::response;

/// Only published forms are visible to respondents; anything else is a 404.
async fn load_public(pool: &PgPool, id: &str) -> Result<StoredForm, AppError> {
    match form::find_by_id(pool, id).await? {
        Some(stored) if stored.form.is_public => Ok(stored),
        _ => Err(AppError::NotFound),
    }
}

/// GET /viewer/forms/{id} - public form for respondents
pub async fn read_public(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let stored = load_public(&pool, &path).await?;
    Ok(Envelope::ok(FormView::new(stored, &config.public_base_url)).into_response())
}

/// POST /viewer/responses - submit answers to a published form
pub async fn submit(
    pool: web::Data<PgPool>,
    body: web::Json<SubmissionPayload>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let stored = load_public(&pool, &payload.form_id).await?;

    ensure_valid(check_submission(&stored.form, &payload))?;

    let saved = response::create(&pool, &payload).await?;
    Ok(Envelope::created(saved).into_response())
}
