use std::collections::HashSet;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::require_user;
use crate::config::AppConfig;
use crate::envelope::Envelope;
use crate::errors::{AppError, ensure_valid};
use crate::forms::{Form, FormState};
use crate::models::form::{self, FormView, StoredForm};

/// Load form `id` and check that `user_id` owns it.
pub(crate) async fn load_owned(pool: &PgPool, id: &str, user_id: i64) -> Result<StoredForm, AppError> {
    let stored = form::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    if stored.owner_id != user_id {
        log::warn!("User {user_id} denied access to form {id}");
        return Err(AppError::Forbidden);
    }
    Ok(stored)
}

async fn view(pool: &PgPool, config: &AppConfig, id: &str) -> Result<FormView, AppError> {
    let stored = form::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(FormView::new(stored, &config.public_base_url))
}

/// GET /forms - the caller's forms
pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let forms = form::list_for_owner(&pool, user_id).await?;
    Ok(Envelope::ok(forms).into_response())
}

/// POST /forms - save a new form. New forms are always private.
pub async fn create(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    body: web::Json<Form>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let new_form = body.into_inner();

    if new_form.id.is_some() || new_form.questions.iter().any(|q| q.id.is_some()) {
        return Err(AppError::BadRequest(
            "New forms must not carry ids; use PUT /forms/{id} to save an existing form".to_string(),
        ));
    }
    if new_form.is_public {
        return Err(AppError::BadRequest(
            "New forms are created private; publish after saving".to_string(),
        ));
    }
    ensure_valid(new_form.validate())?;

    let id = form::create(&pool, user_id, &new_form).await?;
    Ok(Envelope::created(view(&pool, &config, &id).await?).into_response())
}

/// GET /forms/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let stored = load_owned(&pool, &path, user_id).await?;
    Ok(Envelope::ok(FormView::new(stored, &config.public_base_url)).into_response())
}

/// PUT /forms/{id} - replace a saved form (update-by-id, idempotent)
pub async fn update(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<Form>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    let stored = load_owned(&pool, &id, user_id).await?;

    let mut next = body.into_inner();
    if next.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(AppError::BadRequest("Form id in body does not match the URL".to_string()));
    }
    next.id = Some(id.clone());

    let known: HashSet<&str> = stored
        .form
        .questions
        .iter()
        .filter_map(|q| q.id.as_deref())
        .collect();
    let mut errors: Vec<String> = next
        .questions
        .iter()
        .filter_map(|q| q.id.as_deref())
        .filter(|qid| !known.contains(qid))
        .map(|qid| format!("Unknown question id: {qid}"))
        .collect();
    errors.extend(next.validate());
    ensure_valid(errors)?;

    stored.form.check_transition(&next)?;

    form::update(&pool, &id, &next).await?;
    Ok(Envelope::ok(view(&pool, &config, &id).await?).into_response())
}

/// POST /forms/{id}/publish - Saved → Published
pub async fn publish(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    let mut stored = load_owned(&pool, &id, user_id).await?;

    if stored.form.state() == FormState::Published {
        return Ok(Envelope::ok(FormView::new(stored, &config.public_base_url)).into_response());
    }
    stored.form.publish()?;
    form::set_public(&pool, &id).await?;
    Ok(Envelope::ok(view(&pool, &config, &id).await?).into_response())
}

/// DELETE /forms/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let id = path.into_inner();
    load_owned(&pool, &id, user_id).await?;

    if !form::delete(&pool, &id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("User {user_id} deleted form {id}");
    Ok(Envelope::ok(serde_json::json!({ "id": id })).into_response())
}
