use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::{password, session};
use crate::envelope::Envelope;
use crate::errors::{AppError, ensure_valid};
use crate::forms::validate;
use crate::models::user::{self, LoginRequest, NewUser, RegisterRequest, UserDisplay};

/// POST /auth/register - create an account and log it in
pub async fn register(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_username(&body.username));
    errors.extend(validate::validate_email(&body.email));
    errors.extend(validate::validate_password(&body.password));
    ensure_valid(errors)?;

    if user::exists(&pool, &body.username, &body.email).await? {
        return Err(AppError::Validation(vec![
            "Username or email is already registered".to_string(),
        ]));
    }

    let new_user = NewUser {
        username: body.username.clone(),
        email: body.email.clone(),
        password: password::hash_password(&body.password)?,
    };
    let id = user::create(&pool, &new_user).await?;
    let created: UserDisplay = user::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?
        .into();

    session::sign_in(&session, &created)?;
    log::info!("Registered user {} ({id})", created.username);
    Ok(Envelope::created(created).into_response())
}

/// POST /auth/login
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    limiter: web::Data<RateLimiter>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        return Err(AppError::RateLimited);
    }

    let found = user::find_by_username(&pool, &body.username).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&body.password, &u.password)?,
        None => false,
    };

    match found {
        Some(u) if verified => {
            limiter.clear(ip);
            let display = UserDisplay::from(u);
            session::sign_in(&session, &display)?;
            log::info!("User {} logged in", display.username);
            Ok(Envelope::ok(display).into_response())
        }
        _ => {
            limiter.record_failure(ip);
            log::warn!("Failed login for {:?} from {ip}", body.username);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// POST /auth/logout
pub async fn logout(session: Session) -> HttpResponse {
    if let Some(name) = session::get_username(&session) {
        log::info!("User {name} logged out");
    }
    session::sign_out(&session);
    Envelope::ok(serde_json::Value::Null).into_response()
}

/// GET /users/me
pub async fn me(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = session::require_user(&session)?;
    let found = user::find_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Envelope::ok(UserDisplay::from(found)).into_response())
}
