//! Session accessors. Handlers receive the request's `Session` explicitly
//! and go through these functions; nothing reads session state globally.

use actix_session::Session;

use crate::errors::AppError;
use crate::models::user::UserDisplay;

const USER_ID: &str = "user_id";
const USERNAME: &str = "username";

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID).unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>(USERNAME).unwrap_or(None)
}

/// The logged-in user's id, or `AppError::Unauthorized`.
pub fn require_user(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or(AppError::Unauthorized)
}

/// Start a fresh session for `user`.
pub fn sign_in(session: &Session, user: &UserDisplay) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID, user.id)
        .and_then(|_| session.insert(USERNAME, &user.username))
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn sign_out(session: &Session) {
    session.purge();
}
