//! Declarative single-field validation.
//!
//! `validate` checks one raw input value against a [`Constraints`] set and
//! returns the first failing rule's message. Rules run in a fixed order:
//! required, email format, numeric parse and range, then string length and
//! pattern. An empty value that is not required passes every rule.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// What kind of input a value is checked as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Number,
}

/// Constraint set for one input. Every bound is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression, optionally written as `/expr/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Constraints {
    pub fn text() -> Self {
        Self::default()
    }

    pub fn email() -> Self {
        Self { kind: InputKind::Email, ..Self::default() }
    }

    pub fn number() -> Self {
        Self { kind: InputKind::Number, ..Self::default() }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Validate `value` against `constraints`. Returns `None` when the value is
/// acceptable, otherwise the message of the first rule that failed.
pub fn validate(value: &str, constraints: &Constraints) -> Option<String> {
    let trimmed = value.trim();
    let number = parse_number(trimmed);

    let missing = match constraints.kind {
        InputKind::Number => number.is_none(),
        InputKind::Text | InputKind::Email => trimmed.is_empty(),
    };
    if constraints.required && missing {
        return Some("This field is required".to_string());
    }
    if trimmed.is_empty() {
        return None;
    }

    match constraints.kind {
        InputKind::Email if !EMAIL_RE.is_match(trimmed) => {
            return Some("Please enter a valid email address".to_string());
        }
        InputKind::Number => return check_range(number, constraints),
        _ => {}
    }

    let len = trimmed.chars().count();
    if let Some(min_len) = constraints.min_length {
        if len < min_len {
            return Some(format!("Must be at least {min_len} characters"));
        }
    }
    if let Some(max_len) = constraints.max_length {
        if len > max_len {
            return Some(format!("Must be at most {max_len} characters"));
        }
    }

    if let Some(pattern) = constraints.pattern.as_deref() {
        match compile_pattern(pattern) {
            Ok(re) if !re.is_match(trimmed) => return Some("Invalid format".to_string()),
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring invalid pattern constraint {pattern:?}: {e}"),
        }
    }

    None
}

fn check_range(number: Option<f64>, constraints: &Constraints) -> Option<String> {
    let Some(n) = number else {
        return Some("Must be a number".to_string());
    };
    if let Some(min) = constraints.min {
        if n < min {
            return Some(format!("Must be at least {min}"));
        }
    }
    if let Some(max) = constraints.max {
        if n > max {
            return Some(format!("Must be at most {max}"));
        }
    }
    None
}

/// Finite floats only: "NaN" and "inf" parse in Rust but are not numbers here.
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Compile a pattern constraint, stripping one pair of enclosing slashes.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .unwrap_or(pattern);
    Regex::new(body)
}

// ---------------------------------------------------------------------------
// Account field checks used by registration.
// ---------------------------------------------------------------------------

/// Validate a username: 2-50 chars, alphanumeric and underscore only.
pub fn validate_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Some("Username is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < 2 {
        return Some("Username must be at least 2 characters".to_string());
    }
    if len > 50 {
        return Some("Username must be at most 50 characters".to_string());
    }
    if !trimmed.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some("Username may only contain letters, numbers, and underscores".to_string());
    }
    None
}

/// Validate an account email: required, at most 254 chars, valid format.
pub fn validate_email(email: &str) -> Option<String> {
    if email.trim().chars().count() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    validate(email, &Constraints::email().required())
        .map(|e| format!("Email: {e}"))
}

/// Validate a password: min 8 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Some("Password must be at least 8 characters".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    validate_optional(value, field_name, max_len)
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}
