use serde::Serialize;
use sqlx::FromRow;

use crate::forms::question::QuestionPayload;
use crate::forms::{Form, FormState, Question, QuestionOption, QuestionType};

#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: String,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: String,
    pub question_text: String,
    pub question_type: String,
    pub options: String,
    pub required: bool,
    pub sort_order: i32,
}

impl TryFrom<QuestionRow> for Question {
    type Error = sqlx::Error;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let question_type = row
            .question_type
            .parse::<QuestionType>()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
        let options: Vec<QuestionOption> = serde_json::from_str(&row.options)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let payload = QuestionPayload {
            id: Some(row.id),
            question_text: row.question_text,
            question_type,
            options,
            required: row.required,
            order: row.sort_order,
        };
        Question::try_from(payload).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

/// A form as loaded from the store, with ownership and timestamps.
#[derive(Debug, Clone)]
pub struct StoredForm {
    pub owner_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub form: Form,
}

/// Form as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    #[serde(flatten)]
    pub form: Form,
    pub state: FormState,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl FormView {
    pub fn new(stored: StoredForm, public_base_url: &str) -> Self {
        let public_url = stored.form.public_url(public_base_url);
        FormView {
            state: stored.form.state(),
            form: stored.form,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            public_url,
        }
    }
}

/// Row of the caller's form list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub title: String,
    pub is_public: bool,
    pub question_count: i64,
    pub response_count: i64,
    pub updated_at: String,
}
