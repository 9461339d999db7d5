use std::collections::HashMap;

use sqlx::PgPool;

use crate::db;
use crate::forms::{AnswerPayload, StoredResponse, SubmissionPayload};

/// Store a checked submission. Answers keep their submitted order.
pub async fn create(pool: &PgPool, payload: &SubmissionPayload) -> Result<StoredResponse, sqlx::Error> {
    let id = db::new_id();
    let submitted_at = db::now();

    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO responses (id, form_id, submitted_at) VALUES ($1, $2, $3)")
        .bind(&id)
        .bind(&payload.form_id)
        .bind(&submitted_at)
        .execute(&mut *tx)
        .await?;

    for (position, answer) in payload.answers.iter().enumerate() {
        sqlx::query(
            "INSERT INTO answers (response_id, question_id, answer_text, position) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(&answer.question_id)
        .bind(&answer.answer_text)
        .bind(i32::try_from(position).unwrap_or(i32::MAX))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    log::info!("Stored response {id} for form {} ({} answers)", payload.form_id, payload.answers.len());
    Ok(StoredResponse {
        id,
        form_id: payload.form_id.clone(),
        submitted_at,
        answers: payload.answers.clone(),
    })
}

/// All responses to a form, oldest first.
pub async fn find_for_form(pool: &PgPool, form_id: &str) -> Result<Vec<StoredResponse>, sqlx::Error> {
    let heads: Vec<(String, String)> = sqlx::query_as(
        "SELECT id, submitted_at FROM responses WHERE form_id = $1 ORDER BY submitted_at, id",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT a.response_id, a.question_id, a.answer_text \
         FROM answers a JOIN responses r ON r.id = a.response_id \
         WHERE r.form_id = $1 \
         ORDER BY a.response_id, a.position",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    let mut answers: HashMap<String, Vec<AnswerPayload>> = HashMap::new();
    for (response_id, question_id, answer_text) in rows {
        answers
            .entry(response_id)
            .or_default()
            .push(AnswerPayload { question_id, answer_text });
    }

    Ok(heads
        .into_iter()
        .map(|(id, submitted_at)| StoredResponse {
            answers: answers.remove(&id).unwrap_or_default(),
            form_id: form_id.to_string(),
            id,
            submitted_at,
        })
        .collect())
}
