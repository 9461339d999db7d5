use sqlx::{PgPool, Postgres, Transaction};

use super::types::{FormRow, FormSummary, QuestionRow, StoredForm};
use crate::db;
use crate::forms::{Form, Question};

/// Insert a new private form with its questions. Ids are assigned here.
pub async fn create(pool: &PgPool, owner_id: i64, form: &Form) -> Result<String, sqlx::Error> {
    let id = db::new_id();
    let now = db::now();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO forms (id, owner_id, title, description, is_public, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, FALSE, $5, $5)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    for q in &form.questions {
        upsert_question(&mut tx, &id, q).await?;
    }
    tx.commit().await?;

    log::info!("Created form {id} ({} questions) for user {owner_id}", form.questions.len());
    Ok(id)
}

/// Replace the stored form `id` with `form`: metadata is overwritten,
/// questions missing from `form` are deleted, the rest upserted.
pub async fn update(pool: &PgPool, id: &str, form: &Form) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE forms SET title = $1, description = $2, is_public = $3, updated_at = $4 \
         WHERE id = $5",
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(form.is_public)
    .bind(db::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let kept: Vec<String> = form.questions.iter().filter_map(|q| q.id.clone()).collect();
    let removed = sqlx::query("DELETE FROM questions WHERE form_id = $1 AND NOT (id = ANY($2))")
        .bind(id)
        .bind(&kept)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for q in &form.questions {
        upsert_question(&mut tx, id, q).await?;
    }
    tx.commit().await?;

    log::info!(
        "Updated form {id}: {} questions, {removed} removed",
        form.questions.len()
    );
    Ok(())
}

async fn upsert_question(
    tx: &mut Transaction<'_, Postgres>,
    form_id: &str,
    q: &Question,
) -> Result<(), sqlx::Error> {
    let question_id = q.id.clone().unwrap_or_else(db::new_id);
    let options = serde_json::to_string(q.options()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query(
        "INSERT INTO questions (id, form_id, question_text, question_type, options, required, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (id) DO UPDATE SET \
             question_text = excluded.question_text, \
             question_type = excluded.question_type, \
             options = excluded.options, \
             required = excluded.required, \
             sort_order = excluded.sort_order \
         WHERE questions.form_id = excluded.form_id",
    )
    .bind(&question_id)
    .bind(form_id)
    .bind(&q.text)
    .bind(q.question_type().as_str())
    .bind(&options)
    .bind(q.required)
    .bind(q.order)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Load a form with its questions, sorted by `order`.
pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<StoredForm>, sqlx::Error> {
    let row = sqlx::query_as::<_, FormRow>(
        "SELECT id, owner_id, title, description, is_public, created_at, updated_at \
         FROM forms WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let question_rows = sqlx::query_as::<_, QuestionRow>(
        "SELECT id, question_text, question_type, options, required, sort_order \
         FROM questions WHERE form_id = $1",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let questions = question_rows
        .into_iter()
        .map(Question::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let mut form = Form {
        id: Some(row.id),
        title: row.title,
        description: row.description,
        is_public: row.is_public,
        questions,
    };
    form.sort_questions();

    Ok(Some(StoredForm {
        owner_id: row.owner_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
        form,
    }))
}

/// Forms owned by `owner_id`, most recently updated first.
pub async fn list_for_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<FormSummary>, sqlx::Error> {
    sqlx::query_as::<_, FormSummary>(
        "SELECT f.id, f.title, f.is_public, \
                (SELECT COUNT(*) FROM questions q WHERE q.form_id = f.id) AS question_count, \
                (SELECT COUNT(*) FROM responses r WHERE r.form_id = f.id) AS response_count, \
                f.updated_at \
         FROM forms f WHERE f.owner_id = $1 \
         ORDER BY f.updated_at DESC, f.id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Mark a form public. There is no way back.
pub async fn set_public(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE forms SET is_public = TRUE, updated_at = $1 WHERE id = $2")
        .bind(db::now())
        .bind(id)
        .execute(pool)
        .await?;
    log::info!("Published form {id}");
    Ok(())
}

/// Delete a form together with its questions and responses.
pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM forms WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
