//! Answers: seeding, the submit gate, and the submission payload.
//!
//! A respondent's answers live in an [`Answers`] map keyed by question id.
//! Checkbox questions hold a list of choices, every other type a single
//! string. On submission each value is flattened to one `answerText`; lists
//! are joined with [`ANSWER_DELIMITER`]. The join is lossy: only display code
//! re-splits it (see [`split_answer_text`]).

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::form::Form;
use super::question::{Question, QuestionKind, QuestionType};
use super::validate::validate;

pub const ANSWER_DELIMITER: &str = ", ";

/// A respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Non-blank text, or at least one choice.
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Text(text) => !text.trim().is_empty(),
            AnswerValue::Choices(choices) => !choices.is_empty(),
        }
    }

    pub fn to_answer_text(&self) -> String {
        match self {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Choices(choices) => choices.join(ANSWER_DELIMITER),
        }
    }
}

/// Answers keyed by question id. Ordered, so payloads built from it are
/// deterministic.
pub type Answers = BTreeMap<String, AnswerValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question_id: String,
    pub answer_text: String,
}

/// Body of `POST /viewer/responses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub form_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerPayload>,
}

/// A submission as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResponse {
    pub id: String,
    pub form_id: String,
    pub submitted_at: String,
    pub answers: Vec<AnswerPayload>,
}

/// One answer reconstructed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAnswer {
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResponse {
    pub id: String,
    pub submitted_at: String,
    pub answers: Vec<DisplayAnswer>,
}

/// Flatten `answers` into the submission shape, one entry per map entry.
pub fn to_submission_payload(form_id: &str, answers: &Answers) -> SubmissionPayload {
    SubmissionPayload {
        form_id: form_id.to_string(),
        answers: answers
            .iter()
            .map(|(question_id, value)| AnswerPayload {
                question_id: question_id.clone(),
                answer_text: value.to_answer_text(),
            })
            .collect(),
    }
}

/// Empty answers for every persisted question: `[]` for checkbox questions,
/// `""` for the rest.
pub fn initialize_answers(questions: &[Question]) -> Answers {
    questions
        .iter()
        .filter_map(|q| {
            let id = q.id.clone()?;
            let value = match q.question_type() {
                QuestionType::Checkbox => AnswerValue::Choices(Vec::new()),
                _ => AnswerValue::Text(String::new()),
            };
            Some((id, value))
        })
        .collect()
}

/// Required questions without an answer, in question order.
pub fn missing_required<'a>(questions: &'a [Question], answers: &Answers) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| q.required)
        .filter(|q| {
            !q.id
                .as_ref()
                .and_then(|id| answers.get(id))
                .is_some_and(AnswerValue::is_answered)
        })
        .collect()
}

/// The submit gate. Enabling the submit control and accepting the
/// submission both go through here.
pub fn can_submit(questions: &[Question], answers: &Answers) -> bool {
    missing_required(questions, answers).is_empty()
}

/// Display-side inverse of the submission join: checkbox text is split back
/// into choices, everything else stays a single value.
pub fn split_answer_text(question_type: QuestionType, text: &str) -> AnswerValue {
    match question_type {
        QuestionType::Checkbox if text.is_empty() => AnswerValue::Choices(Vec::new()),
        QuestionType::Checkbox => AnswerValue::Choices(
            text.split(ANSWER_DELIMITER).map(str::to_string).collect(),
        ),
        _ => AnswerValue::Text(text.to_string()),
    }
}

/// Rebuild a stored response's answers against the form's question types.
/// Answers to questions no longer on the form are kept as plain text.
pub fn reconstruct(form: &Form, response: &StoredResponse) -> DisplayResponse {
    DisplayResponse {
        id: response.id.clone(),
        submitted_at: response.submitted_at.clone(),
        answers: response
            .answers
            .iter()
            .map(|a| {
                let question_type = form
                    .question(&a.question_id)
                    .map_or(QuestionType::Short, Question::question_type);
                DisplayAnswer {
                    question_id: a.question_id.clone(),
                    value: split_answer_text(question_type, &a.answer_text),
                }
            })
            .collect(),
    }
}

/// Check a submission against `form`. Returns every problem found; an empty
/// list means the submission may be stored.
pub fn check_submission(form: &Form, payload: &SubmissionPayload) -> Vec<String> {
    let mut errors = Vec::new();

    if form.id.as_deref() != Some(payload.form_id.as_str()) {
        errors.push("Submission does not belong to this form".to_string());
        return errors;
    }
    if !form.is_public {
        errors.push("Form is not accepting responses".to_string());
        return errors;
    }

    let mut answers = Answers::new();
    let mut duplicates = HashSet::new();
    for a in &payload.answers {
        let Some(question) = form.question(&a.question_id) else {
            errors.push(format!("Unknown question: {}", a.question_id));
            continue;
        };
        let value = split_answer_text(question.question_type(), &a.answer_text);
        if answers.insert(a.question_id.clone(), value).is_some()
            && duplicates.insert(a.question_id.clone())
        {
            errors.push(format!("Question answered more than once: {}", a.question_id));
        }
    }

    for q in missing_required(&form.questions, &answers) {
        errors.push(format!("\"{}\" requires an answer", q.text));
    }

    for q in &form.questions {
        let Some(value) = q.id.as_ref().and_then(|id| answers.get(id)) else {
            continue;
        };
        if !value.is_answered() {
            continue;
        }
        if let Some(problem) = check_answer(q, value) {
            errors.push(format!("\"{}\": {problem}", q.text));
        }
    }

    errors
}

fn check_answer(question: &Question, value: &AnswerValue) -> Option<String> {
    let is_option = |choice: &str| question.options().iter().any(|o| o.text == choice);

    match (&question.kind, value) {
        (QuestionKind::Multiple(_), AnswerValue::Text(choice)) => {
            (!is_option(choice.as_str())).then(|| format!("\"{choice}\" is not one of the options"))
        }
        (QuestionKind::Checkbox(_), AnswerValue::Choices(choices)) => choices
            .iter()
            .find(|c| !is_option(c.as_str()))
            .map(|c| format!("\"{c}\" is not one of the options")),
        (_, AnswerValue::Choices(_)) => Some("Only checkbox questions take several answers".to_string()),
        (kind, AnswerValue::Text(text)) => {
            if let Some(problem) = validate(text, &question.answer_constraints()) {
                return Some(problem);
            }
            match kind {
                QuestionKind::Date if NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_err() => {
                    Some("Not a valid date".to_string())
                }
                QuestionKind::Time if NaiveTime::parse_from_str(text.trim(), "%H:%M").is_err() => {
                    Some("Not a valid time".to_string())
                }
                QuestionKind::Rating if text.trim().parse::<u8>().is_err() => {
                    Some("Rating must be a whole number".to_string())
                }
                _ => None,
            }
        }
    }
}
