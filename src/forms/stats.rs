use serde::Serialize;

use super::form::Form;
use super::question::{Question, QuestionKind, QuestionType, RATING_MAX, RATING_MIN};
use super::response::{AnswerValue, StoredResponse, split_answer_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    pub form_id: String,
    pub total_responses: usize,
    pub questions: Vec<QuestionStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Responses with a non-blank answer to this question.
    pub answered: usize,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "summary", rename_all = "lowercase")]
pub enum Summary {
    Choices {
        options: Vec<OptionCount>,
        /// Answers matching no current option (options renamed or removed
        /// after responses came in).
        other: usize,
    },
    Rating {
        average: Option<f64>,
        distribution: Vec<RatingCount>,
    },
    Texts {
        answers: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingCount {
    pub value: u8,
    pub count: usize,
}

/// Aggregate `responses` per question of `form`, in question order.
/// Questions without an id have no answers to count and are skipped.
pub fn summarize(form: &Form, responses: &[StoredResponse]) -> FormStats {
    let questions = form
        .questions
        .iter()
        .filter_map(|q| {
            let id = q.id.as_deref()?;
            let answers: Vec<AnswerValue> = responses
                .iter()
                .filter_map(|r| r.answers.iter().find(|a| a.question_id == id))
                .map(|a| split_answer_text(q.question_type(), &a.answer_text))
                .filter(AnswerValue::is_answered)
                .collect();
            Some(QuestionStats {
                question_id: id.to_string(),
                question_text: q.text.clone(),
                question_type: q.question_type(),
                answered: answers.len(),
                summary: summarize_question(q, &answers),
            })
        })
        .collect();

    FormStats {
        form_id: form.id.clone().unwrap_or_default(),
        total_responses: responses.len(),
        questions,
    }
}

fn summarize_question(question: &Question, answers: &[AnswerValue]) -> Summary {
    match &question.kind {
        QuestionKind::Multiple(options) | QuestionKind::Checkbox(options) => {
            let mut counts: Vec<OptionCount> = options
                .iter()
                .map(|o| OptionCount { text: o.text.clone(), count: 0 })
                .collect();
            let mut other = 0;
            for choice in answers.iter().flat_map(choices_of) {
                match counts.iter_mut().find(|c| c.text == choice) {
                    Some(c) => c.count += 1,
                    None => other += 1,
                }
            }
            Summary::Choices { options: counts, other }
        }
        QuestionKind::Rating => {
            let mut distribution: Vec<RatingCount> = (RATING_MIN..=RATING_MAX)
                .map(|value| RatingCount { value, count: 0 })
                .collect();
            let mut sum = 0.0;
            let mut n = 0usize;
            for value in answers.iter().filter_map(rating_of) {
                sum += f64::from(value);
                n += 1;
                if let Some(bucket) = distribution.iter_mut().find(|b| b.value == value) {
                    bucket.count += 1;
                }
            }
            let average = (n > 0).then(|| sum / n as f64);
            Summary::Rating { average, distribution }
        }
        _ => Summary::Texts {
            answers: answers.iter().map(AnswerValue::to_answer_text).collect(),
        },
    }
}

fn choices_of(value: &AnswerValue) -> Vec<&str> {
    match value {
        AnswerValue::Text(text) => vec![text.as_str()],
        AnswerValue::Choices(choices) => choices.iter().map(String::as_str).collect(),
    }
}

fn rating_of(value: &AnswerValue) -> Option<u8> {
    match value {
        AnswerValue::Text(text) => text
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|v| (RATING_MIN..=RATING_MAX).contains(v)),
        AnswerValue::Choices(_) => None,
    }
}
