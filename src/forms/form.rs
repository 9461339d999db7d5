use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SchemaError;
use super::question::Question;

pub const TITLE_MAX: usize = 80;
pub const DESCRIPTION_MAX: usize = 255;

/// Where a form is in its lifecycle. Derived from `id` and `is_public`,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    /// Never saved; has no id.
    Draft,
    /// Saved and private.
    Saved,
    /// Saved and reachable through its public link.
    Published,
}

/// A form: metadata plus its ordered questions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Form { title: title.into(), ..Form::default() }
    }

    pub fn state(&self) -> FormState {
        match (&self.id, self.is_public) {
            (None, _) => FormState::Draft,
            (Some(_), false) => FormState::Saved,
            (Some(_), true) => FormState::Published,
        }
    }

    /// Append a blank question whose `order` is the current question count.
    pub fn add_question(&mut self) -> &mut Question {
        let order = i32::try_from(self.questions.len()).unwrap_or(i32::MAX);
        self.questions.push(Question::new(order));
        let last = self.questions.len() - 1;
        &mut self.questions[last]
    }

    /// Replace the question at `index`, keeping its position in the list.
    pub fn update_question(&mut self, index: usize, question: Question) -> Result<(), SchemaError> {
        let len = self.questions.len();
        let slot = self
            .questions
            .get_mut(index)
            .ok_or(SchemaError::QuestionIndex { index, len })?;
        *slot = question;
        Ok(())
    }

    /// Remove the question at `index`. Remaining questions keep their
    /// `order` values, so removal can leave gaps.
    pub fn remove_question(&mut self, index: usize) -> Result<Question, SchemaError> {
        if index >= self.questions.len() {
            return Err(SchemaError::QuestionIndex { index, len: self.questions.len() });
        }
        Ok(self.questions.remove(index))
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id.as_deref() == Some(id))
    }

    /// Stable sort by `order`; the store does not guarantee row order.
    pub fn sort_questions(&mut self) {
        self.questions.sort_by_key(|q| q.order);
    }

    /// Structural checks every save must pass.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().chars().count() > TITLE_MAX {
            errors.push(format!("Title must be at most {TITLE_MAX} characters"));
        }
        if self.description.trim().chars().count() > DESCRIPTION_MAX {
            errors.push(format!("Description must be at most {DESCRIPTION_MAX} characters"));
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for (i, q) in self.questions.iter().enumerate() {
            errors.extend(q.validate().into_iter().map(|e| format!("Question {}: {e}", i + 1)));
            if !seen.insert(q.order) && reported.insert(q.order) {
                errors.push(format!("Question order {} is used more than once", q.order));
            }
        }
        errors
    }

    /// Everything that blocks publishing. An empty form may be published.
    pub fn validate_for_publish(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        errors.extend(self.validate());
        for (i, q) in self.questions.iter().enumerate() {
            errors.extend(
                q.missing_content()
                    .into_iter()
                    .map(|e| format!("Question {}: {e}", i + 1)),
            );
        }
        errors
    }

    /// Saved → Published. Publishing a published form is a no-op.
    pub fn publish(&mut self) -> Result<(), SchemaError> {
        match self.state() {
            FormState::Draft => Err(SchemaError::NotSaved),
            FormState::Published => Ok(()),
            FormState::Saved => {
                let errors = self.validate_for_publish();
                if !errors.is_empty() {
                    return Err(SchemaError::NotPublishable(errors));
                }
                self.is_public = true;
                Ok(())
            }
        }
    }

    /// Check that replacing `self` with `next` is a legal lifecycle step:
    /// published forms stay published, and a public form must stay
    /// publishable through every edit.
    pub fn check_transition(&self, next: &Form) -> Result<(), SchemaError> {
        if self.is_public && !next.is_public {
            return Err(SchemaError::Unpublish);
        }
        if next.is_public {
            let errors = next.validate_for_publish();
            if !errors.is_empty() {
                return Err(SchemaError::NotPublishable(errors));
            }
        }
        Ok(())
    }

    /// Public link for a published form.
    pub fn public_url(&self, base_url: &str) -> Option<String> {
        match (&self.id, self.state()) {
            (Some(id), FormState::Published) => {
                Some(format!("{}/viewer/forms/{id}", base_url.trim_end_matches('/')))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_order_is_reported_once() {
        let mut form = Form::new("Survey");
        for _ in 0..3 {
            form.add_question().order = 4;
        }
        let errors = form.validate();
        assert_eq!(
            errors.iter().filter(|e| e.contains("used more than once")).count(),
            1
        );
    }

    #[test]
    fn publish_errors_are_not_duplicated() {
        let mut form = Form::new("Survey");
        form.add_question().set_text("x".repeat(300));
        let errors = form.validate_for_publish();
        assert_eq!(
            errors.iter().filter(|e| e.contains("at most 255")).count(),
            1
        );
    }
}
