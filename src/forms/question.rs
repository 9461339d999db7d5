use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SchemaError;
use super::response::ANSWER_DELIMITER;
use super::validate::Constraints;

pub const QUESTION_TEXT_MAX: usize = 255;
pub const LONG_ANSWER_MAX: usize = 5000;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// The closed set of question types, as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Short,
    Long,
    Multiple,
    Checkbox,
    Rating,
    Date,
    Time,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        QuestionType::Short,
        QuestionType::Long,
        QuestionType::Multiple,
        QuestionType::Checkbox,
        QuestionType::Rating,
        QuestionType::Date,
        QuestionType::Time,
    ];

    /// Whether questions of this type carry a list of options.
    pub fn has_options(self) -> bool {
        matches!(self, QuestionType::Multiple | QuestionType::Checkbox)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Short => "short",
            QuestionType::Long => "long",
            QuestionType::Multiple => "multiple",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Rating => "rating",
            QuestionType::Date => "date",
            QuestionType::Time => "time",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown question type: {s}"))
    }
}

/// One selectable choice. Position in the owning list is its only order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Question type together with the data only that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Short,
    Long,
    Multiple(Vec<QuestionOption>),
    Checkbox(Vec<QuestionOption>),
    Rating,
    Date,
    Time,
}

impl QuestionKind {
    /// Fresh kind for `question_type`; choice kinds start with no options.
    pub fn empty(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Short => QuestionKind::Short,
            QuestionType::Long => QuestionKind::Long,
            QuestionType::Multiple => QuestionKind::Multiple(Vec::new()),
            QuestionType::Checkbox => QuestionKind::Checkbox(Vec::new()),
            QuestionType::Rating => QuestionKind::Rating,
            QuestionType::Date => QuestionKind::Date,
            QuestionType::Time => QuestionKind::Time,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Short => QuestionType::Short,
            QuestionKind::Long => QuestionType::Long,
            QuestionKind::Multiple(_) => QuestionType::Multiple,
            QuestionKind::Checkbox(_) => QuestionType::Checkbox,
            QuestionKind::Rating => QuestionType::Rating,
            QuestionKind::Date => QuestionType::Date,
            QuestionKind::Time => QuestionType::Time,
        }
    }

    /// Options of a choice kind; empty for every other kind.
    pub fn options(&self) -> &[QuestionOption] {
        match self {
            QuestionKind::Multiple(options) | QuestionKind::Checkbox(options) => options,
            _ => &[],
        }
    }

    fn options_mut(&mut self) -> Result<&mut Vec<QuestionOption>, SchemaError> {
        match self {
            QuestionKind::Multiple(options) | QuestionKind::Checkbox(options) => Ok(options),
            other => Err(SchemaError::NotChoiceType(other.question_type())),
        }
    }
}

/// One form field definition.
///
/// Serializes to the flat wire shape
/// `{id, questionText, type, options, required, order}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionPayload", into = "QuestionPayload")]
pub struct Question {
    /// Absent until the question has been persisted.
    pub id: Option<String>,
    pub text: String,
    pub kind: QuestionKind,
    pub required: bool,
    pub order: i32,
}

impl Question {
    /// A blank short-answer question at position `order`.
    pub fn new(order: i32) -> Self {
        Question {
            id: None,
            text: String::new(),
            kind: QuestionKind::Short,
            required: false,
            order,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn options(&self) -> &[QuestionOption] {
        self.kind.options()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Switch the question to `question_type`. Any change of type starts
    /// from an empty option list; re-selecting the current type keeps the
    /// options as they are.
    pub fn set_type(&mut self, question_type: QuestionType) {
        if self.question_type() != question_type {
            self.kind = QuestionKind::empty(question_type);
        }
    }

    /// Append a blank option. Only choice questions accept options.
    pub fn add_option(&mut self) -> Result<(), SchemaError> {
        self.kind.options_mut()?.push(QuestionOption::default());
        Ok(())
    }

    /// Remove the option at `index`; later options shift down by one.
    pub fn remove_option(&mut self, index: usize) -> Result<QuestionOption, SchemaError> {
        let options = self.kind.options_mut()?;
        if index >= options.len() {
            return Err(SchemaError::OptionIndex { index, len: options.len() });
        }
        Ok(options.remove(index))
    }

    pub fn set_option_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), SchemaError> {
        let options = self.kind.options_mut()?;
        let len = options.len();
        let option = options
            .get_mut(index)
            .ok_or(SchemaError::OptionIndex { index, len })?;
        option.text = text.into();
        Ok(())
    }

    /// Structural checks that apply to every save.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.text.chars().count() > QUESTION_TEXT_MAX {
            errors.push(format!("Question text must be at most {QUESTION_TEXT_MAX} characters"));
        }
        if self.order < 0 {
            errors.push("Question order must not be negative".to_string());
        }
        errors
    }

    /// Structural checks plus [`Question::missing_content`].
    pub fn validate_complete(&self) -> Vec<String> {
        let mut errors = self.validate();
        errors.extend(self.missing_content());
        errors
    }

    /// Content a question needs before its form may go public.
    pub fn missing_content(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push("Question text is required".to_string());
        }
        if self.question_type().has_options() {
            let options = self.options();
            if options.is_empty() {
                errors.push("At least one option is required".to_string());
            } else if options.iter().any(|o| o.text.trim().is_empty()) {
                errors.push("Options must not be blank".to_string());
            }
            // checkbox answers are joined on the delimiter, so an option
            // containing it could never be matched again
            if self.question_type() == QuestionType::Checkbox
                && options.iter().any(|o| o.text.contains(ANSWER_DELIMITER))
            {
                errors.push(format!("Checkbox options must not contain \"{ANSWER_DELIMITER}\""));
            }
        }
        errors
    }

    /// Constraints a submitted answer to this question must satisfy.
    /// Choice answers are checked against the option list instead.
    pub fn answer_constraints(&self) -> Constraints {
        let base = match self.kind {
            QuestionKind::Short => Constraints::text().max_length(QUESTION_TEXT_MAX),
            QuestionKind::Long => Constraints::text().max_length(LONG_ANSWER_MAX),
            QuestionKind::Rating => Constraints::number()
                .range(Some(f64::from(RATING_MIN)), Some(f64::from(RATING_MAX))),
            QuestionKind::Date => Constraints::text().pattern(r"/^\d{4}-\d{2}-\d{2}$/"),
            QuestionKind::Time => Constraints::text().pattern(r"/^\d{2}:\d{2}$/"),
            QuestionKind::Multiple(_) | QuestionKind::Checkbox(_) => Constraints::text(),
        };
        Constraints { required: self.required, ..base }
    }
}

/// Flat wire representation of a [`Question`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order: i32,
}

impl TryFrom<QuestionPayload> for Question {
    type Error = SchemaError;

    fn try_from(p: QuestionPayload) -> Result<Self, Self::Error> {
        let kind = match p.question_type {
            QuestionType::Multiple => QuestionKind::Multiple(p.options),
            QuestionType::Checkbox => QuestionKind::Checkbox(p.options),
            other if !p.options.is_empty() => return Err(SchemaError::OptionsNotAllowed(other)),
            other => QuestionKind::empty(other),
        };
        Ok(Question {
            id: p.id,
            text: p.question_text,
            kind,
            required: p.required,
            order: p.order,
        })
    }
}

impl From<Question> for QuestionPayload {
    fn from(q: Question) -> Self {
        let question_type = q.question_type();
        let options = match q.kind {
            QuestionKind::Multiple(options) | QuestionKind::Checkbox(options) => options,
            _ => Vec::new(),
        };
        QuestionPayload {
            id: q.id,
            question_text: q.text,
            question_type,
            options,
            required: q.required,
            order: q.order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip_through_from_str() {
        for t in QuestionType::ALL {
            assert_eq!(t.as_str().parse::<QuestionType>(), Ok(t));
        }
        assert!("dropdown".parse::<QuestionType>().is_err());
    }

    #[test]
    fn same_type_keeps_options() {
        let mut q = Question::new(0);
        q.set_type(QuestionType::Checkbox);
        q.add_option().unwrap();
        q.set_type(QuestionType::Checkbox);
        assert_eq!(q.options().len(), 1);
    }
}
